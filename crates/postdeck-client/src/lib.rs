//! Remote post source for postdeck.
//!
//! Wraps a JSONPlaceholder-style sandbox REST API behind the [`PostSource`]
//! trait so the reconciliation core can be driven by a fake in tests. The
//! sandbox accepts creates and deletes but does not persist them; callers are
//! expected to layer their own overlays on top of what `list` returns.

pub mod constants;
pub mod http;
pub mod source;

pub use http::PostsApi;
pub use source::{ApiError, PostSource};
