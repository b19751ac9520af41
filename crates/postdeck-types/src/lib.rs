//! Shared data model for postdeck.
//!
//! The central type is [`Post`], keyed by a tagged [`PostId`]: posts fetched
//! from the sandbox API carry the integer id the server assigned, while posts
//! created in this session carry a freshly minted [`LocalPostId`]. Keeping
//! the origin in the type means the two id spaces cannot collide.

pub mod ids;
pub mod post;

pub use ids::{LocalPostId, PostId};
pub use post::{Post, PostDraft, PostPatch, RemotePost};
