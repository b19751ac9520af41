//! Client-side reconciliation core for postdeck.
//!
//! Three sources of truth diverge in this system: the snapshot last fetched
//! from the sandbox API, posts created locally that the sandbox never
//! persisted, and local edits/deletes of sandbox posts that the sandbox
//! silently drops. This crate merges them into one consistent view:
//!
//! - [`OverlayStore`] holds the local-only state: session-created posts plus
//!   per-remote-id patches and tombstones.
//! - [`materialize`] combines a fetched snapshot with the overlay into the
//!   logical collection.
//! - [`ViewQuery`] filters and stably sorts the materialized collection.
//! - [`PostFeed`] owns the above, drives a [`PostSource`] for the remote
//!   calls, and posts user-facing outcomes to a [`NoticeBoard`].
//!
//! Everything below the feed is pure and synchronous; the feed's handlers
//! are the only suspension points.
//!
//! [`PostSource`]: postdeck_client::PostSource

pub mod feed;
pub mod notice;
pub mod overlay;
pub mod view;

pub use feed::{FeedError, FeedView, PostFeed};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use overlay::{OverlayError, OverlayStore, RemoteOverlay};
pub use view::{
    Sort, SortDirection, SortKey, StatusFilter, UserFilter, ViewQuery, materialize, user_ids,
};
