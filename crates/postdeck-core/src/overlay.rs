//! Local overlay state: session-created posts, patches, and tombstones.
//!
//! The store is explicit and injectable — owned by the application context
//! and passed by reference into [`materialize`](crate::view::materialize)
//! and the feed handlers. It never talks to the network; it only records
//! what this session believes on top of whatever the sandbox returns.

use std::collections::HashMap;

use postdeck_types::{LocalPostId, Post, PostId, PostPatch};
use tracing::debug;

/// What this session has layered over one remote post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteOverlay {
    /// Field-wise edits to apply on top of the fetched record.
    Patch(PostPatch),
    /// Treat the post as deleted no matter what the sandbox returns.
    Tombstone,
}

/// Misuse of the store — these indicate caller bugs, not recoverable
/// conditions, so the operations fail fast instead of silently no-opping.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    #[error("post {0} is not locally owned")]
    NotLocal(PostId),
    #[error("no local post with id local:{}", .0.short())]
    UnknownLocal(LocalPostId),
    #[error("local post local:{} already exists", .0.short())]
    DuplicateLocal(LocalPostId),
}

/// Session-lifetime overlay over the remote post collection.
///
/// `local` is ordered newest first; `remote` keys are sandbox-assigned ids.
/// All operations are synchronous and in-memory.
#[derive(Debug, Default, Clone)]
pub struct OverlayStore {
    local: Vec<Post>,
    remote: HashMap<u64, RemoteOverlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session-created post at the front (newest first).
    ///
    /// The post must carry a `PostId::Local` identity that is not already
    /// present.
    pub fn add_local(&mut self, post: Post) -> Result<(), OverlayError> {
        let Some(local_id) = post.id.as_local() else {
            return Err(OverlayError::NotLocal(post.id));
        };
        if self.local.iter().any(|p| p.id == post.id) {
            return Err(OverlayError::DuplicateLocal(local_id));
        }
        debug!(id = %post.id, title = %post.title, "added local post");
        self.local.insert(0, post);
        Ok(())
    }

    /// Remove a session-created post, returning it.
    pub fn remove_local(&mut self, id: LocalPostId) -> Result<Post, OverlayError> {
        let target = PostId::Local(id);
        let idx = self
            .local
            .iter()
            .position(|p| p.id == target)
            .ok_or(OverlayError::UnknownLocal(id))?;
        debug!(id = %target, "removed local post");
        Ok(self.local.remove(idx))
    }

    /// Replace a session-created post in place. The replacement keeps the
    /// post's position in the newest-first order.
    pub fn update_local(&mut self, post: Post) -> Result<(), OverlayError> {
        let Some(local_id) = post.id.as_local() else {
            return Err(OverlayError::NotLocal(post.id));
        };
        let slot = self
            .local
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(OverlayError::UnknownLocal(local_id))?;
        debug!(id = %post.id, "replaced local post");
        *slot = post;
        Ok(())
    }

    /// Merge a patch into the overlay for a remote id (later fields win).
    ///
    /// A patch for a tombstoned id is dropped: deletion wins, and a deleted
    /// post is invisible so no edit can legitimately originate from it.
    pub fn set_override(&mut self, remote_id: u64, patch: PostPatch) {
        match self.remote.get_mut(&remote_id) {
            Some(RemoteOverlay::Tombstone) => {
                debug!(remote_id, "ignoring patch for tombstoned post");
            }
            Some(RemoteOverlay::Patch(existing)) => {
                existing.merge(patch);
                debug!(remote_id, "merged override patch");
            }
            None => {
                debug!(remote_id, "set override patch");
                self.remote.insert(remote_id, RemoteOverlay::Patch(patch));
            }
        }
    }

    /// Mark a remote post deleted, superseding any prior patch. Idempotent.
    pub fn tombstone(&mut self, remote_id: u64) {
        debug!(remote_id, "tombstoned remote post");
        self.remote.insert(remote_id, RemoteOverlay::Tombstone);
    }

    /// The overlay entry for a remote id, if any.
    pub fn overlay_for(&self, remote_id: u64) -> Option<&RemoteOverlay> {
        self.remote.get(&remote_id)
    }

    pub fn is_tombstoned(&self, remote_id: u64) -> bool {
        matches!(self.remote.get(&remote_id), Some(RemoteOverlay::Tombstone))
    }

    /// Session-created posts, newest first.
    pub fn local_posts(&self) -> &[Post] {
        &self.local
    }

    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
