//! Materialization and the filter/sort engine.
//!
//! [`materialize`] folds the overlay into the last-fetched snapshot;
//! [`ViewQuery`] then narrows and orders the result. Both are pure — the
//! same inputs always give the same output in the same order.

use postdeck_types::Post;
use strum::{Display, EnumString};

use crate::overlay::{OverlayStore, RemoteOverlay};

/// Combine the fetched snapshot with the overlay into the logical collection.
///
/// Local posts come first (newest first, their stored order), then remote
/// posts in fetch order with tombstoned entries dropped and patches
/// shallow-merged on top. Identity stays unique: local and remote id spaces
/// are disjoint by type, and the snapshot itself carries no duplicates.
pub fn materialize(remote: &[Post], overlay: &OverlayStore) -> Vec<Post> {
    let mut out: Vec<Post> = overlay.local_posts().to_vec();
    for post in remote {
        match post.id.as_remote().and_then(|id| overlay.overlay_for(id)) {
            Some(RemoteOverlay::Tombstone) => {}
            Some(RemoteOverlay::Patch(patch)) => {
                let mut merged = post.clone();
                patch.apply_to(&mut merged);
                out.push(merged);
            }
            None => out.push(post.clone()),
        }
    }
    out
}

/// Distinct authors present in a collection, ascending. Feeds the user
/// filter selector in the presentation layer.
pub fn user_ids(posts: &[Post]) -> Vec<u64> {
    let mut ids: Vec<u64> = posts.iter().map(|p| p.user_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Completion-status predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    #[strum(serialize = "done")]
    Completed,
    #[strum(serialize = "todo")]
    NotCompleted,
}

impl StatusFilter {
    fn admits(&self, post: &Post) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => post.completed,
            StatusFilter::NotCompleted => !post.completed,
        }
    }
}

/// Author predicate: everything, or an exact user id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserFilter {
    #[default]
    All,
    Only(u64),
}

impl UserFilter {
    fn admits(&self, post: &Post) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::Only(user_id) => post.user_id == *user_id,
        }
    }
}

/// Column a view can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    Title,
    #[strum(serialize = "user")]
    UserId,
    Completed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// An active ordering: key plus direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// The user-selected filter and ordering, applied to a materialized
/// collection. `sort: None` keeps materialization order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub status: StatusFilter,
    pub user: UserFilter,
    pub sort: Option<Sort>,
}

impl ViewQuery {
    /// Select a sort column: re-selecting the active column flips the
    /// direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = Some(match self.sort {
            Some(sort) if sort.key == key => Sort {
                key,
                direction: sort.direction.flipped(),
            },
            _ => Sort {
                key,
                direction: SortDirection::Ascending,
            },
        });
    }

    /// Filter, then stable-sort. Titles compare by code-point order, user
    /// ids numerically, completion with false < true. Descending reverses
    /// the comparator under the same stable sort, so tied entries keep
    /// materialization order in either direction.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let mut out: Vec<Post> = posts
            .iter()
            .filter(|p| self.status.admits(p) && self.user.admits(p))
            .cloned()
            .collect();

        if let Some(Sort { key, direction }) = self.sort {
            out.sort_by(|a, b| {
                let ord = match key {
                    SortKey::Title => a.title.cmp(&b.title),
                    SortKey::UserId => a.user_id.cmp(&b.user_id),
                    SortKey::Completed => a.completed.cmp(&b.completed),
                };
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
