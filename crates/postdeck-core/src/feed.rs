//! The feed: owns the overlay, the last fetched snapshot, and the notice
//! board, and drives a [`PostSource`] for the remote calls.
//!
//! Handlers run on one task and take `&mut self`, so store mutations never
//! interleave; the remote calls are the only suspension points. Every
//! mutation outcome — success or failure — posts exactly one notice. Errors
//! are also returned so callers can log them; none are fatal.

use postdeck_client::{ApiError, PostSource};
use postdeck_types::{LocalPostId, Post, PostDraft, PostId, PostPatch};
use tracing::{info, warn};

use crate::notice::NoticeBoard;
use crate::overlay::{OverlayError, OverlayStore};
use crate::view::{ViewQuery, materialize, user_ids};

const MSG_ADDED: &str = "Post added successfully!";
const MSG_ADD_FAILED: &str = "Failed to add post. Please try again.";
const MSG_DELETED: &str = "Post deleted successfully!";
const MSG_DELETE_FAILED: &str = "Failed to delete post. Please try again.";
const MSG_UPDATED: &str = "Post updated successfully!";
const MSG_UPDATE_FAILED: &str = "Failed to update post. Please try again.";
const MSG_FETCH_FAILED: &str = "Error fetching posts";
const MSG_EMPTY_TITLE: &str = "Post title must not be empty";

/// Failure surfaced by a feed handler. All variants are recoverable; the
/// user has already been notified by the time one is returned.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("post title must not be empty")]
    EmptyTitle,
    #[error("no post with id {0}")]
    UnknownPost(PostId),
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A filtered/sorted rendering of the feed, plus the data the presentation
/// layer needs around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedView {
    /// Posts after materialization, filtering, and sorting.
    pub posts: Vec<Post>,
    /// Distinct authors in the unfiltered collection, ascending.
    pub user_ids: Vec<u64>,
    /// False until the first successful fetch.
    pub loaded: bool,
}

/// The reconciled post collection and everything needed to mutate it.
pub struct PostFeed<S> {
    source: S,
    overlay: OverlayStore,
    snapshot: Option<Vec<Post>>,
    notices: NoticeBoard,
    /// Author id stamped onto new drafts.
    author: u64,
}

impl<S: PostSource> PostFeed<S> {
    pub fn new(source: S, author: u64) -> Self {
        Self::with_notices(source, author, NoticeBoard::default())
    }

    pub fn with_notices(source: S, author: u64, notices: NoticeBoard) -> Self {
        Self {
            source,
            overlay: OverlayStore::new(),
            snapshot: None,
            notices,
            author,
        }
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn overlay(&self) -> &OverlayStore {
        &self.overlay
    }

    /// Whether the remote collection has been fetched at least once.
    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    fn materialized(&self) -> Vec<Post> {
        materialize(self.snapshot.as_deref().unwrap_or_default(), &self.overlay)
    }

    /// The logical post with this identity, if it is currently visible.
    pub fn find(&self, id: PostId) -> Option<Post> {
        self.materialized().into_iter().find(|p| p.id == id)
    }

    /// Materialize, then apply the user's filter and ordering.
    pub fn view(&self, query: &ViewQuery) -> FeedView {
        let all = self.materialized();
        FeedView {
            user_ids: user_ids(&all),
            posts: query.apply(&all),
            loaded: self.is_loaded(),
        }
    }

    /// Fetch the remote collection and replace the snapshot. On failure the
    /// previous snapshot stays usable.
    pub async fn refresh(&mut self) -> Result<usize, FeedError> {
        match self.source.list().await {
            Ok(records) => {
                let posts: Vec<Post> = records.into_iter().map(Post::from).collect();
                let count = posts.len();
                info!(count, "refreshed remote snapshot");
                self.snapshot = Some(posts);
                Ok(count)
            }
            Err(err) => {
                warn!(%err, "failed to fetch posts");
                self.notices.error(MSG_FETCH_FAILED);
                Err(err.into())
            }
        }
    }

    /// Create a post. The draft goes to the sandbox, but the sandbox does
    /// not persist it, so the response is re-keyed under a session-minted
    /// local id and kept in the overlay. Nothing is committed on failure.
    pub async fn add(&mut self, title: &str) -> Result<PostId, FeedError> {
        let title = title.trim();
        if title.is_empty() {
            self.notices.error(MSG_EMPTY_TITLE);
            return Err(FeedError::EmptyTitle);
        }

        let draft = PostDraft::new(self.author, title);
        match self.source.create(&draft).await {
            Ok(record) => {
                let post = record.adopt_locally(LocalPostId::new());
                info!(id = %post.id, title = %post.title, "created post");
                self.commit_created(post)
            }
            Err(err) => {
                warn!(%err, "create failed");
                self.notices.error(MSG_ADD_FAILED);
                Err(err.into())
            }
        }
    }

    /// Keep a freshly created post in the overlay and report the outcome.
    /// Either branch posts exactly one notice.
    fn commit_created(&mut self, post: Post) -> Result<PostId, FeedError> {
        let id = post.id;
        match self.overlay.add_local(post) {
            Ok(()) => {
                self.notices.success(MSG_ADDED);
                Ok(id)
            }
            Err(err) => {
                warn!(%err, %id, "could not keep created post");
                self.notices.error(MSG_ADD_FAILED);
                Err(err.into())
            }
        }
    }

    /// Delete a post. Session-created posts are dropped from the overlay
    /// with no remote call. Remote posts are tombstoned first (optimistic),
    /// then the sandbox delete is issued; the tombstone stays even if that
    /// call fails, since the sandbox would not have honored it anyway.
    pub async fn delete(&mut self, id: PostId) -> Result<(), FeedError> {
        match id {
            PostId::Local(local) => {
                if let Err(err) = self.overlay.remove_local(local) {
                    self.notices.error(MSG_DELETE_FAILED);
                    return Err(err.into());
                }
                self.notices.success(MSG_DELETED);
                Ok(())
            }
            PostId::Remote(remote) => {
                self.overlay.tombstone(remote);
                match self.source.delete(remote).await {
                    Ok(()) => {
                        self.notices.success(MSG_DELETED);
                        Ok(())
                    }
                    Err(err) => {
                        warn!(%err, id = remote, "remote delete failed, tombstone kept");
                        self.notices.error(MSG_DELETE_FAILED);
                        Err(err.into())
                    }
                }
            }
        }
    }

    /// Apply a full-record edit. Local posts are replaced in place; remote
    /// posts get an override patch. No remote write is issued — the sandbox
    /// has no usable update.
    pub fn edit(&mut self, post: Post) -> Result<(), FeedError> {
        if post.title.trim().is_empty() {
            self.notices.error(MSG_EMPTY_TITLE);
            return Err(FeedError::EmptyTitle);
        }
        let outcome = match post.id {
            PostId::Local(_) => self.overlay.update_local(post).map_err(FeedError::from),
            PostId::Remote(remote) => {
                self.overlay.set_override(remote, PostPatch::from(&post));
                Ok(())
            }
        };
        match &outcome {
            Ok(()) => {
                self.notices.success(MSG_UPDATED);
            }
            Err(err) => {
                warn!(%err, "edit failed");
                self.notices.error(MSG_UPDATE_FAILED);
            }
        }
        outcome
    }

    /// Single-field edit: retitle a visible post.
    pub fn set_title(&mut self, id: PostId, title: &str) -> Result<(), FeedError> {
        let title = title.trim();
        if title.is_empty() {
            self.notices.error(MSG_EMPTY_TITLE);
            return Err(FeedError::EmptyTitle);
        }
        self.patch_post(id, PostPatch::title(title))
    }

    /// Single-field edit: flip a visible post's completed flag.
    pub fn set_completed(&mut self, id: PostId, completed: bool) -> Result<(), FeedError> {
        self.patch_post(id, PostPatch::completed(completed))
    }

    fn patch_post(&mut self, id: PostId, patch: PostPatch) -> Result<(), FeedError> {
        let outcome = match id {
            PostId::Remote(remote) => {
                self.overlay.set_override(remote, patch);
                Ok(())
            }
            PostId::Local(_) => match self.find(id) {
                Some(mut post) => {
                    patch.apply_to(&mut post);
                    self.overlay.update_local(post).map_err(FeedError::from)
                }
                None => Err(FeedError::UnknownPost(id)),
            },
        };
        match &outcome {
            Ok(()) => {
                self.notices.success(MSG_UPDATED);
            }
            Err(err) => {
                warn!(%err, %id, "patch failed");
                self.notices.error(MSG_UPDATE_FAILED);
            }
        }
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeKind;
    use postdeck_types::RemotePost;

    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    /// In-memory stand-in for the sandbox API. Failure flags flip the next
    /// calls into 500s; created/deleted record what the feed sent.
    #[derive(Default)]
    struct FakeSource {
        posts: Vec<RemotePost>,
        fail_list: AtomicBool,
        fail_create: AtomicBool,
        fail_delete: AtomicBool,
        created: Mutex<Vec<PostDraft>>,
        deleted: Mutex<Vec<u64>>,
        next_id: AtomicU64,
    }

    impl FakeSource {
        fn with_posts(posts: Vec<RemotePost>) -> Self {
            Self {
                posts,
                next_id: AtomicU64::new(101),
                ..Self::default()
            }
        }

        fn created(&self) -> Vec<PostDraft> {
            self.created.lock().unwrap().clone()
        }

        fn deleted(&self) -> Vec<u64> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostSource for FakeSource {
        async fn list(&self) -> Result<Vec<RemotePost>, ApiError> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ApiError::status(500, "fake:/posts"));
            }
            Ok(self.posts.clone())
        }

        async fn create(&self, draft: &PostDraft) -> Result<RemotePost, ApiError> {
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(ApiError::status(500, "fake:/posts"));
            }
            self.created.lock().unwrap().push(draft.clone());
            Ok(RemotePost {
                user_id: draft.user_id,
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                title: draft.title.clone(),
                body: draft.body.clone(),
                completed: draft.completed,
            })
        }

        async fn delete(&self, id: u64) -> Result<(), ApiError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(ApiError::status(500, format!("fake:/posts/{id}")));
            }
            self.deleted.lock().unwrap().push(id);
            Ok(())
        }
    }

    fn sample() -> Vec<RemotePost> {
        vec![
            RemotePost {
                user_id: 1,
                id: 1,
                title: "a".into(),
                body: "body a".into(),
                completed: false,
            },
            RemotePost {
                user_id: 2,
                id: 2,
                title: "b".into(),
                body: "body b".into(),
                completed: true,
            },
        ]
    }

    async fn loaded_feed() -> PostFeed<FakeSource> {
        let mut feed = PostFeed::new(FakeSource::with_posts(sample()), 1);
        feed.refresh().await.unwrap();
        feed
    }

    fn kind(feed: &PostFeed<FakeSource>) -> Option<NoticeKind> {
        feed.notices().current().map(|n| n.kind)
    }

    // ── Refresh ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let mut feed = PostFeed::new(FakeSource::with_posts(sample()), 1);
        assert!(!feed.is_loaded());

        let count = feed.refresh().await.unwrap();
        assert_eq!(count, 2);
        let view = feed.view(&ViewQuery::default());
        assert!(view.loaded);
        assert_eq!(view.posts.len(), 2);
        assert_eq!(view.user_ids, [1, 2]);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_snapshot() {
        let mut feed = loaded_feed().await;
        feed.source.fail_list.store(true, Ordering::SeqCst);

        assert!(feed.refresh().await.is_err());
        assert_eq!(feed.view(&ViewQuery::default()).posts.len(), 2);
        assert_eq!(kind(&feed), Some(NoticeKind::Error));
    }

    // ── Add ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_add_mints_local_identity() {
        let mut feed = loaded_feed().await;
        let id = feed.add("new").await.unwrap();
        assert!(id.is_local());

        let view = feed.view(&ViewQuery::default());
        assert_eq!(view.posts.len(), 3);
        assert_eq!(view.posts[0].id, id);
        assert_eq!(view.posts[0].title, "new");
        assert_eq!(kind(&feed), Some(NoticeKind::Success));

        // The draft went out with the configured author and the defaults.
        let sent = feed.source.created();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, 1);
        assert_eq!(sent[0].body, "");
        assert!(!sent[0].completed);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_title_without_remote_call() {
        let mut feed = loaded_feed().await;
        let err = feed.add("   ").await.unwrap_err();
        assert!(matches!(err, FeedError::EmptyTitle));
        assert!(feed.source.created().is_empty());
        assert_eq!(kind(&feed), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn test_commit_failure_posts_error_notice() {
        // An overlay rejection after a successful create still reports an
        // outcome, same as a failed create.
        let mut feed = loaded_feed().await;
        let post = Post {
            id: PostId::Local(LocalPostId::new()),
            user_id: 1,
            title: "twice".into(),
            body: String::new(),
            completed: false,
        };
        feed.commit_created(post.clone()).unwrap();
        assert_eq!(kind(&feed), Some(NoticeKind::Success));

        let err = feed.commit_created(post).unwrap_err();
        assert!(matches!(
            err,
            FeedError::Overlay(OverlayError::DuplicateLocal(_))
        ));
        assert_eq!(kind(&feed), Some(NoticeKind::Error));
        assert_eq!(feed.overlay().local_len(), 1);
    }

    #[tokio::test]
    async fn test_add_failure_commits_nothing() {
        let mut feed = loaded_feed().await;
        feed.source.fail_create.store(true, Ordering::SeqCst);

        assert!(feed.add("doomed").await.is_err());
        assert!(feed.overlay().is_empty());
        assert_eq!(feed.view(&ViewQuery::default()).posts.len(), 2);
        assert_eq!(kind(&feed), Some(NoticeKind::Error));
    }

    // ── Delete ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_delete_local_issues_no_remote_call() {
        let mut feed = loaded_feed().await;
        let id = feed.add("ephemeral").await.unwrap();

        feed.delete(id).await.unwrap();
        assert!(feed.source.deleted().is_empty());
        assert_eq!(feed.overlay().local_len(), 0);
        assert_eq!(feed.view(&ViewQuery::default()).posts.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_remote_tombstones_and_calls_sandbox() {
        let mut feed = loaded_feed().await;
        feed.delete(PostId::Remote(1)).await.unwrap();

        assert_eq!(feed.source.deleted(), [1]);
        assert!(feed.overlay().is_tombstoned(1));
        let view = feed.view(&ViewQuery::default());
        assert!(view.posts.iter().all(|p| p.id != PostId::Remote(1)));
        assert_eq!(kind(&feed), Some(NoticeKind::Success));
    }

    #[tokio::test]
    async fn test_delete_remote_failure_keeps_tombstone() {
        let mut feed = loaded_feed().await;
        feed.source.fail_delete.store(true, Ordering::SeqCst);

        assert!(feed.delete(PostId::Remote(1)).await.is_err());
        // Optimistic tombstone is not rolled back.
        assert!(feed.overlay().is_tombstoned(1));
        assert_eq!(feed.view(&ViewQuery::default()).posts.len(), 1);
        assert_eq!(kind(&feed), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn test_delete_unknown_local_fails_fast() {
        let mut feed = loaded_feed().await;
        let ghost = PostId::Local(LocalPostId::new());
        let err = feed.delete(ghost).await.unwrap_err();
        assert!(matches!(err, FeedError::Overlay(OverlayError::UnknownLocal(_))));
        assert_eq!(kind(&feed), Some(NoticeKind::Error));
    }

    // ── Edit ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_edit_remote_overlays_fetched_record() {
        let mut feed = loaded_feed().await;
        let mut post = feed.find(PostId::Remote(1)).unwrap();
        post.title = "edited".into();
        post.completed = true;
        feed.edit(post).unwrap();

        let shown = feed.find(PostId::Remote(1)).unwrap();
        assert_eq!(shown.title, "edited");
        assert!(shown.completed);
        // Body passed through untouched.
        assert_eq!(shown.body, "body a");
    }

    #[tokio::test]
    async fn test_edit_survives_refresh() {
        // Overrides are not reconciled against server truth: the sandbox
        // never applied the write, so the patch must outlive a re-fetch.
        let mut feed = loaded_feed().await;
        feed.set_completed(PostId::Remote(1), true).unwrap();
        feed.refresh().await.unwrap();
        assert!(feed.find(PostId::Remote(1)).unwrap().completed);
    }

    #[tokio::test]
    async fn test_edit_local_replaces_record() {
        let mut feed = loaded_feed().await;
        let id = feed.add("draft").await.unwrap();

        let mut post = feed.find(id).unwrap();
        post.title = "final".into();
        feed.edit(post).unwrap();

        assert_eq!(feed.find(id).unwrap().title, "final");
        assert_eq!(feed.overlay().local_len(), 1);
    }

    #[tokio::test]
    async fn test_sequential_field_edits_accumulate() {
        let mut feed = loaded_feed().await;
        feed.set_title(PostId::Remote(2), "retitled").unwrap();
        feed.set_completed(PostId::Remote(2), false).unwrap();

        let shown = feed.find(PostId::Remote(2)).unwrap();
        assert_eq!(shown.title, "retitled");
        assert!(!shown.completed);
    }

    #[tokio::test]
    async fn test_edit_rejects_blank_title() {
        let mut feed = loaded_feed().await;
        let mut post = feed.find(PostId::Remote(1)).unwrap();
        post.title = "  ".into();
        assert!(matches!(feed.edit(post), Err(FeedError::EmptyTitle)));
        // Nothing overlaid.
        assert!(feed.overlay().overlay_for(1).is_none());
    }

    #[tokio::test]
    async fn test_set_completed_on_missing_local_errors() {
        let mut feed = loaded_feed().await;
        let ghost = PostId::Local(LocalPostId::new());
        assert!(matches!(
            feed.set_completed(ghost, true),
            Err(FeedError::UnknownPost(_))
        ));
    }
}
