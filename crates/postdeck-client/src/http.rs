//! reqwest-backed [`PostSource`] implementation.

use async_trait::async_trait;
use postdeck_types::{PostDraft, RemotePost};
use tracing::{debug, warn};

use crate::constants::POSTS_PATH;
use crate::source::{ApiError, PostSource};

/// HTTP client for the sandbox post collection.
pub struct PostsApi {
    http: reqwest::Client,
    base: String,
}

impl PostsApi {
    /// Build a client for the given base URL (trailing slashes tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base, POSTS_PATH)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/{}/{}", self.base, POSTS_PATH, id)
    }
}

/// Convert a non-success response into [`ApiError::Status`].
fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let url = resp.url().to_string();
        warn!(%status, %url, "sandbox returned non-success status");
        Err(ApiError::status(status.as_u16(), url))
    }
}

#[async_trait]
impl PostSource for PostsApi {
    async fn list(&self) -> Result<Vec<RemotePost>, ApiError> {
        let url = self.collection_url();
        debug!(%url, "fetching post collection");
        let resp = check(self.http.get(&url).send().await?)?;
        let posts: Vec<RemotePost> = resp.json().await?;
        debug!(count = posts.len(), "fetched post collection");
        Ok(posts)
    }

    async fn create(&self, draft: &PostDraft) -> Result<RemotePost, ApiError> {
        let url = self.collection_url();
        debug!(%url, title = %draft.title, "creating post");
        let resp = check(self.http.post(&url).json(draft).send().await?)?;
        let created: RemotePost = resp.json().await?;
        debug!(assigned_id = created.id, "sandbox accepted create");
        Ok(created)
    }

    async fn delete(&self, id: u64) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!(%url, "deleting post");
        check(self.http.delete(&url).send().await?)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
