//! The [`PostSource`] seam and its error type.

use async_trait::async_trait;
use postdeck_types::{PostDraft, RemotePost};

/// Error talking to the remote post collection.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, body read, decode).
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

impl ApiError {
    /// Construct a status error. Public so test fakes can fail without a
    /// live `reqwest::Error` in hand.
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            url: url.into(),
        }
    }
}

/// Operations the remote post collection exposes.
///
/// `create` assigns its own id (any client-supplied identity is ignored) and
/// `delete` is accepted but not durable — sandbox behavior the caller's
/// overlay layer compensates for.
#[async_trait]
pub trait PostSource {
    /// Fetch the full collection.
    async fn list(&self) -> Result<Vec<RemotePost>, ApiError>;

    /// Submit a new post. The response echoes the draft plus a
    /// server-assigned id.
    async fn create(&self, draft: &PostDraft) -> Result<RemotePost, ApiError>;

    /// Delete by remote id. Accepted by the sandbox without being persisted.
    async fn delete(&self, id: u64) -> Result<(), ApiError>;
}
