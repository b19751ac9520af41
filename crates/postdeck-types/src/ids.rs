//! Tagged post identity.
//!
//! Remote posts keep the integer id the sandbox API assigned them. Posts
//! created locally are minted a [`LocalPostId`] (UUIDv7, time-ordered) the
//! moment they enter the session. The origin tag replaces the old assumption
//! that wall-clock-derived ids are numerically disjoint from the sandbox's
//! small sample ids — here the spaces are disjoint by construction.
//!
//! The `short()` form (first 8 hex chars) is for human-facing display only,
//! never used as a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity minted for a post created in this session (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalPostId(uuid::Uuid);

impl LocalPostId {
    /// Create a new time-ordered id (UUIDv7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters — for human display only, not lookup.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// Full 32-character hex string (no hyphens).
    pub fn to_hex(&self) -> String {
        self.0.as_simple().to_string()
    }

    /// Check if a query string matches this id by hex prefix.
    pub fn matches_hex_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.to_hex().starts_with(prefix)
    }
}

impl Default for LocalPostId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for LocalPostId {
    fn from(u: uuid::Uuid) -> Self {
        Self(u)
    }
}

impl From<LocalPostId> for uuid::Uuid {
    fn from(id: LocalPostId) -> uuid::Uuid {
        id.0
    }
}

impl fmt::Display for LocalPostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full UUID with hyphens for log readability
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for LocalPostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalPostId({})", self.short())
    }
}

/// Where a post's identity came from.
///
/// `Remote` ids are only meaningful to the sandbox API; `Local` ids exist
/// only inside this process. The two never compare equal, so a collection
/// keyed by `PostId` can mix both origins safely.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum PostId {
    /// Server-assigned integer identity from the sandbox collection.
    Remote(u64),
    /// Session-minted identity for a post the server never persisted.
    Local(LocalPostId),
}

impl PostId {
    pub fn is_local(&self) -> bool {
        matches!(self, PostId::Local(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, PostId::Remote(_))
    }

    /// The remote integer id, if this is a remote-origin identity.
    pub fn as_remote(&self) -> Option<u64> {
        match self {
            PostId::Remote(id) => Some(*id),
            PostId::Local(_) => None,
        }
    }

    /// The local id, if this identity was minted in this session.
    pub fn as_local(&self) -> Option<LocalPostId> {
        match self {
            PostId::Remote(_) => None,
            PostId::Local(id) => Some(*id),
        }
    }
}

impl From<LocalPostId> for PostId {
    fn from(id: LocalPostId) -> Self {
        PostId::Local(id)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Remote(id) => write!(f, "{id}"),
            PostId::Local(id) => write!(f, "local:{}", id.short()),
        }
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Remote(id) => write!(f, "PostId::Remote({id})"),
            PostId::Local(id) => write!(f, "PostId::Local({})", id.short()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
