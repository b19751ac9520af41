//! Post records: the logical [`Post`], the sandbox wire shapes, and the
//! field-wise [`PostPatch`] used for local overrides.

use serde::{Deserialize, Serialize};

use crate::ids::{LocalPostId, PostId};

/// A post as the client reasons about it, regardless of origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: u64,
    pub title: String,
    pub body: String,
    pub completed: bool,
}

/// A post record as the sandbox API sends it.
///
/// The `/posts` sample data carries no `completed` field, so it defaults to
/// false on decode. `body` is defaulted too — create responses echo only the
/// fields that were submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub completed: bool,
}

impl RemotePost {
    /// Re-key this record under a session-minted identity.
    ///
    /// Used after a create: the sandbox echoes a server-assigned id but does
    /// not persist the record, so that id is not a durable identity. The
    /// caller mints a local one instead and keeps the response fields.
    pub fn adopt_locally(self, id: LocalPostId) -> Post {
        Post {
            id: PostId::Local(id),
            user_id: self.user_id,
            title: self.title,
            body: self.body,
            completed: self.completed,
        }
    }
}

impl From<RemotePost> for Post {
    fn from(r: RemotePost) -> Self {
        Post {
            id: PostId::Remote(r.id),
            user_id: r.user_id,
            title: r.title,
            body: r.body,
            completed: r.completed,
        }
    }
}

/// Body of a create request. The sandbox assigns its own id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub user_id: u64,
    pub title: String,
    pub body: String,
    pub completed: bool,
}

impl PostDraft {
    /// A fresh draft: given title, empty body, not completed.
    pub fn new(user_id: u64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: String::new(),
            completed: false,
        }
    }
}

/// A partial-field patch layered over a fetched post.
///
/// `None` means "leave the fetched value alone". Patches accumulate
/// field-wise: merging a later patch overwrites exactly the fields it sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub completed: Option<bool>,
}

impl PostPatch {
    /// A patch that only flips the completed flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// A patch that only replaces the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.title.is_none()
            && self.body.is_none()
            && self.completed.is_none()
    }

    /// Fold a later patch into this one. Fields the later patch sets win;
    /// fields it leaves unset keep their current value.
    pub fn merge(&mut self, later: PostPatch) {
        if let Some(user_id) = later.user_id {
            self.user_id = Some(user_id);
        }
        if let Some(title) = later.title {
            self.title = Some(title);
        }
        if let Some(body) = later.body {
            self.body = Some(body);
        }
        if let Some(completed) = later.completed {
            self.completed = Some(completed);
        }
    }

    /// Shallow-merge the patched fields onto a post.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(user_id) = self.user_id {
            post.user_id = user_id;
        }
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(body) = &self.body {
            post.body = body.clone();
        }
        if let Some(completed) = self.completed {
            post.completed = completed;
        }
    }
}

impl From<&Post> for PostPatch {
    /// Full-record patch: every field set. Used when an edit form hands back
    /// the whole post rather than a diff.
    fn from(post: &Post) -> Self {
        Self {
            user_id: Some(post.user_id),
            title: Some(post.title.clone()),
            body: Some(post.body.clone()),
            completed: Some(post.completed),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
