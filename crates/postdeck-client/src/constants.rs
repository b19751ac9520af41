//! Client configuration constants.

/// Default sandbox API base URL.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Collection path under the base URL.
pub const POSTS_PATH: &str = "posts";
