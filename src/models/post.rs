use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<u64>,
    /// Path relative to the media root, e.g. `posts/small.gif`.
    pub image: Option<String>,
    pub created_at: i64,
}

/// Fields an author may change through the edit form.
///
/// `image: None` keeps the current image.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<u64>,
    pub image: Option<String>,
}
