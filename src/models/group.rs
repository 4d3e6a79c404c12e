use serde::{Deserialize, Serialize};

/// A topic posts can be filed under. Looked up by `slug` in URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub description: String,
}
