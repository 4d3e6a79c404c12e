use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `user` follows `author`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: i64,
}
