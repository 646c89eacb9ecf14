use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A label private to the user that created it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
