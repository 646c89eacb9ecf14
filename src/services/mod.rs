//! Business rules. Each operation takes the store as a trait object and the
//! caller's id, and returns caller-safe projections.

pub mod tags;
pub mod teams;
pub mod todos;
pub mod users;

use crate::error::AppError;
use crate::models::Tag;
use crate::store::Store;

fn require_non_blank(value: &str, what: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(format!("{what} must not be blank")));
    }
    Ok(trimmed.to_string())
}

/// Requested tag ids narrowed to those the caller owns. Unknown or foreign
/// ids are dropped without complaint.
async fn resolve_tags(store: &dyn Store, ids: &[i64], user_id: i64) -> Result<Vec<Tag>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(store.find_tags_by_ids(ids, user_id).await?)
}
