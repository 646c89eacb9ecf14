use super::require_non_blank;
use crate::dto::{CreateTagRequest, TagResponse};
use crate::error::AppError;
use crate::store::Store;

pub async fn create(
    store: &dyn Store,
    caller: i64,
    req: CreateTagRequest,
) -> Result<TagResponse, AppError> {
    let name = require_non_blank(&req.name, "Tag name")?;

    if store.tag_exists_by_name_and_owner(&name, caller).await? {
        return Err(AppError::Duplicate(format!("Tag already exists: {name}")));
    }

    let tag = store.insert_tag(&name, caller).await?;

    tracing::info!(tag_id = tag.id, user_id = caller, "Tag created");
    Ok(TagResponse::from(&tag))
}

/// The caller's tags, ordered by name.
pub async fn list(store: &dyn Store, caller: i64) -> Result<Vec<TagResponse>, AppError> {
    let tags = store.find_tags_by_owner(caller).await?;
    Ok(tags.iter().map(TagResponse::from).collect())
}

pub async fn delete(store: &dyn Store, caller: i64, id: i64) -> Result<(), AppError> {
    let tag = store
        .find_tag_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag not found with id: {id}")))?;

    if tag.user_id != caller {
        return Err(AppError::AccessDenied(
            "You are not authorized to delete this tag".to_string(),
        ));
    }

    store.delete_tag(id).await?;

    tracing::info!(tag_id = id, user_id = caller, "Tag deleted");
    Ok(())
}
