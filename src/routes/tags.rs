use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::auth::extractor::AuthUser;
use crate::dto::{CreateTagRequest, TagResponse};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::services::tags;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<Vec<TagResponse>>>, AppError> {
    let tags = tags::list(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(ApiResponse::success(tags, "Success")))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TagResponse>>), AppError> {
    let tag = tags::create(state.store.as_ref(), auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(tag, "Tag created successfully")),
    ))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    tags::delete(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(ApiResponse::success((), "Tag deleted successfully")))
}
