use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::auth::extractor::AuthUser;
use crate::dto::{
    CreateTodoRequest, FilterParams, SortParams, StrategiesResponse, TodoResponse,
    UpdateTodoRequest,
};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::ApiResponse;
use crate::services::todos;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<Vec<TodoResponse>>>, AppError> {
    let todos = todos::list(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(ApiResponse::success(todos, "Success")))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TodoResponse>>), AppError> {
    let todo = todos::create(state.store.as_ref(), auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(todo, "Todo created successfully")),
    ))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<TodoResponse>>, AppError> {
    let todo = todos::get(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(ApiResponse::success(todo, "Success")))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> Result<Json<ApiResponse<TodoResponse>>, AppError> {
    let todo = todos::update(state.store.as_ref(), auth.user_id, id, req).await?;
    Ok(Json(ApiResponse::success(todo, "Todo updated successfully")))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    todos::delete(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(ApiResponse::success((), "Todo deleted successfully")))
}

pub async fn filter(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> Result<Json<ApiResponse<Vec<TodoResponse>>>, AppError> {
    let todos = todos::filter(state.store.as_ref(), auth.user_id, &params).await?;
    Ok(Json(ApiResponse::success(todos, "Success")))
}

pub async fn sort(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiQuery(params): ApiQuery<SortParams>,
) -> Result<Json<ApiResponse<Vec<TodoResponse>>>, AppError> {
    let todos = todos::sort(state.store.as_ref(), auth.user_id, &params).await?;
    Ok(Json(ApiResponse::success(todos, "Success")))
}

pub async fn strategies(_auth: AuthUser) -> Json<ApiResponse<StrategiesResponse>> {
    Json(ApiResponse::success(todos::strategies(), "Success"))
}
