use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::auth::extractor::AuthUser;
use crate::dto::{
    AddMemberRequest, CreateTeamRequest, TeamMemberResponse, TeamResponse, TodoResponse,
};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::services::teams;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, AppError> {
    let teams = teams::list_mine(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(ApiResponse::success(teams, "Success")))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponse>>), AppError> {
    let team = teams::create(state.store.as_ref(), auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(team, "Team created successfully")),
    ))
}

pub async fn members(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Vec<TeamMemberResponse>>>, AppError> {
    let members = teams::members(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(ApiResponse::success(members, "Success")))
}

pub async fn add_member(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<AddMemberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamMemberResponse>>), AppError> {
    let member = teams::add_member(state.store.as_ref(), auth.user_id, id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(member, "Member added successfully")),
    ))
}

pub async fn todos(
    auth: AuthUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Vec<TodoResponse>>>, AppError> {
    let todos = teams::todos(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(ApiResponse::success(todos, "Success")))
}
