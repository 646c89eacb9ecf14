use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::auth::extractor::AuthUser;
use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::services::users;
use crate::state::SharedState;

pub async fn register(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let user = users::register(state.store.as_ref(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(user, "User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let token = users::login(
        state.store.as_ref(),
        &state.login_limiter,
        &state.config,
        req,
    )
    .await?;
    Ok(Json(ApiResponse::success(token, "Login successful")))
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = users::profile(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(ApiResponse::success(user, "Success")))
}
