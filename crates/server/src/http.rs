//! Account bootstrap endpoints.
//!
//! Every body is JSON. Missing or mistyped fields are answered with 400
//! rather than axum's default 422.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use game_core::Position;
use runtime::Account;

use crate::AppState;
use crate::error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScoreRequest {
    pub username: String,
    pub score: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRespawnRequest {
    pub username: String,
    pub respawn_x: f64,
    pub respawn_y: f64,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub username: String,
    pub score: u64,
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(request) = body?;
    let account = state
        .runtime
        .accounts()
        .find(&request.username)
        .await?
        .ok_or_else(ApiError::user_not_found)?;
    Ok(Json(account))
}

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(request) = body?;
    let account = state.runtime.accounts().create(&request.username).await?;
    Ok(Json(account))
}

pub async fn update_score(
    State(state): State<AppState>,
    body: Result<Json<UpdateScoreRequest>, JsonRejection>,
) -> ApiResult<ScoreResponse> {
    let Json(request) = body?;
    let account = state
        .runtime
        .accounts()
        .update_score(&request.username, request.score)
        .await?
        .ok_or_else(ApiError::user_not_found)?;
    Ok(Json(ScoreResponse {
        username: account.username,
        score: account.score,
    }))
}

pub async fn update_respawn(
    State(state): State<AppState>,
    body: Result<Json<UpdateRespawnRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(request) = body?;
    let respawn = Position::new(request.respawn_x, request.respawn_y);
    if !respawn.is_finite() {
        return Err(ApiError::BadRequest("respawn coordinates must be finite".into()));
    }
    let account = state
        .runtime
        .accounts()
        .update_respawn(&request.username, respawn)
        .await?
        .ok_or_else(ApiError::user_not_found)?;
    Ok(Json(account))
}
