use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::{instrument, warn};

use super::repo_types::User;
use crate::{
    auth::{dto::TokenResponse, extractors::session_cookie, AuthUser},
    error::ApiError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/timezone", put(update_timezone))
}

#[derive(Debug, Deserialize)]
pub struct TimezoneRequest {
    pub timezone: String,
}

#[instrument(skip(state, claims, payload), fields(caller = %claims.username, username = %payload.username))]
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<User>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create(payload).await.map_err(|e| {
        warn!(error = %e, "create user failed");
        ApiError::from(e)
    })?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Moves the caller to another zone and hands back a token that carries it.
#[instrument(skip(state, claims), fields(username = %claims.username))]
pub async fn update_timezone(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<TimezoneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .update_timezone(&claims.username, &payload.timezone)
        .await?;
    let token = state.tokens.generate(&user.username, &user.timezone)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(TokenResponse::from(token)),
    ))
}
