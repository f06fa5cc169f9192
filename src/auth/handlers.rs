use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{SignIn, SignUp, TokenResponse};
use super::extractors::session_cookie;
use crate::{error::ApiError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUp>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.auth.sign_up(payload).await.map_err(|e| {
        warn!(error = %e, "sign-up failed");
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(TokenResponse::from(token)),
    ))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignIn>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.auth.sign_in(payload).await.map_err(|e| {
        warn!(error = %e, "sign-in failed");
        ApiError::sign_in(e)
    })?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(TokenResponse::from(token)),
    ))
}
