use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::IntervalQuery;
use super::repo_types::Scheduled;
use super::services::ScheduleService;
use crate::{
    auth::{jwt::SharedTokenizer, AuthUser},
    error::ApiError,
    state::AppState,
    tz,
};

/// Router state for one entity kind.
#[derive(Clone)]
pub struct ScheduleState<T: Scheduled> {
    pub service: Arc<ScheduleService<T>>,
    pub tokens: SharedTokenizer,
}

impl<T: Scheduled> FromRef<ScheduleState<T>> for SharedTokenizer {
    fn from_ref(state: &ScheduleState<T>) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// CRUD routes for `T` mounted at `path` and `path/:id`.
pub fn routes<T: Scheduled>(path: &str, state: ScheduleState<T>) -> Router<AppState> {
    Router::new()
        .route(path, get(list::<T>).post(create::<T>))
        .route(
            &format!("{path}/:id"),
            get(fetch::<T>).put(update::<T>).delete(remove::<T>),
        )
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("ID should be numeric.".into()))
}

#[instrument(skip(state, claims), fields(kind = T::KIND, username = %claims.username))]
pub async fn list<T: Scheduled>(
    State(state): State<ScheduleState<T>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<IntervalQuery>,
) -> Result<Json<Vec<T>>, ApiError> {
    let zone = tz::parse(&claims.timezone)?;
    let items = state
        .service
        .get_all(query.interval.as_deref(), &zone)
        .await?;
    Ok(Json(items))
}

#[instrument(skip(state, claims), fields(kind = T::KIND))]
pub async fn fetch<T: Scheduled>(
    State(state): State<ScheduleState<T>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<T>, ApiError> {
    let id = parse_id(&id)?;
    let zone = tz::parse(&claims.timezone)?;
    let item = state.service.get(id, &zone).await?;
    Ok(Json(item))
}

#[instrument(skip(state, claims, payload), fields(kind = T::KIND))]
pub async fn create<T: Scheduled>(
    State(state): State<ScheduleState<T>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<T>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let created = state.service.create(payload).await?;
    info!(id = created.id(), username = %claims.username, "created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, claims, payload), fields(kind = T::KIND))]
pub async fn update<T: Scheduled>(
    State(state): State<ScheduleState<T>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<T>,
) -> Result<Json<T>, ApiError> {
    let id = parse_id(&id)?;
    let updated = state.service.update(id, payload).await.map_err(|rejected| {
        warn!(id, username = %claims.username, error = %rejected, "update rejected");
        ApiError::unprocessable(rejected.error)
    })?;
    Ok(Json(updated))
}

#[instrument(skip(state, claims), fields(kind = T::KIND))]
pub async fn remove<T: Scheduled>(
    State(state): State<ScheduleState<T>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await.map_err(|e| {
        warn!(id, username = %claims.username, error = %e, "delete rejected");
        ApiError::unprocessable(e)
    })?;
    info!(id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}
