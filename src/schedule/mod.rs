mod dto;
pub mod handlers;
pub mod interval;
mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use handlers::ScheduleState;
pub use repo::{EntityStoreError, InMemoryRepository};
pub use repo_types::{Event, Notification};
pub use services::ScheduleService;

pub fn router(events: ScheduleState<Event>, notifications: ScheduleState<Notification>) -> Router<AppState> {
    Router::new()
        .merge(handlers::routes("/events", events))
        .merge(handlers::routes("/notifications", notifications))
}
