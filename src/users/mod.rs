pub mod handlers;
mod repo;
mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{InMemoryUserRepository, UserRepository, UserStoreError};
pub use repo_types::User;
pub use services::{UserError, UserService};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
