mod app;
mod auth;
mod blocking;
mod config;
mod error;
mod schedule;
mod state;
mod tz;
mod users;
mod validation;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "scheduler=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init()?;
    let addr = app_state.config.addr();
    tracing::info!(
        token_ttl_minutes = app_state.config.jwt.ttl_minutes,
        "stores initialised"
    );

    app::serve(app::build_app(app_state), &addr).await
}
