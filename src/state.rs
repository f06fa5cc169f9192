use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::jwt::{JwtKeys, SharedTokenizer};
use crate::auth::password::{Argon2Hasher, Hasher};
use crate::auth::services::AuthService;
use crate::config::AppConfig;
use crate::schedule::{Event, InMemoryRepository, Notification, ScheduleService, ScheduleState};
use crate::users::{InMemoryUserRepository, UserRepository, UserService};
use crate::validation::{RuleValidator, Validator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub events: Arc<ScheduleService<Event>>,
    pub notifications: Arc<ScheduleService<Notification>>,
    pub tokens: SharedTokenizer,
}

impl FromRef<AppState> for SharedTokenizer {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env()?)
    }

    /// Wires every store and service. One user store backs both the auth
    /// and user services.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let validator: Arc<dyn Validator> = Arc::new(RuleValidator);
        let hasher: Arc<dyn Hasher> = Arc::new(Argon2Hasher::new(&config.hash)?);
        let tokens: SharedTokenizer = Arc::new(JwtKeys::from_config(&config.jwt));
        let users: Arc<dyn UserRepository> =
            Arc::new(InMemoryUserRepository::new(Arc::clone(&validator)));

        let auth = AuthService::new(
            Arc::clone(&users),
            Arc::clone(&validator),
            Arc::clone(&hasher),
            Arc::clone(&tokens),
        );

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            users: Arc::new(UserService::new(users, validator, hasher)),
            events: Arc::new(ScheduleService::new(Arc::new(InMemoryRepository::<Event>::new()))),
            notifications: Arc::new(ScheduleService::new(Arc::new(
                InMemoryRepository::<Notification>::new(),
            ))),
            tokens,
        })
    }

    pub fn events_state(&self) -> ScheduleState<Event> {
        ScheduleState {
            service: Arc::clone(&self.events),
            tokens: Arc::clone(&self.tokens),
        }
    }

    pub fn notifications_state(&self) -> ScheduleState<Notification> {
        ScheduleState {
            service: Arc::clone(&self.notifications),
            tokens: Arc::clone(&self.tokens),
        }
    }

    /// Cheap hashing and a fixed signing key for tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{HashConfig, JwtConfig};

        Self::from_config(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test".into(),
                ttl_minutes: 5,
            },
            hash: HashConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        })
        .expect("fake state")
    }
}
