use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::repo_types::User;
use crate::validation::{ValidationError, Validator};

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("user with that username does not exist")]
    NotFound,
    #[error("user with that username already exists")]
    AlreadyExists,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, username: &str) -> Result<User, UserStoreError>;
    async fn create(&self, user: User) -> Result<User, UserStoreError>;
    async fn update(&self, user: User) -> Result<(), UserStoreError>;
}

/// Users keyed by username behind a single reader/writer lock.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
    validator: Arc<dyn Validator>,
}

impl InMemoryUserRepository {
    pub fn new(validator: Arc<dyn Validator>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            validator,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, username: &str) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(UserStoreError::NotFound)
    }

    async fn create(&self, user: User) -> Result<User, UserStoreError> {
        self.validator.validate(&user)?;

        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(UserStoreError::AlreadyExists);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<(), UserStoreError> {
        self.validator.validate(&user)?;

        let mut users = self.users.write().await;
        match users.get_mut(&user.username) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(UserStoreError::NotFound),
        }
    }
}
