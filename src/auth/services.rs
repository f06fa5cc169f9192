use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::claims::Token;
use super::dto::{SignIn, SignUp};
use super::jwt::{TokenError, Tokenizer};
use super::password::Hasher;
use crate::blocking::{self, BlockingError};
use crate::users::{User, UserRepository, UserStoreError};
use crate::validation::{ValidationError, Validator};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid credentials")]
    AuthenticationFailed,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(#[from] UserStoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Sign-up and sign-in orchestration.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    validator: Arc<dyn Validator>,
    hasher: Arc<dyn Hasher>,
    tokens: Arc<dyn Tokenizer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        validator: Arc<dyn Validator>,
        hasher: Arc<dyn Hasher>,
        tokens: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            users,
            validator,
            hasher,
            tokens,
        }
    }

    /// Registers a user and returns a session token.
    ///
    /// The token is minted before the user is stored; when storing fails the
    /// token is dropped and the store error is returned.
    pub async fn sign_up(&self, request: SignUp) -> Result<Token, AuthError> {
        self.validator.validate(&request)?;

        let hasher = Arc::clone(&self.hasher);
        let plain = request.repeat_password;
        let hash = blocking::run(move || hasher.generate(&plain))
            .await?
            .map_err(|e| ValidationError::new("password", e.to_string()))?;

        let user = User {
            username: request.username,
            password: hash,
            timezone: request.timezone,
        };

        let token = self.tokens.generate(&user.username, &user.timezone)?;
        let user = self.users.create(user).await.map_err(|e| {
            warn!(error = %e, "sign-up rejected by user store");
            e
        })?;

        info!(username = %user.username, "user signed up");
        Ok(token)
    }

    pub async fn sign_in(&self, request: SignIn) -> Result<Token, AuthError> {
        self.validator.validate(&request)?;

        let user = self.users.get(&request.username).await?;

        let hasher = Arc::clone(&self.hasher);
        let stored = user.password.clone();
        let plain = request.password;
        blocking::run(move || hasher.compare(&stored, &plain))
            .await?
            .map_err(|_| {
                warn!(username = %user.username, "sign-in with wrong password");
                AuthError::AuthenticationFailed
            })?;

        let token = self.tokens.generate(&user.username, &user.timezone)?;
        info!(username = %user.username, "user signed in");
        Ok(token)
    }
}

impl From<BlockingError> for AuthError {
    fn from(err: BlockingError) -> Self {
        Self::Internal(err.to_string())
    }
}
