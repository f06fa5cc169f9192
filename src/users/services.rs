use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::repo::{UserRepository, UserStoreError};
use super::repo_types::User;
use crate::auth::password::Hasher;
use crate::blocking::{self, BlockingError};
use crate::validation::Validator;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Store(#[from] UserStoreError),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Internal(#[from] BlockingError),
}

/// Account management outside the sign-up flow.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    validator: Arc<dyn Validator>,
    hasher: Arc<dyn Hasher>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        validator: Arc<dyn Validator>,
        hasher: Arc<dyn Hasher>,
    ) -> Self {
        Self {
            users,
            validator,
            hasher,
        }
    }

    /// Stores `user` with its plaintext password replaced by a hash.
    pub async fn create(&self, mut user: User) -> Result<User, UserError> {
        // the store only sees the hash, so the plaintext is checked here
        self.validator
            .validate(&user)
            .map_err(UserStoreError::from)?;

        let hasher = Arc::clone(&self.hasher);
        let plain = std::mem::take(&mut user.password);
        user.password = blocking::run(move || hasher.generate(&plain))
            .await?
            .map_err(|e| UserError::Hash(e.to_string()))?;

        let user = self.users.create(user).await?;
        info!(username = %user.username, "user created");
        Ok(user)
    }

    /// Moves a user to another zone. The caller is expected to re-issue the
    /// session token, since the old one still carries the previous zone.
    pub async fn update_timezone(&self, username: &str, timezone: &str) -> Result<User, UserError> {
        let mut user = self.users.get(username).await?;
        user.timezone = timezone.to_string();
        self.users.update(user.clone()).await?;
        info!(username, timezone, "timezone updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::HashError;
    use crate::users::InMemoryUserRepository;
    use crate::validation::RuleValidator;

    struct PlainHasher;

    impl Hasher for PlainHasher {
        fn generate(&self, plain: &str) -> Result<String, HashError> {
            Ok(format!("hashed:{plain}"))
        }
        fn compare(&self, hash: &str, plain: &str) -> Result<(), HashError> {
            if hash == format!("hashed:{plain}") {
                Ok(())
            } else {
                Err(HashError::Mismatch)
            }
        }
    }

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new(Arc::new(RuleValidator)));
        let svc = UserService::new(users.clone(), Arc::new(RuleValidator), Arc::new(PlainHasher));
        (svc, users)
    }

    fn bob() -> User {
        User {
            username: "bob42".into(),
            password: "hunter2!".into(),
            timezone: "Europe/Berlin".into(),
        }
    }

    #[tokio::test]
    async fn create_hashes_before_storing() {
        let (svc, users) = service();
        let created = svc.create(bob()).await.unwrap();
        assert_eq!(created.password, "hashed:hunter2!");
        assert_eq!(users.get("bob42").await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_surfaces_store_conflicts() {
        let (svc, _) = service();
        svc.create(bob()).await.unwrap();
        assert!(matches!(
            svc.create(bob()).await,
            Err(UserError::Store(UserStoreError::AlreadyExists))
        ));
    }

    #[tokio::test]
    async fn create_checks_plaintext_before_hashing() {
        let (svc, users) = service();
        let short = User {
            password: "abc".into(),
            ..bob()
        };
        match svc.create(short).await {
            Err(UserError::Store(UserStoreError::Validation(v))) => assert_eq!(v.field, "password"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(users.get("bob42").await.is_err());
    }

    #[tokio::test]
    async fn update_timezone_persists_new_zone() {
        let (svc, users) = service();
        svc.create(bob()).await.unwrap();

        let updated = svc.update_timezone("bob42", "Asia/Tokyo").await.unwrap();
        assert_eq!(updated.timezone, "Asia/Tokyo");
        assert_eq!(users.get("bob42").await.unwrap().timezone, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn update_timezone_rejects_unknown_zone_and_keeps_old_one() {
        let (svc, users) = service();
        svc.create(bob()).await.unwrap();

        match svc.update_timezone("bob42", "Atlantis/Capital").await {
            Err(UserError::Store(UserStoreError::Validation(v))) => {
                assert_eq!(v.field, "timezone")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(users.get("bob42").await.unwrap().timezone, "Europe/Berlin");
    }

    #[tokio::test]
    async fn update_timezone_of_unknown_user_is_not_found() {
        let (svc, _) = service();
        assert!(matches!(
            svc.update_timezone("ghost", "UTC").await,
            Err(UserError::Store(UserStoreError::NotFound))
        ));
    }
}
