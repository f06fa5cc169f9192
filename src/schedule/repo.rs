use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::repo_types::Scheduled;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityStoreError {
    #[error("{kind} with id {id} does not exist")]
    NotFound { kind: &'static str, id: u64 },
}

impl EntityStoreError {
    fn not_found<T: Scheduled>(id: u64) -> Self {
        Self::NotFound { kind: T::KIND, id }
    }
}

/// A failed update, handing the rejected entity back to the caller.
#[derive(Debug)]
pub struct UpdateRejected<T> {
    pub entity: T,
    pub error: EntityStoreError,
}

impl<T> fmt::Display for UpdateRejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> std::error::Error for UpdateRejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[async_trait]
pub trait EntityRepository<T: Scheduled>: Send + Sync {
    async fn get_all(&self) -> Result<Vec<T>, EntityStoreError>;
    async fn get(&self, id: u64) -> Result<T, EntityStoreError>;
    async fn create(&self, entity: T) -> Result<T, EntityStoreError>;
    async fn update(&self, id: u64, entity: T) -> Result<T, UpdateRejected<T>>;
    async fn delete(&self, id: u64) -> Result<(), EntityStoreError>;
}

struct Entries<T> {
    items: Vec<T>,
    /// Smallest id never handed out.
    next_id: u64,
}

/// Insertion-ordered entities behind a single reader/writer lock.
pub struct InMemoryRepository<T> {
    entries: RwLock<Entries<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                items: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Scheduled> EntityRepository<T> for InMemoryRepository<T> {
    async fn get_all(&self) -> Result<Vec<T>, EntityStoreError> {
        Ok(self.entries.read().await.items.clone())
    }

    async fn get(&self, id: u64) -> Result<T, EntityStoreError> {
        self.entries
            .read()
            .await
            .items
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| EntityStoreError::not_found::<T>(id))
    }

    async fn create(&self, mut entity: T) -> Result<T, EntityStoreError> {
        let mut entries = self.entries.write().await;
        // next id follows the last element, never the length, and never
        // drops below an id already handed out
        let after_last = entries.items.last().map_or(1, |last| last.id() + 1);
        let id = after_last.max(entries.next_id);
        entries.next_id = id + 1;
        entity.set_id(id);
        entries.items.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: u64, mut entity: T) -> Result<T, UpdateRejected<T>> {
        entity.set_id(id);
        let mut entries = self.entries.write().await;
        match entries.items.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(UpdateRejected {
                entity,
                error: EntityStoreError::not_found::<T>(id),
            }),
        }
    }

    async fn delete(&self, id: u64) -> Result<(), EntityStoreError> {
        let mut entries = self.entries.write().await;
        let pos = entries
            .items
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| EntityStoreError::not_found::<T>(id))?;
        entries.items.remove(pos);
        Ok(())
    }
}
