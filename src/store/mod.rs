use tokio::sync::RwLock;

use crate::{error::AppResult, models::PreferenceRecord};

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Durable home for like/dislike records
///
/// The store keeps one record per recipe id. Ordering is part of the
/// contract: list() returns newest-created first, and replacing an
/// existing id keeps the record in its original position rather than
/// bumping it to the front.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Every stored record, newest-created first
    async fn list(&self) -> AppResult<Vec<PreferenceRecord>>;

    /// Inserts a new record at the front, or replaces the record with
    /// the same id in place
    async fn upsert(&self, record: PreferenceRecord) -> AppResult<()>;

    /// Deletes the record with the given id; unknown ids are a no-op
    async fn remove(&self, id: &str) -> AppResult<()>;
}

/// In-memory store for tests and ephemeral deployments
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<PreferenceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<PreferenceRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn upsert(&self, record: PreferenceRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.insert(0, record),
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        self.records.write().await.retain(|record| record.id != id);
        Ok(())
    }
}
