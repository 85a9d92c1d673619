use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{error::AppResult, models::PreferenceRecord, store::PreferenceStore};

/// Read-through view of the preference store with a last-known-good
/// snapshot. Reads that hit a store failure serve the snapshot instead of
/// erroring, so scoring and listings degrade to stale rather than broken.
/// Writes propagate failures and leave the snapshot untouched.
pub struct PreferenceHistory {
    store: Arc<dyn PreferenceStore>,
    snapshot: RwLock<Vec<PreferenceRecord>>,
}

impl PreferenceHistory {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Vec::new()),
        }
    }

    /// Current history, newest first. Never fails: a store error serves
    /// the last successfully read snapshot, empty on a cold start.
    pub async fn records(&self) -> Vec<PreferenceRecord> {
        match self.store.list().await {
            Ok(records) => {
                *self.snapshot.write().await = records.clone();
                records
            }
            Err(error) => {
                tracing::warn!(error = %error, "Preference store read failed, serving last snapshot");
                self.snapshot.read().await.clone()
            }
        }
    }

    pub async fn save(&self, record: PreferenceRecord) -> AppResult<()> {
        self.store.upsert(record).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> AppResult<()> {
        self.store.remove(id).await?;
        self.refresh().await;
        Ok(())
    }

    async fn refresh(&self) {
        match self.store.list().await {
            Ok(records) => *self.snapshot.write().await = records,
            Err(error) => {
                tracing::warn!(error = %error, "Snapshot refresh failed after write");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::Preference,
        store::{MemoryStore, MockPreferenceStore},
    };
    use mockall::Sequence;

    fn record(id: &str) -> PreferenceRecord {
        PreferenceRecord {
            id: id.to_string(),
            title: format!("Recipe {}", id),
            preference: Preference::Liked,
            timestamp: 0,
            image_url: None,
            category: None,
            area: None,
            ingredients: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_store_failure_serves_last_snapshot() {
        let mut store = MockPreferenceStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![record("a")]));
        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(AppError::Internal("disk gone".to_string())));

        let history = PreferenceHistory::new(Arc::new(store));

        assert_eq!(history.records().await, vec![record("a")]);
        // Second read fails in the store but still serves the snapshot
        assert_eq!(history.records().await, vec![record("a")]);
    }

    #[tokio::test]
    async fn test_cold_start_failure_serves_empty_history() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_list()
            .times(1)
            .returning(|| Err(AppError::Internal("disk gone".to_string())));

        let history = PreferenceHistory::new(Arc::new(store));

        assert!(history.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_refreshes_the_snapshot() {
        let mut store = MockPreferenceStore::new();
        let mut seq = Sequence::new();
        store.expect_upsert().times(1).returning(|_| Ok(()));
        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![record("b"), record("a")]));
        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(AppError::Internal("disk gone".to_string())));

        let history = PreferenceHistory::new(Arc::new(store));
        history.save(record("b")).await.unwrap();

        // The read fails, so this can only come from the refreshed snapshot
        assert_eq!(history.records().await, vec![record("b"), record("a")]);
    }

    #[tokio::test]
    async fn test_failed_save_propagates_and_keeps_snapshot() {
        let mut store = MockPreferenceStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![record("a")]));
        store
            .expect_upsert()
            .times(1)
            .returning(|_| Err(AppError::Internal("disk full".to_string())));
        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(AppError::Internal("disk gone".to_string())));

        let history = PreferenceHistory::new(Arc::new(store));

        assert_eq!(history.records().await, vec![record("a")]);
        assert!(history.save(record("b")).await.is_err());
        assert_eq!(history.records().await, vec![record("a")]);
    }

    #[tokio::test]
    async fn test_round_trip_over_memory_store() {
        let history = PreferenceHistory::new(Arc::new(MemoryStore::new()));

        history.save(record("a")).await.unwrap();
        history.save(record("b")).await.unwrap();

        let ids: Vec<String> = history
            .records()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);

        history.remove("b").await.unwrap();
        let ids: Vec<String> = history
            .records()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a"]);
    }
}
