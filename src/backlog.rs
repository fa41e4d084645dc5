//! Backlog Manager: the ordered pending-topics list, kept as a single record
//! behind the cache store.
//!
//! Every write loads the record fresh, mutates it, re-sorts by `added_at`,
//! recomputes the count, and overwrites the whole key. O(n) write
//! amplification is accepted for simplicity; there is no concurrency control
//! beyond last-write-wins (two simultaneous enqueues can race).

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{BacklogEntry, BacklogList};
use crate::error::AppError;
use crate::store::{BACKLOG_KEY, CacheStore};

#[derive(Clone)]
pub struct BacklogManager {
    store: Arc<dyn CacheStore>,
}

impl BacklogManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Load the current record; an absent key is an empty backlog, not an error.
    async fn load(&self) -> Result<BacklogList, AppError> {
        match self.store.get(BACKLOG_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(BacklogList::empty()),
        }
    }

    async fn save(&self, mut list: BacklogList) -> Result<BacklogList, AppError> {
        // Sort is stable: equal timestamps keep insertion order.
        list.items.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        list.total_count = list.items.len();
        list.last_updated = Utc::now();
        let json = serde_json::to_string(&list)?;
        self.store.set(BACKLOG_KEY, &json).await?;
        Ok(list)
    }

    /// Append a topic. Fails with `Validation` when the trimmed topic is empty.
    #[instrument(level = "info", skip(self, topic, added_by), fields(topic_len = topic.len()))]
    pub async fn enqueue(&self, topic: &str, added_by: &str) -> Result<BacklogEntry, AppError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("topic must not be empty".into()));
        }

        let entry = BacklogEntry {
            id: Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            added_by: added_by.to_string(),
            added_at: Utc::now(),
        };

        let mut list = self.load().await?;
        list.items.push(entry.clone());
        let list = self.save(list).await?;

        info!(target: "backlog", id = %entry.id, topic = %entry.topic, total = list.total_count, "Topic enqueued");
        Ok(entry)
    }

    /// Read the full backlog, oldest first.
    #[instrument(level = "debug", skip(self))]
    pub async fn list(&self) -> Result<BacklogList, AppError> {
        self.load().await
    }

    /// Oldest pending entry, if any. The list is invariant-sorted, so this is
    /// always `items[0]`.
    ///
    /// Not wired into the scheduled flow: generation picks its topic at
    /// random and only observes the backlog (see the orchestrator).
    #[allow(dead_code)]
    #[instrument(level = "debug", skip(self))]
    pub async fn peek_oldest(&self) -> Result<Option<BacklogEntry>, AppError> {
        Ok(self.load().await?.items.first().cloned())
    }

    /// Remove one entry by id. `NotFound` when the record or the id is absent.
    #[allow(dead_code)]
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn remove_by_id(&self, id: &str) -> Result<(), AppError> {
        let record = self.store.get(BACKLOG_KEY).await?;
        let Some(json) = record else {
            return Err(AppError::NotFound("backlog is empty".into()));
        };
        let mut list: BacklogList = serde_json::from_str(&json)?;

        let before = list.items.len();
        list.items.retain(|e| e.id != id);
        if list.items.len() == before {
            return Err(AppError::NotFound(format!("no backlog entry with id {}", id)));
        }

        let list = self.save(list).await?;
        info!(target: "backlog", %id, total = list.total_count, "Backlog entry removed");
        Ok(())
    }

    /// Delete the backlog record entirely. Idempotent: clearing an absent
    /// backlog is fine.
    #[allow(dead_code)]
    #[instrument(level = "info", skip(self))]
    pub async fn clear(&self) -> Result<(), AppError> {
        let existed = self.store.delete(BACKLOG_KEY).await?;
        info!(target: "backlog", existed, "Backlog cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockCacheStore;
    use crate::test_utils::memory_store;

    #[tokio::test]
    async fn enqueue_then_list_contains_trimmed_topic() {
        let backlog = BacklogManager::new(memory_store());

        let entry = backlog.enqueue("  Bitcoin ETFs  ", "alice").await.unwrap();
        assert_eq!(entry.topic, "Bitcoin ETFs");

        let list = backlog.list().await.unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.total_count, 1);
        assert_eq!(list.items[0].topic, "Bitcoin ETFs");
        assert_eq!(list.items[0].added_by, "alice");
    }

    #[tokio::test]
    async fn empty_and_whitespace_topics_are_rejected() {
        let backlog = BacklogManager::new(memory_store());

        for bad in ["", "   "] {
            match backlog.enqueue(bad, "alice").await {
                Err(AppError::Validation(_)) => {}
                Err(_) => panic!("wrong error kind for topic {:?}", bad),
                Ok(_) => panic!("expected Validation error for topic {:?}", bad),
            }
        }

        let list = backlog.list().await.unwrap();
        assert_eq!(list.total_count, 0);
    }

    #[tokio::test]
    async fn list_is_fifo_and_count_matches() {
        let backlog = BacklogManager::new(memory_store());

        backlog.enqueue("Bitcoin", "alice").await.unwrap();
        backlog.enqueue("Space", "bob").await.unwrap();
        backlog.enqueue("Climate", "carol").await.unwrap();

        let list = backlog.list().await.unwrap();
        let topics: Vec<&str> = list.items.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["Bitcoin", "Space", "Climate"]);
        assert_eq!(list.total_count, list.items.len());
        assert!(list.items.windows(2).all(|w| w[0].added_at <= w[1].added_at));
    }

    #[tokio::test]
    async fn peek_oldest_returns_first_or_none() {
        let backlog = BacklogManager::new(memory_store());
        assert!(backlog.peek_oldest().await.unwrap().is_none());

        backlog.enqueue("Bitcoin", "alice").await.unwrap();
        backlog.enqueue("Space", "bob").await.unwrap();

        let oldest = backlog.peek_oldest().await.unwrap().unwrap();
        assert_eq!(oldest.topic, "Bitcoin");
    }

    #[tokio::test]
    async fn remove_by_id_removes_only_that_entry() {
        let backlog = BacklogManager::new(memory_store());
        let first = backlog.enqueue("Bitcoin", "alice").await.unwrap();
        backlog.enqueue("Space", "bob").await.unwrap();

        backlog.remove_by_id(&first.id).await.unwrap();

        let list = backlog.list().await.unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.items[0].topic, "Space");
    }

    #[tokio::test]
    async fn remove_by_missing_id_fails_and_leaves_backlog_unchanged() {
        let backlog = BacklogManager::new(memory_store());
        backlog.enqueue("Bitcoin", "alice").await.unwrap();

        match backlog.remove_by_id("does-not-exist").await {
            Err(AppError::NotFound(_)) => {}
            _ => panic!("expected NotFound"),
        }

        let list = backlog.list().await.unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.items[0].topic, "Bitcoin");
    }

    #[tokio::test]
    async fn remove_on_absent_record_is_not_found() {
        let backlog = BacklogManager::new(memory_store());
        match backlog.remove_by_id("anything").await {
            Err(AppError::NotFound(_)) => {}
            _ => panic!("expected NotFound"),
        }
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let backlog = BacklogManager::new(memory_store());
        backlog.enqueue("Bitcoin", "alice").await.unwrap();

        backlog.clear().await.unwrap();
        backlog.clear().await.unwrap();

        let list = backlog.list().await.unwrap();
        assert_eq!(list.total_count, 0);
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let backlog = BacklogManager::new(Arc::new(store));
        match backlog.list().await {
            Err(AppError::Store(_)) => {}
            _ => panic!("expected Store error"),
        }
    }
}
