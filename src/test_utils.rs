//! Shared test utilities: an in-memory `CacheStore` for stateful
//! read-modify-write tests and small state factories.
//!
//! The in-memory store ignores TTLs; expiry behavior belongs to Redis and is
//! outside what these tests exercise.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use crate::backlog::BacklogManager;
use crate::config::Prompts;
use crate::quiz::DailyQuizOrchestrator;
use crate::state::AppState;
use crate::store::CacheStore;

/// HashMap-backed store with real get/set/delete semantics.
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { data: Mutex::new(HashMap::new()) }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, _ttl_secs: u64) -> Result<()> {
        self.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.data.lock().unwrap().remove(key).is_some())
    }
}

pub fn memory_store() -> Arc<dyn CacheStore> {
    Arc::new(MemoryStore::new())
}

/// Orchestrator with no OpenAI client: every scheduled run takes the
/// fallback branch, which keeps tests deterministic and offline.
pub fn orchestrator_without_openai(store: Arc<dyn CacheStore>) -> DailyQuizOrchestrator {
    let backlog = BacklogManager::new(store.clone());
    DailyQuizOrchestrator::new(store, backlog, None, Prompts::default())
}

/// Full AppState over a fresh in-memory store.
pub fn test_state(cron_secret: Option<&str>) -> Arc<AppState> {
    let store = memory_store();
    let backlog = BacklogManager::new(store.clone());
    let quizzes =
        DailyQuizOrchestrator::new(store, backlog.clone(), None, Prompts::default());
    Arc::new(AppState {
        backlog,
        quizzes,
        cron_secret: cron_secret.map(String::from),
    })
}
