//! Cache store adapter (Redis).
//!
//! Thin get/set/expire/delete wrapper over a remote key-value store. The
//! client is constructed once in `main` and injected into the components
//! that need it; nothing in this module owns a global connection.
//!
//! ## Key layout
//!
//! ```text
//! daily_quizzes:{YYYY-MM-DD}   → DailyQuizList JSON (48h TTL from write)
//! quiz_backlog                 → BacklogList JSON (no TTL)
//! ```
//!
//! No CAS or optimistic locking: writers do read-modify-write and the last
//! write wins, consistent with the low expected write concurrency.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use redis::AsyncCommands;

/// Fixed global key for the topic backlog record.
pub const BACKLOG_KEY: &str = "quiz_backlog";

/// TTL for the day-scoped quiz record. Longer than a day on purpose so a
/// late cron run never leaves a gap at midnight.
pub const DAILY_QUIZ_TTL_SECS: u64 = 48 * 60 * 60;

/// Day-scoped key for a generated quiz list (UTC calendar date).
pub fn daily_quiz_key(date: NaiveDate) -> String {
    format!("daily_quizzes:{}", date.format("%Y-%m-%d"))
}

/// Raw string-keyed operations against the external store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value by key, None when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Set a value and a TTL in one call.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Delete a key (returns true if it existed).
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Redis implementation of CacheStore.
#[derive(Clone)]
pub struct RedisCacheStore {
    client: redis::Client,
}

impl RedisCacheStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        let _: () = conn.expire(key, ttl_secs as i64).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let deleted: i64 = conn.del(key).await?;
        Ok(deleted > 0)
    }
}
