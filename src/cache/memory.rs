use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::config::CacheConfig;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

impl<T> Entry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Utc::now() + ttl,
        }
    }

    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-process cache with per-entry expiry.
#[derive(Clone)]
pub struct MemoryCache {
    summaries: Arc<RwLock<HashMap<String, Entry<String>>>>,
    replies: Arc<RwLock<HashMap<String, Entry<Vec<String>>>>>,
    summary_ttl: Duration,
    replies_ttl: Duration,
    max_recent_replies: usize,
}

impl MemoryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            summaries: Arc::new(RwLock::new(HashMap::new())),
            replies: Arc::new(RwLock::new(HashMap::new())),
            summary_ttl: Duration::seconds(config.post_summary_ttl_secs as i64),
            replies_ttl: Duration::seconds(config.recent_replies_ttl_secs as i64),
            max_recent_replies: config.max_recent_replies,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_post_summary(&self, post_id: &str) -> Option<String> {
        let now = Utc::now();
        self.summaries
            .read()
            .await
            .get(post_id)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone())
    }

    async fn set_post_summary(&self, post_id: &str, summary: &str) {
        self.summaries
            .write()
            .await
            .insert(post_id.to_string(), Entry::new(summary.to_string(), self.summary_ttl));
    }

    async fn get_recent_replies(&self, key: &str) -> Vec<String> {
        let now = Utc::now();
        self.replies
            .read()
            .await
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    async fn add_recent_reply(&self, key: &str, reply: &str) {
        let now = Utc::now();
        let mut replies = self.replies.write().await;

        let mut list = match replies.remove(key) {
            Some(entry) if entry.is_live(now) => entry.value,
            _ => Vec::new(),
        };
        list.push(reply.to_string());
        if list.len() > self.max_recent_replies {
            let excess = list.len() - self.max_recent_replies;
            list.drain(..excess);
        }

        // Every write refreshes the expiry, as a SETEX would.
        replies.insert(key.to_string(), Entry::new(list, self.replies_ttl));
    }

    async fn health(&self) -> &'static str {
        "healthy"
    }

    async fn purge_expired(&self) {
        let now = Utc::now();
        self.summaries.write().await.retain(|_, e| e.is_live(now));
        self.replies.write().await.retain(|_, e| e.is_live(now));
    }
}
