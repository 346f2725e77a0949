//! Key-value store for post summaries and recently sent replies.
//!
//! Caching is best effort: every backend answers "not found" rather than
//! failing, so a missing or broken cache only costs extra provider calls.

pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{CacheBackend, CacheConfig};

pub use memory::MemoryCache;

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_post_summary(&self, post_id: &str) -> Option<String>;

    async fn set_post_summary(&self, post_id: &str, summary: &str);

    /// Oldest first.
    async fn get_recent_replies(&self, key: &str) -> Vec<String>;

    async fn add_recent_reply(&self, key: &str, reply: &str);

    /// Short status label reported by the health endpoint.
    async fn health(&self) -> &'static str;

    /// Free expired entries. Backends that expire on their own skip this.
    async fn purge_expired(&self) {}
}

/// Used when caching is disabled.
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get_post_summary(&self, _post_id: &str) -> Option<String> {
        None
    }

    async fn set_post_summary(&self, _post_id: &str, _summary: &str) {}

    async fn get_recent_replies(&self, _key: &str) -> Vec<String> {
        Vec::new()
    }

    async fn add_recent_reply(&self, _key: &str, _reply: &str) {}

    async fn health(&self) -> &'static str {
        "disabled"
    }
}

pub fn from_config(config: &CacheConfig) -> Arc<dyn CacheStore> {
    match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new(config)),
        CacheBackend::None => Arc::new(NoopCache),
    }
}
