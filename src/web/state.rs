use std::sync::Arc;

use crate::analysis::{PostSummarizer, ReplyGenerator};
use crate::cache::CacheStore;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ReplyGenerator>,
    pub summarizer: Arc<PostSummarizer>,
    pub cache: Arc<dyn CacheStore>,
    /// Accepted `X-API-Key` values; empty means development mode.
    pub api_keys: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        generator: ReplyGenerator,
        summarizer: PostSummarizer,
        cache: Arc<dyn CacheStore>,
        api_keys: Vec<String>,
    ) -> Self {
        Self {
            generator: Arc::new(generator),
            summarizer: Arc::new(summarizer),
            cache,
            api_keys: Arc::new(api_keys),
        }
    }
}
