use std::sync::Arc;
use tracing::info;

use super::types::{SummarizeRequest, SummarizeResponse};
use crate::cache::CacheStore;
use crate::error::ReplyError;
use crate::prompts;
use crate::provider::{Completion, CompletionProvider};

/// Cache-first post summaries.
pub struct PostSummarizer {
    provider: Arc<dyn CompletionProvider>,
    cache: Arc<dyn CacheStore>,
    max_tokens: u32,
}

impl PostSummarizer {
    pub fn new(provider: Arc<dyn CompletionProvider>, cache: Arc<dyn CacheStore>, max_tokens: u32) -> Self {
        Self {
            provider,
            cache,
            max_tokens,
        }
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse, ReplyError> {
        if request.post_id.trim().is_empty() {
            return Err(ReplyError::InvalidInput("post_id must not be blank".into()));
        }

        if let Some(summary) = self.cache.get_post_summary(&request.post_id).await {
            info!("Cache hit for post {}", request.post_id);
            return Ok(SummarizeResponse {
                post_id: request.post_id.clone(),
                summary,
                cached: true,
            });
        }

        let prompt = prompts::render_summary_prompt(&request.caption)?;
        let images = self.provider.prepare_images(&request.image_urls).await;
        let summary = self
            .provider
            .complete(Completion {
                system_prompt: None,
                images: &images,
                user_text: &prompt,
                max_tokens: self.max_tokens,
            })
            .await
            .map_err(ReplyError::Provider)?;

        self.cache.set_post_summary(&request.post_id, &summary).await;
        info!("Generated and cached summary for post {}", request.post_id);

        Ok(SummarizeResponse {
            post_id: request.post_id.clone(),
            summary,
            cached: false,
        })
    }
}
