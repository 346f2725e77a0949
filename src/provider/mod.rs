//! Text-completion backends for replies and post summaries.

pub mod images;
pub mod openrouter;

use anyhow::Result;
use async_trait::async_trait;

pub use openrouter::OpenRouterProvider;

/// One completion call: an optional system prompt, the post images and a
/// closing user instruction.
///
/// `images` are sent as-is; they are the output of
/// [`CompletionProvider::prepare_images`].
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system_prompt: Option<&'a str>,
    pub images: &'a [String],
    pub user_text: &'a str,
    pub max_tokens: u32,
}

/// A vision-capable language model.
///
/// Implementations fail on transport errors and non-success statuses; they
/// never retry on their own.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Turn post image URLs into what the backend accepts. Called once per
    /// request so a retried completion reuses the same images.
    async fn prepare_images(&self, urls: &[String]) -> Vec<String> {
        urls.to_vec()
    }

    async fn complete(&self, request: Completion<'_>) -> Result<String>;
}
