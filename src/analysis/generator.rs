use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::context::render_seller_context;
use super::intent::detect_intents;
use super::types::{ContextUsed, ReplyRequest, ReplyResponse};
use super::validate::validate_reply;
use crate::error::ReplyError;
use crate::prompts::{self, ReplyPromptInput};
use crate::provider::{Completion, CompletionProvider};

const VALID_CONFIDENCE: f64 = 0.95;
const INVALID_CONFIDENCE: f64 = 0.75;
const SELLER_CONTEXT_BONUS: f64 = 0.03;
const CONFIDENCE_CEILING: f64 = 0.98;
const FALLBACK_PENALTY: f64 = 0.05;

/// Turns a comment into a reply: classify, build the prompt, ask the
/// provider, validate, and retry once if the draft breaks a rule.
///
/// Holds no per-post state: identical requests produce identical prompts.
pub struct ReplyGenerator {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl ReplyGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, max_tokens: u32) -> Self {
        Self { provider, max_tokens }
    }

    pub async fn generate(&self, request: &ReplyRequest) -> Result<ReplyResponse, ReplyError> {
        let started = Instant::now();

        if request.post_id.trim().is_empty() {
            return Err(ReplyError::InvalidInput("post_id must not be blank".into()));
        }

        let intents = detect_intents(&request.comment_text);
        let primary = intents[0];
        info!(
            "Detected intents {:?} for comment: {}",
            intents,
            request.comment_text.chars().take(50).collect::<String>()
        );

        let context_used = ContextUsed::from_request(request);
        let has_seller_context = request.seller_context.is_some();

        let seller_context = render_seller_context(request.seller_context.as_ref(), request.language);
        let system_prompt = prompts::render_reply_prompt(&ReplyPromptInput {
            language: request.language,
            seller_context: &seller_context,
            post_summary: &request.post_summary,
            comment_text: &request.comment_text,
            cta_allowed: request.cta_allowed,
        })?;
        let images = self.provider.prepare_images(&request.image_urls).await;

        let completion = Completion {
            system_prompt: Some(system_prompt.as_str()),
            images: &images,
            user_text: prompts::user_instruction(request.language),
            max_tokens: self.max_tokens,
        };

        let mut reply = self
            .provider
            .complete(completion)
            .await
            .map_err(ReplyError::Provider)?;

        let is_valid = match validate_reply(&reply) {
            Ok(()) => true,
            Err(reason) => {
                warn!("Reply validation failed: {}. Regenerating...", reason);
                reply = self
                    .provider
                    .complete(completion)
                    .await
                    .map_err(ReplyError::Provider)?;

                match validate_reply(&reply) {
                    Ok(()) => true,
                    Err(reason) => {
                        warn!("Regenerated reply still invalid ({}), returning it anyway", reason);
                        false
                    }
                }
            }
        };

        Ok(ReplyResponse {
            reply,
            confidence: confidence(is_valid, has_seller_context),
            detected_intent: primary,
            detected_intents: intents,
            language_used: request.language,
            context_used,
            fallback_used: !has_seller_context,
            processing_time_ms: started.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
        })
    }
}

/// Heuristic score from validation outcome and information availability.
pub fn confidence(is_valid: bool, has_seller_context: bool) -> f64 {
    let base = if is_valid { VALID_CONFIDENCE } else { INVALID_CONFIDENCE };
    if has_seller_context {
        (base + SELLER_CONTEXT_BONUS).min(CONFIDENCE_CEILING)
    } else {
        base - FALLBACK_PENALTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::intent::Intent;
    use crate::analysis::types::{
        BrandVoice, Language, ProductContext, SellerContext, StockStatus,
    };
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out canned replies in order and records every prompt it saw.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
        image_batches: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
                image_batches: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn prepare_images(&self, urls: &[String]) -> Vec<String> {
            self.image_batches.lock().unwrap().push(urls.to_vec());
            urls.iter().map(|u| format!("data:{u}")).collect()
        }

        async fn complete(&self, request: Completion<'_>) -> Result<String> {
            assert!(request.images.iter().all(|i| i.starts_with("data:")));
            self.prompts
                .lock()
                .unwrap()
                .push(request.system_prompt.unwrap_or_default().to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }
    }

    fn generator(provider: Arc<ScriptedProvider>) -> ReplyGenerator {
        ReplyGenerator::new(provider, 200)
    }

    fn request(seller_context: Option<SellerContext>) -> ReplyRequest {
        ReplyRequest {
            post_id: "post_123".into(),
            post_summary: "Nouvelle collection robes été".into(),
            comment_text: "C'est combien la robe noire?".into(),
            image_urls: vec![],
            language: Language::French,
            brand_voice: BrandVoice::ProfessionalFriendly,
            cta_allowed: false,
            seller_context,
        }
    }

    fn robe_context() -> SellerContext {
        SellerContext {
            product_context: Some(ProductContext {
                product_name: Some("Robe Élégance".into()),
                sale_price: Some(69.0),
                regular_price: Some(89.0),
                currency: "TND".into(),
                stock_status: Some(StockStatus::InStock),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn confidence_table() {
        assert!((confidence(true, true) - 0.98).abs() < 1e-9);
        assert!((confidence(false, true) - 0.78).abs() < 1e-9);
        assert!((confidence(true, false) - 0.90).abs() < 1e-9);
        assert!((confidence(false, false) - 0.70).abs() < 1e-9);
        assert!(confidence(true, true) <= CONFIDENCE_CEILING);
    }

    #[tokio::test]
    async fn reply_with_seller_context() {
        let provider = ScriptedProvider::new(vec![Ok("C'est 69 TND au lieu de 89!".into())]);
        let response = generator(provider.clone())
            .generate(&request(Some(robe_context())))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(response.detected_intent, Intent::PriceInquiry);
        assert!(response.detected_intents.contains(&Intent::ColorQuestion));
        assert!(response.context_used.product_catalog);
        assert!(!response.context_used.image_context);
        assert!(!response.fallback_used);
        assert!((response.confidence - 0.98).abs() < 1e-9);

        let prompt = &provider.prompts.lock().unwrap()[0];
        assert!(prompt.contains("69 TND (au lieu de 89)"));
        assert!(prompt.contains("C'est combien la robe noire?"));
    }

    #[tokio::test]
    async fn fallback_mode_lowers_confidence() {
        let with_context = generator(ScriptedProvider::new(vec![Ok("Écris-nous en DM!".into())]))
            .generate(&request(Some(robe_context())))
            .await
            .unwrap();

        let provider = ScriptedProvider::new(vec![Ok("Écris-nous en DM!".into())]);
        let without_context = generator(provider.clone())
            .generate(&request(None))
            .await
            .unwrap();

        assert!(without_context.fallback_used);
        assert!(!without_context.context_used.product_catalog);
        assert!(without_context.confidence < with_context.confidence);
        assert!(provider.prompts.lock().unwrap()[0].contains("Aucune information vendeur"));
    }

    #[tokio::test]
    async fn invalid_draft_is_retried_once() {
        let provider = ScriptedProvider::new(vec![
            Ok("Nous sommes un service automatisé, voici le prix: 69 TND. #promo https://x.co".into()),
            Ok("C'est 69 TND, écris-nous en DM!".into()),
        ]);
        let response = generator(provider.clone())
            .generate(&request(Some(robe_context())))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(response.reply, "C'est 69 TND, écris-nous en DM!");
        assert!(validate_reply(&response.reply).is_ok());
        assert!((response.confidence - 0.98).abs() < 1e-9);

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn still_invalid_reply_is_returned_with_lower_confidence() {
        let provider = ScriptedProvider::new(vec![
            Ok("Voir #promo".into()),
            Ok("Toujours #promo".into()),
            Ok("never requested".into()),
        ]);
        let response = generator(provider.clone())
            .generate(&request(None))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(response.reply, "Toujours #promo");
        assert!((response.confidence - 0.70).abs() < 1e-9);
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(anyhow::anyhow!("Provider API returned 503")),
            Ok("unused".into()),
        ]);
        let err = generator(provider.clone())
            .generate(&request(None))
            .await
            .unwrap_err();

        assert_eq!(provider.calls(), 1);
        assert!(matches!(err, ReplyError::Provider(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn blank_post_id_is_rejected_before_generation() {
        let provider = ScriptedProvider::new(vec![Ok("Merci!".into())]);
        let mut req = request(None);
        req.post_id = "  ".into();

        let err = generator(provider.clone()).generate(&req).await.unwrap_err();
        assert!(matches!(err, ReplyError::InvalidInput(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn retry_reuses_fetched_images() {
        let provider = ScriptedProvider::new(vec![Ok("Voir #promo".into()), Ok("Merci!".into())]);
        let mut req = request(None);
        req.image_urls = vec!["https://cdn/a.jpg".into(), "https://cdn/b.jpg".into()];

        generator(provider.clone()).generate(&req).await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(
            *provider.image_batches.lock().unwrap(),
            vec![vec!["https://cdn/a.jpg".to_string(), "https://cdn/b.jpg".to_string()]]
        );
    }

    #[tokio::test]
    async fn identical_requests_send_identical_prompts() {
        let provider = ScriptedProvider::new(vec![Ok("Merci beaucoup!".into()), Ok("Avec plaisir!".into())]);
        let generator = generator(provider.clone());

        generator.generate(&request(Some(robe_context()))).await.unwrap();
        generator.generate(&request(Some(robe_context()))).await.unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
        assert!(!prompts[1].contains("Merci beaucoup!"));
    }
}
