use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::intent::Intent;

/// Languages a reply can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "tn")]
    Tunisian,
}

impl Language {
    /// Arabic and Tunisian share the Arabic-script labels and prompt.
    pub fn is_arabic_script(&self) -> bool {
        matches!(self, Language::Arabic | Language::Tunisian)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandVoice {
    #[default]
    ProfessionalFriendly,
    Casual,
    Formal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
    #[serde(other)]
    Unknown,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmojiUsage {
    None,
    #[default]
    Minimal,
    Moderate,
}

impl EmojiUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiUsage::None => "none",
            EmojiUsage::Minimal => "minimal",
            EmojiUsage::Moderate => "moderate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "TND".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductContext {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_name_ar: Option<String>,
    #[serde(default)]
    pub regular_price: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub sizes_available: Vec<String>,
    #[serde(default)]
    pub colors_available: Vec<ColorOption>,
    /// `None` means the seller did not say, which is not the same as `Unknown`.
    #[serde(default)]
    pub stock_status: Option<StockStatus>,
}

impl Default for ProductContext {
    fn default() -> Self {
        Self {
            product_id: None,
            product_name: None,
            product_name_ar: None,
            regular_price: None,
            sale_price: None,
            currency: default_currency(),
            sizes_available: Vec::new(),
            colors_available: Vec::new(),
            stock_status: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingInfo {
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub free_above: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub discount: Option<String>,
    /// Seller-specific fields (applies_to, valid_until, ...) passed through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqMatch {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

fn default_tone() -> String {
    "professional_friendly".to_string()
}

fn default_language_style() -> String {
    "french".to_string()
}

fn default_max_sentences() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandVoiceConfig {
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language_style")]
    pub language_style: String,
    #[serde(default = "default_max_sentences")]
    pub max_sentences: u32,
    #[serde(default)]
    pub emoji_usage: EmojiUsage,
}

impl Default for BrandVoiceConfig {
    fn default() -> Self {
        Self {
            tone: default_tone(),
            language_style: default_language_style(),
            max_sentences: default_max_sentences(),
            emoji_usage: EmojiUsage::default(),
        }
    }
}

/// Seller knowledge base attached to a request. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SellerContext {
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub product_context: Option<ProductContext>,
    #[serde(default)]
    pub shipping: Option<ShippingInfo>,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default)]
    pub return_policy: Option<String>,
    #[serde(default)]
    pub active_promotions: Vec<Promotion>,
    #[serde(default)]
    pub faq_matches: Vec<FaqMatch>,
    #[serde(default)]
    pub brand_voice: Option<BrandVoiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub post_id: String,
    pub post_summary: String,
    pub comment_text: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub brand_voice: BrandVoice,
    #[serde(default)]
    pub cta_allowed: bool,
    #[serde(default)]
    pub seller_context: Option<SellerContext>,
}

/// Which information sources fed a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextUsed {
    pub image_context: bool,
    pub product_catalog: bool,
    pub shipping_policies: bool,
    pub faq_matched: bool,
    pub brand_voice_applied: bool,
    pub promotion_mentioned: bool,
}

impl ContextUsed {
    pub fn from_request(request: &ReplyRequest) -> Self {
        let mut used = ContextUsed {
            image_context: !request.image_urls.is_empty(),
            ..Default::default()
        };

        if let Some(sc) = &request.seller_context {
            used.product_catalog = sc.product_context.is_some();
            used.shipping_policies = sc.shipping.is_some();
            used.faq_matched = !sc.faq_matches.is_empty();
            used.brand_voice_applied = sc.brand_voice.is_some();
            used.promotion_mentioned = !sc.active_promotions.is_empty();
        }

        used
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
    /// Heuristic in [0, 1], not a calibrated probability
    pub confidence: f64,
    pub detected_intent: Intent,
    pub detected_intents: Vec<Intent>,
    pub language_used: Language,
    pub context_used: ContextUsed,
    /// True when no seller context was supplied
    pub fallback_used: bool,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub post_id: String,
    pub caption: String,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub post_id: String,
    pub summary: String,
    #[serde(default)]
    pub cached: bool,
}
