use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens_per_reply: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens_per_summary: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
    #[serde(default)]
    pub referer: String,
    #[serde(default)]
    pub app_title: String,
    // Loaded from env
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "default_post_summary_ttl")]
    pub post_summary_ttl_secs: u64,
    #[serde(default = "default_recent_replies_ttl")]
    pub recent_replies_ttl_secs: u64,
    #[serde(default = "default_max_recent_replies")]
    pub max_recent_replies: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            post_summary_ttl_secs: default_post_summary_ttl(),
            recent_replies_ttl_secs: default_recent_replies_ttl(),
            max_recent_replies: default_max_recent_replies(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    // Loaded from env
    #[serde(skip)]
    pub api_keys: Vec<String>,
}

fn default_max_tokens() -> u32 {
    200
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_image_timeout_secs() -> u64 {
    10
}

fn default_post_summary_ttl() -> u64 {
    86_400
}

fn default_recent_replies_ttl() -> u64 {
    3_600
}

fn default_max_recent_replies() -> usize {
    50
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_text =
            std::fs::read_to_string("config.toml").context("Failed to read config.toml")?;
        let mut config = Self::parse(&config_text)?;

        config.provider.api_key =
            std::env::var("OPENROUTER_API_KEY").context("OPENROUTER_API_KEY not set")?;
        config.web.api_keys = parse_api_keys(&std::env::var("API_KEYS").unwrap_or_default());

        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config.toml")
    }
}

/// Comma-separated list, blanks dropped.
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}
