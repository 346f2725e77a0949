use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{images, Completion, CompletionProvider};
use crate::config::ProviderConfig;

/// OpenAI-compatible chat completions endpoint (OpenRouter by default).
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    referer: String,
    app_title: String,
    image_timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Serialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
enum Message {
    System(String),
    User(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
            image_timeout: Duration::from_secs(config.image_timeout_secs),
        })
    }

    fn build_messages(request: &Completion<'_>) -> Vec<Message> {
        let mut content: Vec<ContentPart> = request
            .images
            .iter()
            .map(|url| ContentPart::ImageUrl {
                image_url: ImageUrl { url: url.clone() },
            })
            .collect();
        content.push(ContentPart::Text {
            text: request.user_text.to_string(),
        });

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt {
            messages.push(Message::System(system.to_string()));
        }
        messages.push(Message::User(content));
        messages
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn prepare_images(&self, urls: &[String]) -> Vec<String> {
        images::fetch_as_data_urls(&self.client, urls, self.image_timeout).await
    }

    async fn complete(&self, request: Completion<'_>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: Self::build_messages(&request),
            max_tokens: request.max_tokens,
        };

        debug!(model = %self.model, url = %url, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await
            .context("Provider API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Provider API returned {}: {}", status, body);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse provider response")?;

        reply_text(&parsed)
    }
}

/// First choice's content, trimmed. Missing or blank content is an error.
fn reply_text(response: &ChatResponse) -> Result<String> {
    response
        .choices
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .context("Empty provider response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_put_images_before_instruction() {
        let images = vec!["data:image/png;base64,AAAA".to_string()];
        let request = Completion {
            system_prompt: Some("system"),
            images: &images,
            user_text: "reply please",
            max_tokens: 200,
        };
        let messages = OpenRouterProvider::build_messages(&request);

        let json = serde_json::to_value(&messages).unwrap();
        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[0]["content"], "system");
        assert_eq!(json[1]["role"], "user");
        assert_eq!(json[1]["content"][0]["type"], "image_url");
        assert_eq!(json[1]["content"][0]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(json[1]["content"][1]["type"], "text");
        assert_eq!(json[1]["content"][1]["text"], "reply please");
    }

    #[test]
    fn summary_request_has_no_system_message() {
        let request = Completion {
            system_prompt: None,
            images: &[],
            user_text: "summarize",
            max_tokens: 200,
        };
        let messages = OpenRouterProvider::build_messages(&request);
        let json = serde_json::to_value(&messages).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["role"], "user");
    }

    fn parse(body: &str) -> ChatResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn response_content_is_trimmed() {
        let parsed = parse(r#"{"choices":[{"message":{"role":"assistant","content":"  Merci! \n"}}]}"#);
        assert_eq!(reply_text(&parsed).unwrap(), "Merci!");
    }

    #[test]
    fn blank_or_missing_content_is_an_error() {
        for body in [
            r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            r#"{"choices":[{"message":null}]}"#,
            r#"{"choices":[]}"#,
            r#"{}"#,
        ] {
            let err = reply_text(&parse(body)).unwrap_err();
            assert!(err.to_string().contains("Empty provider response"), "{body}");
        }
    }
}
