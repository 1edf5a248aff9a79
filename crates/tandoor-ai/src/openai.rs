//! OpenAI-compatible chat-completions implementation of the parsing
//! collaborator.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{AiLineItem, OrderTextParser};

/// Default bounded wait for one completion request.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const SYSTEM_PROMPT: &str = "You extract restaurant order lines from a spoken \
order confirmation. Respond with ONLY a JSON array, no prose, where each \
element is {\"quantity\": <int>, \"item\": <string>, \"spice_level\": <string \
or null>, \"notes\": <string or null>}. Use the customer's wording for item \
names. Omit anything that is not a food or drink item.";

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Endpoint base, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    /// Missing key means the collaborator is permanently unavailable.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Chat-completions backed [`OrderTextParser`].
pub struct OpenAiParser {
    client: reqwest::Client,
    config: AiConfig,
}

impl OpenAiParser {
    pub fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn request_completion(&self, order_text: &str, api_key: &str) -> Option<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": order_text},
            ],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| tracing::warn!(error = %e, "ai parser request failed"))
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "ai parser returned non-success status");
            return None;
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| tracing::warn!(error = %e, "ai parser response body unreadable"))
            .ok()?;
        parsed.choices.into_iter().next().map(|c| c.message.content)
    }
}

/// Strips an optional markdown code fence from around a JSON payload.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop a language tag like "json" on the opening fence line.
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl OrderTextParser for OpenAiParser {
    async fn parse_order_text(&self, order_text: &str) -> Option<Vec<AiLineItem>> {
        let Some(api_key) = self.config.api_key.clone() else {
            tracing::debug!("ai parser disabled: no api key configured");
            return None;
        };

        let timeout = Duration::from_secs(self.config.timeout_secs.max(1));
        let content =
            match tokio::time::timeout(timeout, self.request_completion(order_text, &api_key))
                .await
            {
                Ok(content) => content?,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.config.timeout_secs,
                        "ai parser timed out"
                    );
                    return None;
                }
            };

        match serde_json::from_str::<Vec<AiLineItem>>(strip_code_fence(&content)) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(error = %e, "ai parser returned unparseable content");
                None
            }
        }
    }
}
