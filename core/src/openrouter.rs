//! OpenRouter chat-completion client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const MAX_TOKENS: u32 = 150;
pub const TEMPERATURE: f32 = 0.8;
pub const APP_TITLE: &str = "AYA Trading Terminal";
/// Used when the completion comes back without any text
pub const DEFAULT_MESSAGE: &str = "Analyzing market data...";


#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn first_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
    }
}


#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    url: Arc<String>,
    api_key: Arc<String>,
}

impl OpenRouterClient {
    pub fn new_w_client(client: reqwest::Client, url: String, api_key: String) -> Self {
        Self {
            client,
            url: Arc::new(url),
            api_key: Arc::new(api_key),
        }
    }

    /// Send `prompt` as a single user message and return the first choice's text.
    pub async fn complete(&self, prompt: &str, referer: &str) -> Result<String> {
        debug!("[OpenRouter] completing {} char prompt", prompt.chars().count());

        let body = ChatRequest {
            model: MODEL,
            messages: [ChatMessage { role: "user", content: prompt }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let res = self.client.post(self.url.as_str())
            .bearer_auth(self.api_key.as_str())
            .header("HTTP-Referer", referer)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus { service: "OpenRouter", status });
        }

        let res: ChatResponse = res.json().await?;
        Ok(res.first_text())
    }
}
