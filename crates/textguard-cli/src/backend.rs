//! HTTP client for OpenAI-compatible chat completion endpoints
//!
//! One client serves two roles: it generates chat replies and it answers
//! the judge prompts of the topic and toxicity validators.

use crate::config::LlmConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use textguard_core::{Error, Result};
use textguard_validators::{render_prompt, Judge};
use tracing::{debug, warn};

const JUDGE_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Chat completion client
#[derive(Debug, Clone)]
pub struct ChatBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatBackend {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        let api_key = config.api_key_env.as_deref().and_then(|var| {
            let key = std::env::var(var).ok();
            if key.is_none() {
                warn!("API key variable '{}' is not set, sending unauthenticated requests", var);
            }
            key
        });

        Ok(Self {
            client,
            endpoint: completions_url(&config.base_url),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a conversation and return the first choice's content
    pub async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::judge(format!("Request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::judge(format!("Backend returned {}", status)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::judge(format!("Failed to decode response: {}", e)))?;

        first_choice(parsed)
    }
}

#[async_trait]
impl Judge for ChatBackend {
    async fn ask(&self, template: &str, variables: &[(&str, &str)]) -> Result<String> {
        let prompt = render_prompt(template, variables);
        debug!(model = %self.model, "Asking judge");
        self.complete(&[ChatMessage::user(prompt)], JUDGE_TEMPERATURE)
            .await
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::judge("Response contained no choices"))
}
