//! Chat-completions gateway client

use super::types::{ChatMessage, ChatRole};
use super::{Advisor, AdvisoryError};
use crate::config::AdvisoryConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Request timeout; elapsed timeouts are fatal to the turn.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Advisory client for an OpenAI-style chat-completions endpoint
pub struct GatewayAdvisor {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GatewayAdvisor {
    pub fn new(config: &AdvisoryConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn build_request(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        latest: &str,
    ) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: wire_role(ChatRole::System),
            content: system_prompt.to_string(),
        });
        messages.extend(history.iter().map(|m| WireMessage {
            role: wire_role(m.role),
            content: m.content.clone(),
        }));
        messages.push(WireMessage {
            role: wire_role(ChatRole::User),
            content: latest.to_string(),
        });

        CompletionRequest {
            model: self.model.clone(),
            messages,
        }
    }

    fn classify_error(&self, status: reqwest::StatusCode, body: &str) -> AdvisoryError {
        match status.as_u16() {
            401 | 403 => AdvisoryError::auth(format!("Authentication failed: {body}")),
            400 => AdvisoryError::invalid_request(format!("Invalid request: {body}")),
            500..=599 => AdvisoryError::server_error(format!("Server error: {body}")),
            _ => AdvisoryError::unknown(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl Advisor for GatewayAdvisor {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        latest: &str,
    ) -> Result<String, AdvisoryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AdvisoryError::configuration("Advisory API key not configured"))?;

        let request = self.build_request(system_prompt, history, latest);

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisoryError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    AdvisoryError::network(format!("Connection failed: {e}"))
                } else {
                    AdvisoryError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdvisoryError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(self.classify_error(status, &body));
        }

        let completion: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisoryError::unknown(format!("Failed to parse response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AdvisoryError::unknown("Response contained no choices"))
    }
}

fn wire_role(role: ChatRole) -> String {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
        ChatRole::Agent => "agent",
    }
    .to_string()
}

// Gateway API types

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}
