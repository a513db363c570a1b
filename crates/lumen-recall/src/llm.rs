//! HTTP chat-completions client used as the default reasoner.

use crate::protocol;
use crate::reasoner::{Reasoner, ReasonerError};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default sampling temperature, kept low to discourage invention.
const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Default completion budget.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Reasoner backed by an OpenAI-compatible chat-completions endpoint.
pub struct HttpReasoner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HttpReasoner {
    /// Create a client for `base_url` (without the `/chat/completions`
    /// suffix) using `model`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the completion budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Reasoner for HttpReasoner {
    async fn reason(&self, query: &str, evidence: &str) -> Result<String, ReasonerError> {
        if self.api_key.is_empty() {
            return Err(ReasonerError::Unavailable("no API key configured".to_string()));
        }
        let user_turn = protocol::reasoner_input(query, evidence);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: protocol::REASONER_INSTRUCTIONS,
                },
                ChatMessage {
                    role: "user",
                    content: &user_turn,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            "requesting grounded answer (model={}, query_len={})",
            self.model,
            query.len()
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ReasonerError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReasonerError::Status(status.as_u16()));
        }
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ReasonerError::Transport(err.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ReasonerError::MissingContent)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpReasoner;
    use crate::reasoner::{Reasoner, ReasonerError};

    #[tokio::test]
    async fn missing_api_key_reports_unavailable() {
        let reasoner = HttpReasoner::new("https://api.example.com/v1", "", "test-model");
        let result = reasoner.reason("where are my keys", "[1] ...").await;
        assert!(matches!(result, Err(ReasonerError::Unavailable(_))));
    }
}
