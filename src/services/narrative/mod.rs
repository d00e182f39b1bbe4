//! Narrative transformer backed by the xAI chat-completion API.
//!
//! The transformer never fails its caller: an empty completion yields a
//! fixed placeholder and any request error is logged and turned into
//! displayable text. Degradation is explicit in the returned outcome.

pub mod sanitize;

use std::time::Duration;

use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::NarrationStyle;

const XAI_API_BASE: &str = "https://api.x.ai/v1";
const CHAT_MODEL: &str = "grok-beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Shown instead of an empty completion so the user never sees a blank narrative.
pub const EMPTY_RESPONSE_FALLBACK: &str = "The abyss remains silent. Try again, mortal.";

/// Result of a transform. Text always flows to the caller; `Degraded`
/// carries placeholder or error text instead of generated prose.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Generated(String),
    Degraded(String),
}

impl NarrativeOutcome {
    pub fn text(&self) -> &str {
        match self {
            NarrativeOutcome::Generated(text) | NarrativeOutcome::Degraded(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, NarrativeOutcome::Degraded(_))
    }
}

// Chat message structure for the xAI API
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

// xAI API request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

// xAI API response
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Client for the chat-completion service.
#[derive(Debug, Clone)]
pub struct NarrativeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NarrativeClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, XAI_API_BASE.to_string())
    }

    /// Client pointed at a custom endpoint; used by tests with a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Rewrites `text` into a gothic narrative in the given style.
    pub async fn transform(&self, text: &str, style: NarrationStyle) -> NarrativeOutcome {
        match self.request_completion(text, style).await {
            Ok(content) if content.trim().is_empty() => {
                warn!("Empty completion from the chat API, using the fallback narrative");
                NarrativeOutcome::Degraded(EMPTY_RESPONSE_FALLBACK.to_string())
            }
            Ok(content) => NarrativeOutcome::Generated(content),
            Err(e) => {
                error!("Error transforming to gothic: {}", e);
                NarrativeOutcome::Degraded(format!("The dark powers have failed. Error: {}", e))
            }
        }
    }

    async fn request_completion(&self, text: &str, style: NarrationStyle) -> AppResult<String> {
        let request = ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: format!(
                        "You are a master of gothic horror literature. {} Use vivid, atmospheric language and maintain a dark, mysterious tone throughout.",
                        style.prompt()
                    ),
                },
                Message {
                    role: "user".to_string(),
                    content: format!(
                        "Transform this text into a gothic horror narrative:\n\n{}",
                        text
                    ),
                },
            ],
        };

        debug!("Sending chat completion request, style {}", style.name());
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat API error: HTTP {}, body: {}", status, body);
            return Err(AppError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let completion: ChatCompletion = response.json().await?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_exposes_text_and_degradation() {
        let generated = NarrativeOutcome::Generated("prose".to_string());
        assert_eq!(generated.text(), "prose");
        assert!(!generated.is_degraded());

        let degraded = NarrativeOutcome::Degraded(EMPTY_RESPONSE_FALLBACK.to_string());
        assert_eq!(degraded.text(), EMPTY_RESPONSE_FALLBACK);
        assert!(degraded.is_degraded());
    }

    #[test]
    fn every_style_has_a_distinct_prompt() {
        let mut prompts: Vec<&str> = NarrationStyle::ALL.iter().map(|s| s.prompt()).collect();
        prompts.sort();
        prompts.dedup();
        assert_eq!(prompts.len(), NarrationStyle::ALL.len());
    }
}
