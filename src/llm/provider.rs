//! Chat provider trait
//!
//! The translator needs exactly one capability from a model backend: send a
//! list of chat messages to a model at a temperature and get text plus token
//! usage back. Any OpenAI-compatible endpoint qualifies; tests use
//! [`crate::llm::MockChat`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm::error::TranslationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Token usage reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub text: String,
    pub usage: Usage,
}

/// Generic trait for chat-completion backends
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one request and wait for the full response.
    async fn chat(&self, request: &ChatRequest) -> TranslationResult<ChatResponse>;

    /// Get the name of this provider, for logging.
    fn provider_name(&self) -> &str;
}
