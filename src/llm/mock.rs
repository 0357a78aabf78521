//! Mock chat provider for testing
//!
//! Deterministic and offline: lets the translation pipeline run without an API
//! key or network access.
//!
//! # Example
//!
//! ```ignore
//! use doctrans::llm::{MockChat, MockMode};
//!
//! let mock = MockChat::new(MockMode::Suffix("_fr".into()));
//! // "hello" comes back as "hello_fr"
//! ```

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::llm::{
    error::{TranslationError, TranslationResult},
    provider::{ChatProvider, ChatRequest, ChatResponse, Role, Usage},
};

/// How the mock answers a request
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append a suffix to the last user message: "hello" → "hello_fr"
    Suffix(String),

    /// Return the last user message unchanged
    Echo,

    /// Fail every call
    Error(TranslationError),

    /// Answer calls with these results in order, then fall back to `Echo`
    Script(Vec<TranslationResult<String>>),
}

/// Mock provider that also records every request it receives
#[derive(Debug)]
pub struct MockChat {
    mode: MockMode,
    script: Mutex<VecDeque<TranslationResult<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChat {
    pub fn new(mode: MockMode) -> Self {
        let script = match &mode {
            MockMode::Script(results) => results.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            mode,
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn answer(&self, prompt: &str) -> TranslationResult<String> {
        match &self.mode {
            MockMode::Suffix(suffix) => Ok(format!("{}{}", prompt, suffix)),
            MockMode::Echo => Ok(prompt.to_string()),
            MockMode::Error(err) => Err(err.clone()),
            MockMode::Script(_) => self
                .script
                .lock()
                .ok()
                .and_then(|mut script| script.pop_front())
                .unwrap_or_else(|| Ok(prompt.to_string())),
        }
    }
}

fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn chat(&self, request: &ChatRequest) -> TranslationResult<ChatResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let text = self.answer(prompt)?;
        let usage = Usage {
            prompt_tokens: request.messages.iter().map(|m| word_count(&m.content)).sum(),
            completion_tokens: word_count(&text),
        };
        Ok(ChatResponse { text, usage })
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
