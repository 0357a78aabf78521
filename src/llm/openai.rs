//! OpenAI-compatible chat-completions provider
//!
//! Talks to `{base_url}/chat/completions` with a bearer token. Works with
//! OpenAI, OpenRouter and any other server implementing the same wire format.
//!
//! # Example
//!
//! ```ignore
//! use doctrans::llm::{ChatMessage, ChatProvider, ChatRequest, OpenAiCompatible};
//!
//! let provider = OpenAiCompatible::new("sk-...".into(), "https://openrouter.ai/api/v1".into())?;
//! let response = provider
//!     .chat(&ChatRequest {
//!         model: "gpt-4".into(),
//!         messages: vec![ChatMessage::user("Bonjour")],
//!         temperature: 0.3,
//!     })
//!     .await?;
//! println!("{}", response.text);
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::{
    error::{TranslationError, TranslationResult},
    provider::{ChatProvider, ChatRequest, ChatResponse, Usage},
};

#[derive(Clone)]
pub struct OpenAiCompatible {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatible {
    /// Create a provider for `base_url` (e.g. `https://api.openai.com/v1`).
    ///
    /// No request timeout is set; the HTTP client's defaults apply.
    pub fn new(api_key: String, base_url: String) -> TranslationResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslationError::Config(
                "API key cannot be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TranslationError::Config(format!(
                "Base URL must start with http:// or https://: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pull the first choice's text and the usage block out of a response body.
///
/// Missing or null content comes back as an empty text so the usage is still
/// counted; callers reject blank text themselves.
fn parse_completion(body: &str) -> TranslationResult<ChatResponse> {
    let parsed: CompletionBody = serde_json::from_str(body)
        .map_err(|e| TranslationError::MalformedResponse(format!("Invalid JSON: {}", e)))?;

    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        TranslationError::MalformedResponse("missing 'choices' array".to_string())
    })?;

    Ok(ChatResponse {
        text: choice.message.content.unwrap_or_default(),
        usage: parsed.usage.unwrap_or_default(),
    })
}

impl std::fmt::Debug for OpenAiCompatible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatible")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatible {
    async fn chat(&self, request: &ChatRequest) -> TranslationResult<ChatResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if !status.is_success() {
            return Err(TranslationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }

    fn provider_name(&self) -> &str {
        "OpenAI-compatible"
    }
}
