//! Translation and refinement passes over one document.
//!
//! [`ContentTranslator`] turns a document into one chat request for the
//! primary model and, when refinement is configured, a second request for the
//! refinement model. It keeps running token and call counters for the whole run.

use std::sync::Arc;

use crate::{
    config::{Config, Prompts, RefineSettings},
    llm::{
        error::{TranslationError, TranslationResult},
        provider::{ChatMessage, ChatProvider, ChatRequest, Usage},
    },
};

/// Counters accumulated over every call a translator made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStatistics {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub api_calls: u64,
}

impl TranslationStatistics {
    fn record(&mut self, usage: Option<Usage>) {
        self.api_calls += 1;
        if let Some(usage) = usage {
            self.input_tokens += usage.prompt_tokens;
            self.output_tokens += usage.completion_tokens;
        }
    }
}

/// A successful primary translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineOutcome {
    /// Refinement is turned off.
    Skipped,
    Applied,
    /// The refinement call failed; the text is the unrefined translation.
    FellBack(TranslationError),
}

/// Result of [`ContentTranslator::refine`]. `text` is always usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refinement {
    pub text: String,
    pub outcome: RefineOutcome,
}

/// Models, temperatures and prompts the translator sends.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorSettings {
    pub model: String,
    pub temperature: f32,
    pub refine: Option<RefineSettings>,
    pub prompts: Prompts,
}

impl TranslatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            refine: config.refine.clone(),
            prompts: config.prompts.clone(),
        }
    }
}

pub struct ContentTranslator {
    provider: Arc<dyn ChatProvider>,
    settings: TranslatorSettings,
    stats: TranslationStatistics,
}

impl ContentTranslator {
    pub fn new(provider: Arc<dyn ChatProvider>, settings: TranslatorSettings) -> Self {
        Self {
            provider,
            settings,
            stats: TranslationStatistics::default(),
        }
    }

    /// Translate `text` with the primary model.
    ///
    /// A failed call still counts towards `api_calls`; token counters only move
    /// when the endpoint answered, including with blank content.
    pub async fn translate(&mut self, text: &str) -> TranslationResult<Translation> {
        let prompts = &self.settings.prompts;
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: build_messages(&prompts.system, &prompts.user, text),
            temperature: self.settings.temperature,
        };

        let result = self.provider.chat(&request).await;
        self.stats.record(result.as_ref().ok().map(|r| r.usage));

        let response = result?;
        if response.text.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(Translation {
            text: response.text,
            usage: response.usage,
        })
    }

    /// Run the refinement pass over `translated`.
    ///
    /// Never loses the primary translation: when refinement is off or the call
    /// fails, the returned text is `translated` unchanged.
    pub async fn refine(&mut self, translated: &str, original: Option<&str>) -> Refinement {
        let Some(refine) = &self.settings.refine else {
            return Refinement {
                text: translated.to_string(),
                outcome: RefineOutcome::Skipped,
            };
        };

        let body = match original.filter(|o| !o.is_empty()) {
            Some(original) => format!(
                "Original text:\n{}\n\nTranslated text to refine:\n{}",
                original, translated
            ),
            None => translated.to_string(),
        };
        let prompts = &self.settings.prompts;
        let request = ChatRequest {
            model: refine.model.clone(),
            messages: build_messages(&prompts.refine_system, &prompts.refine_user, &body),
            temperature: refine.temperature,
        };

        let result = self.provider.chat(&request).await;
        self.stats.record(result.as_ref().ok().map(|r| r.usage));

        match result {
            Ok(response) if !response.text.trim().is_empty() => Refinement {
                text: response.text,
                outcome: RefineOutcome::Applied,
            },
            Ok(_) => Refinement {
                text: translated.to_string(),
                outcome: RefineOutcome::FellBack(TranslationError::EmptyResponse),
            },
            Err(err) => Refinement {
                text: translated.to_string(),
                outcome: RefineOutcome::FellBack(err),
            },
        }
    }

    /// Snapshot of the counters so far.
    pub fn statistics(&self) -> TranslationStatistics {
        self.stats
    }
}

/// System message when one is set, then the instruction and body as the user message.
fn build_messages(system: &str, instruction: &str, body: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(ChatMessage::system(system));
    }
    let user = if instruction.is_empty() {
        body.to_string()
    } else {
        format!("{}\n\n{}", instruction, body)
    };
    messages.push(ChatMessage::user(user));
    messages
}
