//! LLM client layer
//!
//! - [`ChatProvider`]: the one capability the pipeline needs from a model backend
//! - [`OpenAiCompatible`]: HTTP provider for OpenAI-style chat-completions endpoints
//! - [`MockChat`]: offline provider for tests
//! - [`ContentTranslator`]: translate and refine passes with usage accounting

pub mod error;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod translator;

pub use error::{TranslationError, TranslationResult};
pub use mock::{MockChat, MockMode};
pub use openai::OpenAiCompatible;
pub use provider::{ChatMessage, ChatProvider, ChatRequest, ChatResponse, Role, Usage};
pub use translator::{
    ContentTranslator, RefineOutcome, Refinement, Translation, TranslationStatistics,
    TranslatorSettings,
};
