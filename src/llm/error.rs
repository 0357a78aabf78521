/// Error types for the LLM client layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Client could not be configured (empty key, bad URL)
    Config(String),
    /// Request never produced a response (connection, timeout, TLS)
    Network(String),
    /// Endpoint answered with a non-success status
    Api { status: u16, body: String },
    /// Response body did not have the expected shape
    MalformedResponse(String),
    /// Response was well-formed but carried no text
    EmptyResponse,
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TranslationError::Network(msg) => write!(f, "Network error: {}", msg),
            TranslationError::Api { status, body } => {
                write!(f, "API error ({}): {}", status, truncate(body, 200))
            }
            TranslationError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            TranslationError::EmptyResponse => write!(f, "Model returned an empty response"),
        }
    }
}

impl std::error::Error for TranslationError {}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TranslationError::MalformedResponse(err.to_string())
        } else {
            TranslationError::Network(err.to_string())
        }
    }
}

/// Result type for LLM operations
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Shorten a response body for display, on a char boundary.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}…", &text[..index]),
        None => text.to_string(),
    }
}
