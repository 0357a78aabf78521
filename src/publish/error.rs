use crate::llm::error::truncate;

/// Errors from git and the pull-request backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// A command ran and exited unsuccessfully
    Command {
        program: String,
        args: Vec<String>,
        stderr: String,
        code: Option<i32>,
    },
    /// A command could not be started at all
    Spawn { program: String, message: String },
    /// HTTP request failed before a response arrived
    Http(String),
    /// REST API answered with a non-success status
    Api { status: u16, body: String },
    /// No backend can perform this operation
    Unavailable(&'static str),
    /// The pull request was already created with this number
    AlreadyCreated(u64),
    /// Output could not be interpreted
    UnexpectedOutput(String),
    /// An operation needed a pull request but none is open
    NoPullRequest,
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::Command {
                program,
                args,
                stderr,
                code,
            } => {
                let subcommand = args.first().map(String::as_str).unwrap_or_default();
                let status = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                write!(f, "`{} {}` failed ({}): {}", program, subcommand, status, stderr.trim())
            }
            PublishError::Spawn { program, message } => {
                write!(f, "Failed to run `{}`: {}", program, message)
            }
            PublishError::Http(msg) => write!(f, "HTTP error: {}", msg),
            PublishError::Api { status, body } => {
                write!(f, "GitHub API error ({}): {}", status, truncate(body, 200))
            }
            PublishError::Unavailable(what) => write!(f, "No backend available to {}", what),
            PublishError::AlreadyCreated(number) => {
                write!(f, "Pull request #{} was already created", number)
            }
            PublishError::UnexpectedOutput(msg) => write!(f, "Unexpected output: {}", msg),
            PublishError::NoPullRequest => write!(f, "No pull request is open"),
        }
    }
}

impl std::error::Error for PublishError {}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Http(err.to_string())
    }
}

pub type PublishResult<T> = Result<T, PublishError>;
