//! CLI argument definitions using clap.
//!
//! Every setting can come from a long flag or from the environment variable the
//! CI action exports, so local runs and workflow runs share one parser.
//!
//! ## Commands
//!
//! - `translate`: Translate the inputs, write outputs, publish a pull request
//! - `plan`: Show which outputs each input maps to, without translating

use std::path::PathBuf;

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, builder::BoolishValueParser};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Translate(cmd)) => cmd.paths.verbose,
            Some(Command::Plan(cmd)) => cmd.paths.verbose,
            None => false,
        }
    }
}

/// Arguments shared by all commands: what to read and where to write.
#[derive(Debug, Clone, Args)]
pub struct PathArgs {
    /// Files, directories or globs to translate (comma or space separated)
    #[arg(long = "input", env = "INPUT_FILES", default_value = "")]
    pub input_files: String,

    /// Output path pattern (supports `**`, `*`, {name}, {ext}, {lang})
    #[arg(long = "output", env = "OUTPUT_FILES")]
    pub output_files: String,

    /// Target language name, e.g. "Simplified-Chinese"
    #[arg(long, env = "TARGET_LANG", default_value = "Simplified-Chinese")]
    pub target_lang: String,

    /// Directory that input paths, outputs and git commands are relative to
    #[arg(short = 'C', long, env = "WORKSPACE_DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, env = "VERBOSE", action = ArgAction::Set, value_parser = BoolishValueParser::new(), num_args = 0..=1, default_missing_value = "true", default_value = "false")]
    pub verbose: bool,
}

/// Model and prompt settings.
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// API key for the OpenAI-compatible endpoint
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, env = "BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    pub base_url: String,

    /// Model used for translation
    #[arg(long = "model", env = "AI_MODEL", default_value = "gpt-4")]
    pub ai_model: String,

    /// Sampling temperature for translation
    #[arg(long, env = "TEMPERATURE", default_value_t = 0.3)]
    pub temperature: f32,

    /// Run a second refinement pass over each translation
    #[arg(long = "refine", env = "REFINE_ENABLED", action = ArgAction::Set, value_parser = BoolishValueParser::new(), default_value = "true")]
    pub refine_enabled: bool,

    /// Model used for refinement (defaults to --model)
    #[arg(long = "refine-model", env = "REFINE_AI_MODEL")]
    pub refine_ai_model: Option<String>,

    /// Sampling temperature for refinement (defaults to --temperature)
    #[arg(long, env = "REFINE_TEMPERATURE")]
    pub refine_temperature: Option<f32>,

    /// System prompt for translation (text, or path to a file)
    #[arg(long, env = "SYSTEM_PROMPT", default_value = "")]
    pub system_prompt: String,

    /// Instruction prepended to the text to translate (text, or path to a file)
    #[arg(long, env = "PROMPT", default_value = "")]
    pub prompt: String,

    /// System prompt for refinement (text, or path to a file)
    #[arg(long, env = "REFINE_SYSTEM_PROMPT", default_value = "")]
    pub refine_system_prompt: String,

    /// Instruction prepended to the refinement request (text, or path to a file)
    #[arg(long, env = "REFINE_PROMPT", default_value = "")]
    pub refine_prompt: String,
}

/// Git and pull request settings.
#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Commit translations and open a pull request (set by GitHub Actions)
    #[arg(long = "publish", env = "GITHUB_ACTIONS", action = ArgAction::Set, value_parser = BoolishValueParser::new(), num_args = 0..=1, default_missing_value = "true", default_value = "false")]
    pub publish: bool,

    /// Pull request title
    #[arg(long, env = "PR_TITLE", default_value = "Add LLM Translations")]
    pub pr_title: String,

    /// Commit message template ({file}, {output}, {lang}, {model})
    #[arg(
        long,
        env = "COMMIT_MESSAGE",
        default_value = "Translate {file} to {lang} ({model})"
    )]
    pub commit_message: String,

    /// GitHub token used for pushing and the REST API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository in owner/repo form
    #[arg(long = "repository", env = "GITHUB_REPOSITORY")]
    pub github_repository: Option<String>,

    /// GitHub REST API base URL
    #[arg(long = "api-url", env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// Ref the workflow runs on; `refs/heads/<branch>` becomes the PR base
    #[arg(long = "base-ref", env = "GITHUB_REF")]
    pub github_ref: Option<String>,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub paths: PathArgs,
    #[command(flatten)]
    pub model: ModelArgs,
    #[command(flatten)]
    pub publish: PublishArgs,
}

#[derive(Debug, Args)]
pub struct PlanCommand {
    #[command(flatten)]
    pub paths: PathArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate inputs, write outputs and publish them as a pull request
    Translate(TranslateCommand),
    /// Show the output path for every input without translating anything
    Plan(PlanCommand),
}
