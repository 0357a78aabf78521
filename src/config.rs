//! Run configuration.
//!
//! [`Config`] is built once from the parsed command line (which already merged
//! the environment) and passed by reference to every component. Nothing outside
//! this module reads the process environment.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

use crate::{
    cli::args::{ModelArgs, PathArgs, PublishArgs, TranslateCommand},
    utils::{lang_tag, mask_secret},
};

/// Environment variables checked, in order, when `GITHUB_TOKEN` is absent.
pub const TOKEN_FALLBACK_VARS: &[&str] = &["INPUT_GITHUB_TOKEN", "INPUT_TOKEN"];

pub const DEFAULT_BASE_BRANCH: &str = "main";

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub target_lang: String,
    /// Raw input list; `None` when nothing was given.
    pub input_spec: Option<String>,
    pub output_pattern: String,
    pub refine: Option<RefineSettings>,
    pub prompts: Prompts,
    pub pr_title: String,
    pub commit_message: String,
    pub github: GithubSettings,
    /// Commit, push and open a pull request.
    pub publish: bool,
    pub workdir: PathBuf,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefineSettings {
    pub model: String,
    pub temperature: f32,
}

/// Prompt texts, already loaded from files where a path was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
    pub refine_system: String,
    pub refine_user: String,
}

#[derive(Clone, Default)]
pub struct GithubSettings {
    pub token: Option<String>,
    /// `owner/repo`.
    pub repository: Option<String>,
    pub api_url: String,
    pub base_branch: String,
}

impl GithubSettings {
    /// Split `owner/repo`.
    pub fn owner_repo(&self) -> Option<(&str, &str)> {
        self.repository.as_deref()?.split_once('/')
    }

    /// The token and repository the REST API needs, when both are known.
    pub fn rest_credentials(&self) -> Option<(&str, &str, &str)> {
        let token = self.token.as_deref()?;
        let (owner, repo) = self.owner_repo()?;
        Some((token, owner, repo))
    }
}

impl fmt::Debug for GithubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubSettings")
            .field("token", &self.token.as_deref().map(mask_secret))
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("base_branch", &self.base_branch)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("target_lang", &self.target_lang)
            .field("input_spec", &self.input_spec)
            .field("output_pattern", &self.output_pattern)
            .field("refine", &self.refine)
            .field("pr_title", &self.pr_title)
            .field("github", &self.github)
            .field("publish", &self.publish)
            .field("workdir", &self.workdir)
            .finish()
    }
}

impl Config {
    /// Build and validate the configuration for the `translate` command.
    pub fn from_args(cmd: &TranslateCommand) -> Result<Self> {
        let TranslateCommand {
            paths,
            model,
            publish,
        } = cmd;
        let PathArgs {
            input_files,
            output_files,
            target_lang,
            workdir,
            verbose,
        } = paths;
        let ModelArgs {
            api_key,
            base_url,
            ai_model,
            temperature,
            refine_enabled,
            refine_ai_model,
            refine_temperature,
            system_prompt,
            prompt,
            refine_system_prompt,
            refine_prompt,
        } = model;

        let target_lang = target_lang.trim().to_string();
        let model_name = ai_model.trim().to_string();

        let refine = refine_enabled.then(|| RefineSettings {
            model: non_empty(refine_ai_model.as_deref()).unwrap_or_else(|| model_name.clone()),
            temperature: refine_temperature.unwrap_or(*temperature),
        });

        let prompts = Prompts {
            system: load_prompt(system_prompt, workdir, &target_lang)?,
            user: load_prompt(prompt, workdir, &target_lang)?,
            refine_system: load_prompt(refine_system_prompt, workdir, &target_lang)?,
            refine_user: load_prompt(refine_prompt, workdir, &target_lang)?,
        };

        let config = Config {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            model: model_name,
            temperature: *temperature,
            target_lang,
            input_spec: non_empty(Some(input_files.as_str())),
            output_pattern: output_files.trim().to_string(),
            refine,
            prompts,
            pr_title: publish.pr_title.trim().to_string(),
            commit_message: publish.commit_message.clone(),
            github: github_settings(publish),
            publish: publish.publish,
            workdir: workdir.clone(),
            verbose: *verbose,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            bail!("API_KEY environment variable is required");
        }
        if self.output_pattern.is_empty() {
            bail!("OUTPUT_FILES environment variable is required");
        }
        if self.model.is_empty() {
            bail!("AI_MODEL must not be empty");
        }
        if self.target_lang.is_empty() {
            bail!("TARGET_LANG must not be empty");
        }
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            bail!(
                "TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.temperature
            );
        }
        if let Some(refine) = &self.refine
            && !TEMPERATURE_RANGE.contains(&refine.temperature)
        {
            bail!(
                "REFINE_TEMPERATURE must be between 0.0 and 2.0, got {}",
                refine.temperature
            );
        }
        if let Some(repository) = &self.github.repository {
            let valid = repository
                .split_once('/')
                .is_some_and(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'));
            if !valid {
                bail!("GITHUB_REPOSITORY must be in owner/repo form, got \"{}\"", repository);
            }
        }
        if !self.workdir.is_dir() {
            bail!("Working directory does not exist: {}", self.workdir.display());
        }
        Ok(())
    }

    pub fn lang_tag(&self) -> String {
        lang_tag(&self.target_lang)
    }

    /// Render the commit message for one translated file.
    pub fn commit_message_for(&self, source: &str, output: &str) -> String {
        self.commit_message
            .replace("{file}", source)
            .replace("{output}", output)
            .replace("{lang}", &self.target_lang)
            .replace("{model}", &self.model)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn github_settings(args: &PublishArgs) -> GithubSettings {
    let token = non_empty(args.github_token.as_deref()).or_else(|| {
        TOKEN_FALLBACK_VARS
            .iter()
            .find_map(|name| non_empty(std::env::var(name).ok().as_deref()))
    });

    GithubSettings {
        token,
        repository: non_empty(args.github_repository.as_deref()),
        api_url: args.github_api_url.trim().trim_end_matches('/').to_string(),
        base_branch: base_branch_from_ref(args.github_ref.as_deref()),
    }
}

/// `refs/heads/<branch>` names the base branch; anything else falls back to `main`.
pub fn base_branch_from_ref(git_ref: Option<&str>) -> String {
    git_ref
        .and_then(|r| r.trim().strip_prefix("refs/heads/"))
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BASE_BRANCH)
        .to_string()
}

/// A prompt value is either inline text or the path of a file holding it.
///
/// `{lang}` and `{target_lang}` are replaced with the target language.
fn load_prompt(value: &str, workdir: &Path, target_lang: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let candidates = [PathBuf::from(value), workdir.join(value)];
    let text = match candidates.iter().find(|p| p.is_file()) {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file: {}", path.display()))?,
        None => value.to_string(),
    };

    Ok(text
        .replace("{target_lang}", target_lang)
        .replace("{lang}", target_lang))
}
