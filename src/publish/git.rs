//! Git operations used while publishing translations.

use std::{path::PathBuf, sync::Arc};

use crate::publish::{
    command::{CommandOutput, CommandRunner},
    error::PublishResult,
};

pub const BOT_NAME: &str = "github-actions[bot]";
pub const BOT_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

/// Token and repository used to push from CI.
///
/// Applied by [`Git::configure_ci`] once a run actually has something to publish.
#[derive(Clone, Default)]
pub struct CiIdentity {
    pub token: Option<String>,
    /// `owner/repo`.
    pub repository: Option<String>,
}

/// Thin wrapper over a [`CommandRunner`] that speaks git.
#[derive(Clone)]
pub struct Git {
    runner: Arc<dyn CommandRunner>,
    workdir: PathBuf,
}

impl Git {
    pub fn new(runner: Arc<dyn CommandRunner>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> PublishResult<CommandOutput> {
        self.runner.run_checked("git", args)
    }

    /// Trust the checkout, commit as the Actions bot and push with `token`.
    ///
    /// `safe.directory` is best effort; identity and remote failures are errors.
    pub fn configure_ci(&self, token: Option<&str>, repository: Option<&str>) -> PublishResult<()> {
        let safe_dir = self.workdir.to_string_lossy().into_owned();
        let _ = self.runner.run(
            "git",
            &["config", "--global", "--add", "safe.directory", safe_dir.as_str()],
        );

        self.git(&["config", "--global", "user.name", BOT_NAME])?;
        self.git(&["config", "--global", "user.email", BOT_EMAIL])?;

        if let (Some(token), Some(repository)) = (token, repository) {
            let remote_url = authenticated_remote(token, repository);
            self.git(&["remote", "set-url", "origin", remote_url.as_str()])?;
        }
        Ok(())
    }

    /// Switch to `branch`, creating it when it does not exist locally.
    pub fn checkout_branch(&self, branch: &str) -> PublishResult<()> {
        let existing = self.git(&["branch", "--list", branch])?;
        if existing.stdout.trim().is_empty() {
            self.git(&["checkout", "-b", branch])?;
        } else {
            self.git(&["checkout", branch])?;
        }
        Ok(())
    }

    pub fn commit_empty(&self, message: &str) -> PublishResult<()> {
        self.git(&["commit", "--allow-empty", "-m", message])?;
        Ok(())
    }

    /// Whether any of `paths` differ from the index or are untracked.
    pub fn has_changes(&self, paths: &[String]) -> PublishResult<bool> {
        let mut args = vec!["status", "--porcelain", "--"];
        args.extend(paths.iter().map(String::as_str));
        let status = self.git(&args)?;
        Ok(!status.stdout.trim().is_empty())
    }

    pub fn add(&self, paths: &[String]) -> PublishResult<()> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)?;
        Ok(())
    }

    /// Commit exactly `paths`, ignoring anything else staged.
    pub fn commit_paths(&self, paths: &[String], message: &str) -> PublishResult<()> {
        let mut args = vec!["commit", "-m", message, "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)?;
        Ok(())
    }

    pub fn push(&self, branch: &str) -> PublishResult<()> {
        self.git(&["push", "-u", "origin", branch])?;
        Ok(())
    }

    /// Stage, commit and push `paths` as one commit.
    ///
    /// Returns `false` without committing when none of the paths changed.
    pub fn commit_and_push(
        &self,
        paths: &[String],
        message: &str,
        branch: &str,
    ) -> PublishResult<bool> {
        if !self.has_changes(paths)? {
            return Ok(false);
        }
        self.add(paths)?;
        self.commit_paths(paths, message)?;
        self.push(branch)?;
        Ok(true)
    }
}

fn authenticated_remote(token: &str, repository: &str) -> String {
    format!(
        "https://x-access-token:{}@github.com/{}.git",
        token, repository
    )
}
