//! Running external programs (`git`, `gh`).

use std::{path::PathBuf, process::Command};

use crate::publish::error::{PublishError, PublishResult};

/// Exit code and captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and capture its output.
    ///
    /// Only fails when the program could not be started; a non-zero exit is
    /// reported through [`CommandOutput::code`].
    fn run(&self, program: &str, args: &[&str]) -> PublishResult<CommandOutput>;

    /// Like [`CommandRunner::run`], but a non-zero exit becomes an error.
    fn run_checked(&self, program: &str, args: &[&str]) -> PublishResult<CommandOutput> {
        let output = self.run(program, args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(PublishError::Command {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
                stderr: output.stderr,
                code: output.code,
            })
        }
    }
}

/// Runs real processes in a fixed working directory.
pub struct SystemRunner {
    workdir: PathBuf,
    envs: Vec<(String, String)>,
}

impl SystemRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable for every command this runner starts.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> PublishResult<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| PublishError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
