//! In-memory doubles for the publish layer's unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::publish::{
    command::{CommandOutput, CommandRunner},
    error::{PublishError, PublishResult},
    pull_request::{NewPullRequest, PullRequestPort},
};

/// Records every command line and answers from canned output.
#[derive(Default)]
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    answers: Vec<(&'static str, String)>,
    failures: Vec<&'static str>,
}

impl RecordingRunner {
    /// Print `stdout` for command lines starting with `prefix`.
    pub(crate) fn answer(mut self, prefix: &'static str, stdout: &str) -> Self {
        self.answers.push((prefix, stdout.to_string()));
        self
    }

    /// Exit 1 for command lines containing `needle`.
    pub(crate) fn fail_on(mut self, needle: &'static str) -> Self {
        self.failures.push(needle);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> PublishResult<CommandOutput> {
        let line = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(line.clone());

        if self.failures.iter().any(|needle| line.contains(needle)) {
            return Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "boom".to_string(),
            });
        }
        let stdout = self
            .answers
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, stdout)| stdout.clone())
            .unwrap_or_default();
        Ok(CommandOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }
}

/// Pull request port that hands out numbers and logs calls.
pub(crate) struct RecordingPort {
    pub(crate) number: u64,
    pub(crate) fail_create: bool,
    pub(crate) fail_update: bool,
    pub(crate) fail_ready: bool,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingPort {
    pub(crate) fn new(number: u64) -> Self {
        Self {
            number,
            fail_create: false,
            fail_update: false,
            fail_ready: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn log(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl PullRequestPort for RecordingPort {
    async fn create(&self, request: &NewPullRequest) -> PublishResult<u64> {
        self.log(format!(
            "create draft={} head={} base={} title={}",
            request.draft, request.head, request.base, request.title
        ));
        if self.fail_create {
            Err(PublishError::Http("create refused".to_string()))
        } else {
            Ok(self.number)
        }
    }

    async fn update(&self, number: u64, title: &str, _body: &str) -> PublishResult<()> {
        self.log(format!("update #{} title={}", number, title));
        if self.fail_update {
            Err(PublishError::Http("update refused".to_string()))
        } else {
            Ok(())
        }
    }

    async fn mark_ready(&self, number: u64) -> PublishResult<()> {
        self.log(format!("ready #{}", number));
        if self.fail_ready {
            Err(PublishError::Unavailable("mark a pull request ready"))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}
