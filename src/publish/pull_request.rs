//! Pull request backends: the `gh` CLI and the GitHub REST API.
//!
//! [`PullRequestService`] probes what is available once and then routes each
//! operation through its preferred backend, falling back to the other.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::GithubSettings,
    publish::{
        command::CommandRunner,
        error::{PublishError, PublishResult},
    },
};

static PULL_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/pull/(\d+)").expect("Invalid regex pattern for pull request URL")
});

/// Everything needed to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub draft: bool,
}

#[async_trait]
pub trait PullRequestPort: Send + Sync {
    /// Open a pull request and return its number.
    async fn create(&self, request: &NewPullRequest) -> PublishResult<u64>;

    async fn update(&self, number: u64, title: &str, body: &str) -> PublishResult<()>;

    /// Take a draft pull request out of draft.
    async fn mark_ready(&self, number: u64) -> PublishResult<()>;

    fn name(&self) -> &str;
}

/// Pull out the number from `gh pr create` output (the new PR's URL).
pub fn parse_pull_number(output: &str) -> Option<u64> {
    PULL_URL_REGEX
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `gh pr ...` through a [`CommandRunner`].
pub struct GhCli {
    runner: Arc<dyn CommandRunner>,
}

impl GhCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Whether `gh` can be executed at all.
    pub fn probe(runner: &dyn CommandRunner) -> bool {
        runner
            .run("gh", &["--version"])
            .is_ok_and(|output| output.success())
    }
}

#[async_trait]
impl PullRequestPort for GhCli {
    async fn create(&self, request: &NewPullRequest) -> PublishResult<u64> {
        let mut args = vec![
            "pr",
            "create",
            "--title",
            request.title.as_str(),
            "--body",
            request.body.as_str(),
            "--base",
            request.base.as_str(),
            "--head",
            request.head.as_str(),
        ];
        if request.draft {
            args.push("--draft");
        }

        let output = self.runner.run_checked("gh", &args)?;
        parse_pull_number(&output.stdout).ok_or_else(|| {
            PublishError::UnexpectedOutput(format!(
                "no pull request URL in `gh pr create` output: {}",
                output.stdout.trim()
            ))
        })
    }

    async fn update(&self, number: u64, title: &str, body: &str) -> PublishResult<()> {
        let number = number.to_string();
        self.runner.run_checked(
            "gh",
            &["pr", "edit", number.as_str(), "--title", title, "--body", body],
        )?;
        Ok(())
    }

    async fn mark_ready(&self, number: u64) -> PublishResult<()> {
        let number = number.to_string();
        self.runner.run_checked("gh", &["pr", "ready", number.as_str()])?;
        Ok(())
    }

    fn name(&self) -> &str {
        "gh CLI"
    }
}

#[derive(Debug, Deserialize)]
struct CreatedPull {
    number: u64,
}

/// GitHub REST API (`/repos/{owner}/{repo}/pulls`).
#[derive(Clone)]
pub struct GithubRest {
    client: reqwest::Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GithubRest {
    pub fn new(api_url: &str, token: &str, owner: &str, repo: &str) -> PublishResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn pulls_url(&self) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_url, self.owner, self.repo)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> PublishResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(body)
        } else {
            Err(PublishError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl std::fmt::Debug for GithubRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubRest")
            .field("api_url", &self.api_url)
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

#[async_trait]
impl PullRequestPort for GithubRest {
    async fn create(&self, request: &NewPullRequest) -> PublishResult<u64> {
        let payload = json!({
            "title": request.title,
            "body": request.body,
            "head": request.head,
            "base": request.base,
            "draft": request.draft,
        });
        let body = self
            .send(self.request(reqwest::Method::POST, self.pulls_url()).json(&payload))
            .await?;
        let created: CreatedPull = serde_json::from_str(&body).map_err(|e| {
            PublishError::UnexpectedOutput(format!("pull request response: {}", e))
        })?;
        Ok(created.number)
    }

    async fn update(&self, number: u64, title: &str, body: &str) -> PublishResult<()> {
        let url = format!("{}/{}", self.pulls_url(), number);
        let payload = json!({ "title": title, "body": body });
        self.send(self.request(reqwest::Method::PATCH, url).json(&payload))
            .await?;
        Ok(())
    }

    async fn mark_ready(&self, _number: u64) -> PublishResult<()> {
        // The REST API has no ready-for-review endpoint.
        Err(PublishError::Unavailable("mark a pull request ready over REST"))
    }

    fn name(&self) -> &str {
        "GitHub REST API"
    }
}

/// The backends found by probing, tried in a fixed order per operation.
///
/// Create goes CLI then REST, update goes REST then CLI, ready is CLI only.
#[derive(Default)]
pub struct PullRequestService {
    cli: Option<Box<dyn PullRequestPort>>,
    rest: Option<Box<dyn PullRequestPort>>,
}

impl PullRequestService {
    pub fn new(
        cli: Option<Box<dyn PullRequestPort>>,
        rest: Option<Box<dyn PullRequestPort>>,
    ) -> Self {
        Self { cli, rest }
    }

    /// Probe `gh` once and build REST from credentials, if present.
    pub fn probe(runner: Arc<dyn CommandRunner>, github: &GithubSettings) -> PublishResult<Self> {
        let cli = GhCli::probe(runner.as_ref())
            .then(|| Box::new(GhCli::new(runner.clone())) as Box<dyn PullRequestPort>);
        let rest = match github.rest_credentials() {
            Some((token, owner, repo)) => Some(
                Box::new(GithubRest::new(&github.api_url, token, owner, repo)?)
                    as Box<dyn PullRequestPort>,
            ),
            None => None,
        };
        Ok(Self { cli, rest })
    }

    pub fn backends(&self) -> Vec<&str> {
        self.cli
            .iter()
            .chain(self.rest.iter())
            .map(|port| port.name())
            .collect()
    }

    pub fn is_available(&self) -> bool {
        self.cli.is_some() || self.rest.is_some()
    }
}

fn in_order<'a>(
    first: &'a Option<Box<dyn PullRequestPort>>,
    second: &'a Option<Box<dyn PullRequestPort>>,
) -> impl Iterator<Item = &'a dyn PullRequestPort> {
    first.iter().chain(second.iter()).map(|port| port.as_ref())
}

#[async_trait]
impl PullRequestPort for PullRequestService {
    async fn create(&self, request: &NewPullRequest) -> PublishResult<u64> {
        let mut last_error = PublishError::Unavailable("create a pull request");
        for port in in_order(&self.cli, &self.rest) {
            match port.create(request).await {
                Ok(number) => return Ok(number),
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }

    async fn update(&self, number: u64, title: &str, body: &str) -> PublishResult<()> {
        let mut last_error = PublishError::Unavailable("update a pull request");
        for port in in_order(&self.rest, &self.cli) {
            match port.update(number, title, body).await {
                Ok(()) => return Ok(()),
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }

    async fn mark_ready(&self, number: u64) -> PublishResult<()> {
        match &self.cli {
            Some(cli) => cli.mark_ready(number).await,
            None => Err(PublishError::Unavailable("mark a pull request ready")),
        }
    }

    fn name(&self) -> &str {
        "pull request service"
    }
}
