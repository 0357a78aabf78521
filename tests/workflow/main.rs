use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use doctrans::{
    cli::{Arguments, Command},
    config::Config,
    core::{Event, FileStatus, RunReport, Workflow},
    llm::{ContentTranslator, MockChat, MockMode, TranslationError, TranslatorSettings},
    publish::{
        CiIdentity, CommandOutput, CommandRunner, Git, LifecycleStage, NewPullRequest,
        PublishError, PublishResult, PullRequestLifecycle, PullRequestPort,
    },
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Answers every command and remembers it. Fails command lines containing
/// `fail_on`.
#[derive(Default)]
struct FakeGit {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl FakeGit {
    fn failing_on(needle: &'static str) -> Self {
        Self {
            fail_on: Some(needle),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeGit {
    fn run(&self, program: &str, args: &[&str]) -> PublishResult<CommandOutput> {
        let line = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(line.clone());
        if self.fail_on.is_some_and(|needle| line.contains(needle)) {
            return Ok(CommandOutput {
                code: Some(128),
                stdout: String::new(),
                stderr: "fatal: unable to access remote".to_string(),
            });
        }
        let stdout = match args.first() {
            // Every written output shows up as untracked.
            Some(&"status") => format!("?? {}\n", args.last().unwrap_or(&"")),
            _ => String::new(),
        };
        Ok(CommandOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PortCall {
    Create { title: String, draft: bool },
    Update { title: String, body: String },
    Ready,
}

#[derive(Default, Clone)]
struct FakeGithub {
    calls: Arc<Mutex<Vec<PortCall>>>,
    fail_create: bool,
    fail_update: bool,
}

impl FakeGithub {
    fn calls(&self) -> Vec<PortCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestPort for FakeGithub {
    async fn create(&self, request: &NewPullRequest) -> PublishResult<u64> {
        self.calls.lock().unwrap().push(PortCall::Create {
            title: request.title.clone(),
            draft: request.draft,
        });
        if self.fail_create {
            return Err(PublishError::Http("403 Resource not accessible".to_string()));
        }
        Ok(42)
    }

    async fn update(&self, _number: u64, title: &str, body: &str) -> PublishResult<()> {
        self.calls.lock().unwrap().push(PortCall::Update {
            title: title.to_string(),
            body: body.to_string(),
        });
        if self.fail_update {
            return Err(PublishError::Http("502 Bad Gateway".to_string()));
        }
        Ok(())
    }

    async fn mark_ready(&self, _number: u64) -> PublishResult<()> {
        self.calls.lock().unwrap().push(PortCall::Ready);
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn write(root: &Path, path: &str, content: &str) -> Result<()> {
    let path = root.join(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn config(root: &Path, extra: &[&str]) -> Config {
    let mut argv = vec![
        "doctrans",
        "translate",
        "--api-key",
        "sk-test",
        "--target-lang",
        "French",
        "--refine",
        "false",
        "-C",
        root.to_str().unwrap(),
    ];
    argv.extend_from_slice(extra);
    match Arguments::try_parse_from(argv).unwrap().command {
        Some(Command::Translate(cmd)) => Config::from_args(&cmd).unwrap(),
        _ => panic!("expected translate command"),
    }
}

fn translator(config: &Config, mode: MockMode) -> ContentTranslator {
    ContentTranslator::new(
        Arc::new(MockChat::new(mode)),
        TranslatorSettings::from_config(config),
    )
}

fn publisher(runner: Arc<FakeGit>, github: FakeGithub, root: &Path) -> PullRequestLifecycle {
    let git = Git::new(runner, root);
    PullRequestLifecycle::new(git, Box::new(github), "main")
}

async fn run(
    config: &Config,
    mode: MockMode,
    publisher: PullRequestLifecycle,
) -> (Result<RunReport>, Vec<Event>) {
    let mut events: Vec<Event> = Vec::new();
    let report = Workflow::new(config, translator(config, mode), Some(publisher), &mut events)
        .with_branch_name("translation-test")
        .run()
        .await;
    (report, events)
}

fn file_commits(runner: &FakeGit) -> Vec<String> {
    runner
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("git commit -m"))
        .collect()
}

#[tokio::test]
async fn test_partial_failure_commits_written_files_only() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "docs/en/a.md", "Alpha")?;
    write(root, "docs/en/b.md", "Beta")?;
    write(root, "docs/en/c.md", "Gamma")?;

    let config = config(
        root,
        &["--input", "docs/en", "--output", "out/**/{name}.{lang}.md"],
    );
    let mode = MockMode::Script(vec![
        Ok("Alpha (fr)".to_string()),
        Ok("Beta (fr)".to_string()),
        Err(TranslationError::Network("connection reset".to_string())),
    ]);

    let runner = Arc::new(FakeGit::default());
    let github = FakeGithub::default();
    let mut events: Vec<Event> = Vec::new();
    let report = Workflow::new(
        &config,
        translator(&config, mode),
        Some(publisher(runner.clone(), github.clone(), root)),
        &mut events,
    )
    .with_branch_name("translation-test")
    .run()
    .await?;

    // Outputs
    assert_eq!(report.written_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.records[2].status, FileStatus::Failed);
    assert_eq!(fs::read_to_string(root.join("out/en/a.md"))?, "Alpha (fr)");
    assert_eq!(fs::read_to_string(root.join("out/en/b.md"))?, "Beta (fr)");
    assert!(!root.join("out/en/c.md").exists());

    // Commits: one per written file, plus the branch placeholder
    let calls = runner.calls();
    let file_commits: Vec<&String> = calls
        .iter()
        .filter(|c| c.starts_with("git commit -m"))
        .collect();
    assert_eq!(
        file_commits,
        vec![
            "git commit -m Translate docs/en/a.md to French (gpt-4) -- out/en/a.md",
            "git commit -m Translate docs/en/b.md to French (gpt-4) -- out/en/b.md",
        ]
    );
    assert_eq!(
        calls
            .iter()
            .filter(|c| c.starts_with("git commit --allow-empty"))
            .count(),
        1
    );

    // Pull request: draft, updated per commit, finalized with two rows
    let port_calls = github.calls.lock().unwrap().clone();
    assert_eq!(
        port_calls.first(),
        Some(&PortCall::Create {
            title: "[WIP] Add LLM Translations (0/3)".to_string(),
            draft: true,
        })
    );
    assert_eq!(port_calls.last(), Some(&PortCall::Ready));

    let Some(PortCall::Update { title, body }) = port_calls.get(port_calls.len() - 2) else {
        panic!("expected a final update before marking ready");
    };
    assert_eq!(title, "Add LLM Translations");
    let rows: Vec<&str> = body.lines().filter(|l| l.starts_with("| `")).collect();
    assert_eq!(
        rows,
        vec![
            "| `docs/en/a.md` | `out/en/a.md` | French |",
            "| `docs/en/b.md` | `out/en/b.md` | French |",
        ]
    );
    assert!(!body.contains("Progress:"));

    let progress_titles: Vec<String> = port_calls
        .iter()
        .filter_map(|call| match call {
            PortCall::Update { title, .. } if title.starts_with("[WIP]") => Some(title.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        progress_titles,
        vec!["[WIP] Add LLM Translations (1/3)", "[WIP] Add LLM Translations (2/3)"]
    );

    let pull_request = report.pull_request.expect("pull request outcome");
    assert_eq!(pull_request.branch, "translation-test");
    assert_eq!(pull_request.number, Some(42));
    assert_eq!(pull_request.stage, LifecycleStage::ReadyForReview);
    assert!(events.contains(&Event::Finalized { number: 42 }));

    Ok(())
}

#[tokio::test]
async fn test_single_file_pull_request_is_not_a_draft() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "README.md", "Hello")?;

    let config = config(root, &["--input", "./README.md", "--output", "i18n/*"]);
    let runner = Arc::new(FakeGit::default());
    let github = FakeGithub::default();
    let mut events: Vec<Event> = Vec::new();
    let report = Workflow::new(
        &config,
        translator(&config, MockMode::Suffix(" [fr]".to_string())),
        Some(publisher(runner.clone(), github.clone(), root)),
        &mut events,
    )
    .run()
    .await?;

    assert_eq!(fs::read_to_string(root.join("i18n/README.md"))?, "Hello [fr]");
    let port_calls = github.calls.lock().unwrap().clone();
    assert!(matches!(
        port_calls.first(),
        Some(PortCall::Create { draft: false, .. })
    ));
    assert!(!port_calls.contains(&PortCall::Ready));

    let branch = report.pull_request.expect("pull request outcome").branch;
    assert!(branch.starts_with("translation-"));
    assert!(runner.calls().contains(&format!("git checkout -b {}", branch)));

    Ok(())
}

#[tokio::test]
async fn test_nothing_discovered_touches_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();

    let config = config(root, &["--input", "missing.md", "--output", "out/*"]);
    let runner = Arc::new(FakeGit::default());
    let github = FakeGithub::default();
    let publisher = publisher(runner.clone(), github.clone(), root).with_ci_identity(CiIdentity {
        token: Some("ghp_secret".to_string()),
        repository: Some("acme/docs".to_string()),
    });
    let mut events: Vec<Event> = Vec::new();
    let report = Workflow::new(
        &config,
        translator(&config, MockMode::Echo),
        Some(publisher),
        &mut events,
    )
    .run()
    .await?;

    assert!(report.is_noop());
    assert_eq!(report.missing.len(), 1);
    assert!(runner.calls().is_empty());
    assert!(github.calls.lock().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_git_setup_failure_is_not_fatal() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "README.md", "Hello")?;

    let config = config(root, &["--input", "README.md", "--output", "i18n/*"]);
    let runner = Arc::new(FakeGit::failing_on("user.email"));
    let github = FakeGithub::default();
    let publisher = publisher(runner.clone(), github.clone(), root).with_ci_identity(CiIdentity {
        token: Some("ghp_secret".to_string()),
        repository: Some("acme/docs".to_string()),
    });

    let (report, events) = run(&config, MockMode::Suffix(" [fr]".to_string()), publisher).await;
    let report = report?;

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::GitSetupFailed { .. })));
    assert!(events.contains(&Event::BranchReady {
        branch: "translation-test".to_string()
    }));
    assert_eq!(report.written_count(), 1);
    assert_eq!(file_commits(&runner).len(), 1);
    assert!(!runner.calls().iter().any(|c| c.contains("remote set-url")));

    Ok(())
}

#[tokio::test]
async fn test_branch_setup_failure_aborts_run() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "docs/en/a.md", "Alpha")?;

    let config = config(root, &["--input", "docs/en", "--output", "out/*"]);
    let runner = Arc::new(FakeGit::failing_on("git push"));
    let github = FakeGithub::default();

    let (report, events) = run(
        &config,
        MockMode::Echo,
        publisher(runner.clone(), github.clone(), root),
    )
    .await;

    let err = report.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to create translation branch 'translation-test'"));
    assert!(!root.join("out/a.md").exists());
    assert!(github.calls().is_empty());
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::FileStarted { .. })));

    Ok(())
}

#[tokio::test]
async fn test_create_failure_keeps_committing_locally() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "docs/en/a.md", "Alpha")?;
    write(root, "docs/en/b.md", "Beta")?;

    let config = config(root, &["--input", "docs/en", "--output", "out/*"]);
    let runner = Arc::new(FakeGit::default());
    let github = FakeGithub {
        fail_create: true,
        ..FakeGithub::default()
    };

    let (report, events) = run(
        &config,
        MockMode::Suffix(" [fr]".to_string()),
        publisher(runner.clone(), github.clone(), root),
    )
    .await;
    let report = report?;

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::LocalOnly { .. })));
    assert_eq!(
        file_commits(&runner),
        vec![
            "git commit -m Translate docs/en/a.md to French (gpt-4) -- out/a.md",
            "git commit -m Translate docs/en/b.md to French (gpt-4) -- out/b.md",
        ]
    );
    // Only the failed create reached GitHub.
    assert_eq!(github.calls().len(), 1);

    let pull_request = report.pull_request.expect("pull request outcome");
    assert_eq!(pull_request.number, None);
    assert_eq!(pull_request.stage, LifecycleStage::LocalOnly);

    Ok(())
}

#[tokio::test]
async fn test_update_failures_are_reported_and_run_continues() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "docs/en/a.md", "Alpha")?;
    write(root, "docs/en/b.md", "Beta")?;

    let config = config(root, &["--input", "docs/en", "--output", "out/*"]);
    let runner = Arc::new(FakeGit::default());
    let github = FakeGithub {
        fail_update: true,
        ..FakeGithub::default()
    };

    let (report, events) = run(
        &config,
        MockMode::Suffix(" [fr]".to_string()),
        publisher(runner.clone(), github.clone(), root),
    )
    .await;
    let report = report?;

    // Two progress updates and the final one.
    let update_failures = events
        .iter()
        .filter(|e| matches!(e, Event::PullRequestUpdateFailed { .. }))
        .count();
    assert_eq!(update_failures, 3);
    assert_eq!(report.written_count(), 2);
    assert_eq!(file_commits(&runner).len(), 2);

    // Leaving draft does not depend on the final update.
    assert_eq!(github.calls().last(), Some(&PortCall::Ready));
    assert!(events.contains(&Event::Finalized { number: 42 }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::FinalizeFailed { .. })));
    assert_eq!(
        report.pull_request.expect("pull request outcome").stage,
        LifecycleStage::ReadyForReview
    );

    Ok(())
}

#[tokio::test]
async fn test_commit_failure_skips_update_for_that_file() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "docs/en/a.md", "Alpha")?;
    write(root, "docs/en/b.md", "Beta")?;
    write(root, "docs/en/c.md", "Gamma")?;

    let config = config(root, &["--input", "docs/en", "--output", "out/*"]);
    let runner = Arc::new(FakeGit::failing_on("out/b.md"));
    let github = FakeGithub::default();

    let (report, events) = run(
        &config,
        MockMode::Suffix(" [fr]".to_string()),
        publisher(runner.clone(), github.clone(), root),
    )
    .await;
    let report = report?;

    assert!(events.iter().any(|e| matches!(
        e,
        Event::CommitFailed { source, .. } if source == "docs/en/b.md"
    )));
    assert_eq!(report.written_count(), 3);
    assert!(!report.records[1].committed);
    assert!(report.records[2].committed);
    assert_eq!(
        file_commits(&runner),
        vec![
            "git commit -m Translate docs/en/a.md to French (gpt-4) -- out/a.md",
            "git commit -m Translate docs/en/c.md to French (gpt-4) -- out/c.md",
        ]
    );

    let progress_titles: Vec<String> = github
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            PortCall::Update { title, .. } if title.starts_with("[WIP]") => Some(title),
            _ => None,
        })
        .collect();
    assert_eq!(
        progress_titles,
        vec!["[WIP] Add LLM Translations (1/3)", "[WIP] Add LLM Translations (3/3)"]
    );

    Ok(())
}
