use std::sync::Arc;

use anyhow::{Context, Result};

use super::super::{
    args::TranslateCommand,
    console::{self, ConsoleReporter, EchoRunner},
    exit_status::ExitStatus,
};
use crate::{
    config::Config,
    core::Workflow,
    llm::{ContentTranslator, OpenAiCompatible, TranslatorSettings},
    publish::{
        CiIdentity, CommandRunner, Git, PullRequestLifecycle, PullRequestService, SystemRunner,
    },
};

pub fn translate(cmd: TranslateCommand) -> Result<ExitStatus> {
    let config = Config::from_args(&cmd)?;
    console::print_config(&config);

    let provider = OpenAiCompatible::new(config.api_key.clone(), config.base_url.clone())
        .context("Failed to create the chat completions client")?;
    let translator = ContentTranslator::new(
        Arc::new(provider),
        TranslatorSettings::from_config(&config),
    );

    let publisher = if config.publish {
        Some(publisher(&config)?)
    } else {
        None
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let mut reporter = ConsoleReporter::new(config.verbose);
    let report =
        runtime.block_on(Workflow::new(&config, translator, publisher, &mut reporter).run())?;
    console::print_summary(&report);

    Ok(ExitStatus::Success)
}

/// Probe the pull request backends. Git itself is only configured once there is
/// something to publish.
fn publisher(config: &Config) -> Result<PullRequestLifecycle> {
    let workdir = config
        .workdir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", config.workdir.display()))?;

    let mut system = SystemRunner::new(workdir.clone());
    if let Some(token) = &config.github.token {
        system = system.with_env("GH_TOKEN", token.as_str());
    }
    let runner: Arc<dyn CommandRunner> = if config.verbose {
        Arc::new(EchoRunner::new(system))
    } else {
        Arc::new(system)
    };

    let git = Git::new(runner.clone(), workdir);
    let service = PullRequestService::probe(runner, &config.github)
        .context("Failed to set up the GitHub client")?;
    if !service.is_available() {
        console::print_warning(
            "no way to open a pull request: install `gh` or set GITHUB_TOKEN and GITHUB_REPOSITORY",
        );
    } else if config.verbose {
        console::print_note(&format!(
            "pull request backends: {}",
            service.backends().join(", ")
        ));
    }

    let identity = CiIdentity {
        token: config.github.token.clone(),
        repository: config.github.repository.clone(),
    };
    Ok(PullRequestLifecycle::new(
        git,
        Box::new(service),
        config.github.base_branch.as_str(),
    )
    .with_ci_identity(identity))
}
