//! The translation run: discover, translate, write, publish.
//!
//! Files are processed strictly one after another. A failure on one file is
//! recorded on its [`FileRecord`] and the loop moves on; only failing to set up
//! the session branch aborts the run.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    config::Config,
    core::{
        discovery::{self, MissingInput},
        front_matter,
        records::{FileRecord, FileStatus, TranslationJob},
        summary::{Summary, placeholder_commit_message},
    },
    llm::{ContentTranslator, RefineOutcome, TranslationStatistics, Usage},
    publish::{LifecycleStage, PublishError, PullRequestLifecycle, session_branch_name},
};

/// Progress notifications emitted while a run advances.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Discovered {
        files: usize,
        missing: Vec<MissingInput>,
        skipped: usize,
    },
    /// Configuring the CI git identity failed; branch setup still goes ahead.
    GitSetupFailed {
        error: PublishError,
    },
    BranchReady {
        branch: String,
    },
    PullRequestOpened {
        number: u64,
        draft: bool,
    },
    /// No pull request could be opened; commits continue without one.
    LocalOnly {
        error: PublishError,
    },
    FileStarted {
        index: usize,
        total: usize,
        source: String,
        output: String,
    },
    FrontMatterKept {
        source: String,
    },
    Translated {
        source: String,
        usage: Usage,
    },
    Refined {
        source: String,
        outcome: RefineOutcome,
        /// The primary translation.
        translated: String,
        /// What was written: the refined text, or `translated` after a fallback.
        refined: String,
    },
    FileWritten {
        output: String,
    },
    FileFailed {
        source: String,
        reason: String,
    },
    Committed {
        output: String,
        changed: bool,
    },
    CommitFailed {
        source: String,
        error: PublishError,
    },
    PullRequestUpdateFailed {
        error: PublishError,
    },
    Finalized {
        number: u64,
    },
    FinalizeFailed {
        number: u64,
        error: PublishError,
    },
}

/// Receives [`Event`]s as the run advances.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

impl Reporter for Vec<Event> {
    fn report(&mut self, event: Event) {
        self.push(event);
    }
}

/// What happened to the pull request during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOutcome {
    pub branch: String,
    pub number: Option<u64>,
    pub stage: LifecycleStage,
    pub is_draft: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub records: Vec<FileRecord>,
    pub missing: Vec<MissingInput>,
    pub stats: TranslationStatistics,
    /// `None` when publishing was off or nothing was discovered.
    pub pull_request: Option<PullRequestOutcome>,
}

impl RunReport {
    pub fn written_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_written()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == FileStatus::Failed)
            .count()
    }

    /// Nothing was discovered, so nothing was attempted.
    pub fn is_noop(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct Workflow<'a> {
    config: &'a Config,
    translator: ContentTranslator,
    publisher: Option<PullRequestLifecycle>,
    branch_name: Option<String>,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Workflow<'a> {
    pub fn new(
        config: &'a Config,
        translator: ContentTranslator,
        publisher: Option<PullRequestLifecycle>,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            config,
            translator,
            publisher,
            branch_name: None,
            reporter,
        }
    }

    /// Use `name` for the session branch instead of a generated one.
    pub fn with_branch_name(mut self, name: impl Into<String>) -> Self {
        self.branch_name = Some(name.into());
        self
    }

    pub async fn run(mut self) -> Result<RunReport> {
        let found = discovery::discover(&self.config.workdir, self.config.input_spec.as_deref());
        self.reporter.report(Event::Discovered {
            files: found.files.len(),
            missing: found.missing.clone(),
            skipped: found.skipped_count,
        });
        if found.is_empty() {
            return Ok(RunReport {
                missing: found.missing,
                ..RunReport::default()
            });
        }

        let job = TranslationJob::new(self.config, found.files);
        let mut records = job.records();
        let total = records.len();

        self.start_pull_request(&job, &records).await?;

        for index in 0..total {
            let record = &mut records[index];
            self.reporter.report(Event::FileStarted {
                index: index + 1,
                total,
                source: record.source_path.clone(),
                output: record.output_path.clone(),
            });

            if let Err(reason) = self.process_file(record).await {
                record.fail(reason.clone());
                self.reporter.report(Event::FileFailed {
                    source: record.source_path.clone(),
                    reason,
                });
                continue;
            }

            if self.commit_file(record) {
                let summary = summarize(&job, &records, index + 1, self.translator.statistics());
                let title = summary.title(&self.config.pr_title, true);
                let body = summary.body(true);
                self.update_pull_request(&title, &body).await;
            }
        }

        self.finish_pull_request(&job, &records).await;

        Ok(RunReport {
            stats: self.translator.statistics(),
            pull_request: self.pull_request_outcome(),
            records,
            missing: found.missing,
        })
    }

    /// Configure git, create the session branch and open the pull request.
    ///
    /// Only branch creation is fatal.
    async fn start_pull_request(&mut self, job: &TranslationJob, records: &[FileRecord]) -> Result<()> {
        let Some(publisher) = self.publisher.as_mut() else {
            return Ok(());
        };

        if let Err(error) = publisher.prepare() {
            self.reporter.report(Event::GitSetupFailed { error });
        }

        let branch = self.branch_name.clone().unwrap_or_else(session_branch_name);
        publisher
            .initialize(&branch, &placeholder_commit_message(&job.target_lang))
            .with_context(|| format!("Failed to create translation branch '{}'", branch))?;
        self.reporter.report(Event::BranchReady { branch });

        let summary = summarize(job, records, 0, self.translator.statistics());
        let title = summary.title(&self.config.pr_title, true);
        let body = summary.body(true);

        match publisher.open(&title, &body, records.len()).await {
            Ok(number) => {
                let draft = publisher.state().is_some_and(|s| s.is_draft);
                self.reporter.report(Event::PullRequestOpened { number, draft });
            }
            Err(error) => self.reporter.report(Event::LocalOnly { error }),
        }
        Ok(())
    }

    /// Read, translate, refine and write one file.
    async fn process_file(&mut self, record: &mut FileRecord) -> Result<(), String> {
        let source = self.config.workdir.join(&record.source_path);
        let content = fs::read_to_string(&source)
            .map_err(|e| format!("Failed to read {}: {}", source.display(), e))?;

        let document = if front_matter::applies_to(&record.source_path) {
            front_matter::split(&content)
        } else {
            front_matter::SplitDocument {
                front_matter: None,
                body: &content,
            }
        };
        if document.front_matter.is_some() {
            self.reporter.report(Event::FrontMatterKept {
                source: record.source_path.clone(),
            });
        }
        if document.body.trim().is_empty() {
            return Err("Nothing to translate: file is empty".to_string());
        }

        let translation = self
            .translator
            .translate(document.body)
            .await
            .map_err(|e| format!("Translation failed: {}", e))?;
        record.advance(FileStatus::Translated);
        self.reporter.report(Event::Translated {
            source: record.source_path.clone(),
            usage: translation.usage,
        });

        let refinement = self
            .translator
            .refine(&translation.text, Some(document.body))
            .await;
        if refinement.outcome != RefineOutcome::Skipped {
            if refinement.outcome == RefineOutcome::Applied {
                record.advance(FileStatus::Refined);
            }
            self.reporter.report(Event::Refined {
                source: record.source_path.clone(),
                outcome: refinement.outcome.clone(),
                translated: translation.text.clone(),
                refined: refinement.text.clone(),
            });
        }

        let output = document.reattach(&refinement.text);
        write_output(&self.config.workdir.join(&record.output_path), &output)?;
        record.advance(FileStatus::Written);
        self.reporter.report(Event::FileWritten {
            output: record.output_path.clone(),
        });
        Ok(())
    }

    /// Commit and push a written file. Returns whether a commit was pushed.
    fn commit_file(&mut self, record: &mut FileRecord) -> bool {
        let Some(publisher) = self.publisher.as_mut() else {
            return false;
        };

        let message = self
            .config
            .commit_message_for(&record.source_path, &record.output_path);
        match publisher.publish_file(std::slice::from_ref(&record.output_path), &message) {
            Ok(changed) => {
                record.committed = changed;
                self.reporter.report(Event::Committed {
                    output: record.output_path.clone(),
                    changed,
                });
                changed
            }
            Err(error) => {
                self.reporter.report(Event::CommitFailed {
                    source: record.source_path.clone(),
                    error,
                });
                false
            }
        }
    }

    async fn update_pull_request(&mut self, title: &str, body: &str) {
        let Some(publisher) = self.publisher.as_ref() else {
            return;
        };
        if publisher.pr_number().is_none() {
            return;
        }
        if let Err(error) = publisher.update(title, body).await {
            self.reporter
                .report(Event::PullRequestUpdateFailed { error });
        }
    }

    async fn finish_pull_request(&mut self, job: &TranslationJob, records: &[FileRecord]) {
        let summary = summarize(job, records, records.len(), self.translator.statistics());
        let title = summary.title(&self.config.pr_title, false);
        let body = summary.body(false);

        let Some(publisher) = self.publisher.as_mut() else {
            return;
        };
        let Some(number) = publisher.pr_number() else {
            return;
        };
        let finalization = publisher.finalize(&title, &body).await;
        if let Err(error) = finalization.update {
            self.reporter
                .report(Event::PullRequestUpdateFailed { error });
        }
        match finalization.ready {
            Ok(()) => self.reporter.report(Event::Finalized { number }),
            Err(error) => self
                .reporter
                .report(Event::FinalizeFailed { number, error }),
        }
    }

    fn pull_request_outcome(&self) -> Option<PullRequestOutcome> {
        let publisher = self.publisher.as_ref()?;
        let state = publisher.state()?;
        Some(PullRequestOutcome {
            branch: state.branch_name.clone(),
            number: state.pr_number(),
            stage: publisher.stage(),
            is_draft: state.is_draft,
        })
    }
}

fn summarize<'r>(
    job: &'r TranslationJob,
    records: &'r [FileRecord],
    processed: usize,
    stats: TranslationStatistics,
) -> Summary<'r> {
    Summary {
        target_lang: &job.target_lang,
        records,
        processed,
        total: records.len(),
        stats,
        model: &job.model,
        refine_model: job.refine_model.as_deref(),
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
