//! One branch and one pull request for the whole run.
//!
//! ```text
//! Uninitialized --initialize--> BranchReady --open--> DraftOpen --finalize--> ReadyForReview
//!                                    |                  ^    |
//!                                    |                  +----+ update
//!                                    +--open fails--> LocalOnly
//! ```
//!
//! In `LocalOnly` files are still committed and pushed, but no pull request is
//! tracked.

use std::{
    hash::{BuildHasher, RandomState},
    time::SystemTime,
};

use crate::publish::{
    error::{PublishError, PublishResult},
    git::{CiIdentity, Git},
    pull_request::{NewPullRequest, PullRequestPort},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Uninitialized,
    BranchReady,
    DraftOpen,
    ReadyForReview,
    LocalOnly,
}

/// Generate a fresh `translation-xxxxxxxx` branch name.
pub fn session_branch_name() -> String {
    let seed = RandomState::new().hash_one((SystemTime::now(), std::process::id()));
    format!("translation-{:08x}", seed as u32)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestState {
    pub branch_name: String,
    pr_number: Option<u64>,
    pub is_draft: bool,
    /// Output paths committed on the branch, in commit order.
    pub files_included: Vec<String>,
}

impl PullRequestState {
    pub fn new(branch_name: impl Into<String>) -> Self {
        Self {
            branch_name: branch_name.into(),
            pr_number: None,
            is_draft: false,
            files_included: Vec::new(),
        }
    }

    pub fn pr_number(&self) -> Option<u64> {
        self.pr_number
    }

    /// Record the number of a newly created pull request. Only the first call succeeds.
    pub fn record_created(&mut self, number: u64, draft: bool) -> PublishResult<()> {
        if let Some(existing) = self.pr_number {
            return Err(PublishError::AlreadyCreated(existing));
        }
        self.pr_number = Some(number);
        self.is_draft = draft;
        Ok(())
    }
}

/// What [`PullRequestLifecycle::finalize`] managed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalization {
    /// Pushing the final title and body.
    pub update: PublishResult<()>,
    /// Leaving draft. `Ok` when the pull request was never a draft.
    pub ready: PublishResult<()>,
}

pub struct PullRequestLifecycle {
    git: Git,
    port: Box<dyn PullRequestPort>,
    base_branch: String,
    ci_identity: Option<CiIdentity>,
    stage: LifecycleStage,
    state: Option<PullRequestState>,
}

impl PullRequestLifecycle {
    pub fn new(git: Git, port: Box<dyn PullRequestPort>, base_branch: impl Into<String>) -> Self {
        Self {
            git,
            port,
            base_branch: base_branch.into(),
            ci_identity: None,
            stage: LifecycleStage::Uninitialized,
            state: None,
        }
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn state(&self) -> Option<&PullRequestState> {
        self.state.as_ref()
    }

    pub fn pr_number(&self) -> Option<u64> {
        self.state.as_ref().and_then(PullRequestState::pr_number)
    }

    /// Configure git with `identity` on the first [`prepare`](Self::prepare).
    pub fn with_ci_identity(mut self, identity: CiIdentity) -> Self {
        self.ci_identity = Some(identity);
        self
    }

    /// Apply the CI git identity, once. Without one this does nothing.
    ///
    /// A failure here is not fatal on its own; [`initialize`](Self::initialize)
    /// decides whether a branch can still be set up.
    pub fn prepare(&mut self) -> PublishResult<()> {
        let Some(identity) = self.ci_identity.take() else {
            return Ok(());
        };
        self.git
            .configure_ci(identity.token.as_deref(), identity.repository.as_deref())
    }

    /// Create `branch_name` and push a placeholder commit so the branch exists
    /// on the remote before a pull request refers to it.
    pub fn initialize(&mut self, branch_name: &str, placeholder_message: &str) -> PublishResult<()> {
        if self.stage != LifecycleStage::Uninitialized {
            return Ok(());
        }
        self.git.checkout_branch(branch_name)?;
        self.git.commit_empty(placeholder_message)?;
        self.git.push(branch_name)?;

        self.state = Some(PullRequestState::new(branch_name));
        self.stage = LifecycleStage::BranchReady;
        Ok(())
    }

    /// Open the pull request; a draft when more than one file is expected.
    ///
    /// When a pull request already exists it is updated instead. On failure the
    /// lifecycle drops to [`LifecycleStage::LocalOnly`].
    pub async fn open(&mut self, title: &str, body: &str, expected_files: usize) -> PublishResult<u64> {
        let state = self.state.as_mut().ok_or(PublishError::Unavailable(
            "open a pull request before the branch exists",
        ))?;

        if let Some(number) = state.pr_number() {
            self.port.update(number, title, body).await?;
            return Ok(number);
        }

        let request = NewPullRequest {
            title: title.to_string(),
            body: body.to_string(),
            head: state.branch_name.clone(),
            base: self.base_branch.clone(),
            draft: expected_files > 1,
        };
        match self.port.create(&request).await {
            Ok(number) => {
                state.record_created(number, request.draft)?;
                self.stage = LifecycleStage::DraftOpen;
                Ok(number)
            }
            Err(err) => {
                self.stage = LifecycleStage::LocalOnly;
                Err(err)
            }
        }
    }

    /// Commit and push the outputs of one input file.
    ///
    /// Returns `false` when nothing changed and no commit was made.
    pub fn publish_file(&mut self, outputs: &[String], message: &str) -> PublishResult<bool> {
        let state = self.state.as_mut().ok_or(PublishError::Unavailable(
            "commit before the branch exists",
        ))?;
        let committed = self
            .git
            .commit_and_push(outputs, message, &state.branch_name)?;
        if committed {
            state.files_included.extend(outputs.iter().cloned());
        }
        Ok(committed)
    }

    /// Refresh the title and body of the open pull request.
    pub async fn update(&self, title: &str, body: &str) -> PublishResult<()> {
        let number = self.pr_number().ok_or(PublishError::NoPullRequest)?;
        self.port.update(number, title, body).await
    }

    /// Push the final title and body, then take the pull request out of draft.
    ///
    /// The ready transition is attempted even when the update fails, and both
    /// results are returned. If marking ready fails the pull request stays a draft.
    pub async fn finalize(&mut self, title: &str, body: &str) -> Finalization {
        let Some(state) = self.state.as_mut() else {
            return Finalization {
                update: Err(PublishError::NoPullRequest),
                ready: Err(PublishError::NoPullRequest),
            };
        };
        let Some(number) = state.pr_number() else {
            return Finalization {
                update: Err(PublishError::NoPullRequest),
                ready: Err(PublishError::NoPullRequest),
            };
        };

        let update = self.port.update(number, title, body).await;
        let ready = if state.is_draft {
            self.port.mark_ready(number).await
        } else {
            Ok(())
        };
        if ready.is_ok() {
            state.is_draft = false;
            self.stage = LifecycleStage::ReadyForReview;
        }
        Finalization { update, ready }
    }
}
