//! Publishing translations: git commits on a session branch and one pull request.
//!
//! - [`CommandRunner`]: how `git` and `gh` are executed
//! - [`Git`]: branch, commit and push operations
//! - [`PullRequestPort`]: create, update and ready a pull request ([`GhCli`], [`GithubRest`])
//! - [`PullRequestLifecycle`]: the per-run branch and pull request state machine

pub mod command;
pub mod error;
pub mod git;
pub mod lifecycle;
pub mod pull_request;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use error::{PublishError, PublishResult};
pub use git::{CiIdentity, Git};
pub use lifecycle::{
    Finalization, LifecycleStage, PullRequestLifecycle, PullRequestState, session_branch_name,
};
pub use pull_request::{GhCli, GithubRest, NewPullRequest, PullRequestPort, PullRequestService};
