//! Commit and push by shelling out to the system `git` binary.
//!
//! Going through `git` rather than git2 keeps the user's hooks, signing
//! config, SSH agent and credential store in play.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::PublishError;

/// Result of `git commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Committed,
    /// git exited non-zero (hook rejection, nothing to commit, ...).
    Failed { code: Option<i32> },
}

/// Result of the push step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    Pushed,
    NoRemote(String),
    Failed { code: Option<i32> },
}

/// The VCS primitives the final stage needs.
#[cfg_attr(test, mockall::automock)]
pub trait Publisher {
    /// Record a commit using the message stored in `message_file`.
    fn commit(&self, message_file: &Path) -> Result<CommitStatus, PublishError>;

    /// Whether a remote with this name is configured.
    fn has_remote(&self, name: &str) -> bool;

    /// Push the current branch to `remote`.
    fn push(&self, remote: &str) -> Result<PushStatus, PublishError>;
}

/// [`Publisher`] backed by the `git` executable, run in the repository's
/// working directory with inherited stdio so hook output reaches the user.
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run a git command; `Ok(Err(code))` means git ran but exited non-zero.
    fn run_git(
        &self,
        args: &[&str],
        operation: &'static str,
    ) -> Result<Result<(), Option<i32>>, PublishError> {
        debug!("Running git {}", args.join(" "));

        let status = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .status()
            .map_err(|source| PublishError::Spawn { operation, source })?;

        if !status.success() {
            warn!("git {} exited with {:?}", operation, status.code());
            return Ok(Err(status.code()));
        }

        Ok(Ok(()))
    }
}

impl Publisher for GitCli {
    fn commit(&self, message_file: &Path) -> Result<CommitStatus, PublishError> {
        let file = message_file.to_string_lossy();
        match self.run_git(&["commit", "-F", &file], "commit")? {
            Ok(()) => Ok(CommitStatus::Committed),
            Err(code) => Ok(CommitStatus::Failed { code }),
        }
    }

    fn has_remote(&self, name: &str) -> bool {
        git2::Repository::open(&self.workdir)
            .and_then(|repo| repo.find_remote(name).map(|_| ()))
            .is_ok()
    }

    fn push(&self, remote: &str) -> Result<PushStatus, PublishError> {
        match self.run_git(&["push", remote], "push")? {
            Ok(()) => Ok(PushStatus::Pushed),
            Err(code) => Ok(PushStatus::Failed { code }),
        }
    }
}

/// Push to `remote` if it exists, otherwise report that it was skipped.
pub fn publish<P: Publisher + ?Sized>(publisher: &P, remote: &str) -> Result<PushStatus, PublishError> {
    if !publisher.has_remote(remote) {
        return Ok(PushStatus::NoRemote(remote.to_string()));
    }
    publisher.push(remote)
}
