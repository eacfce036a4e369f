//! Repository state inspection: classify pending changes using git2.

use std::collections::BTreeSet;
use std::path::Path;

use git2::{ErrorCode, Repository, Status, StatusOptions};
use tracing::{debug, warn};

use crate::error::RepoError;

/// Pending changes, classified the way `git status` groups them.
///
/// Derived fresh from the index and working tree on every call to
/// [`inspect`]; staging moves paths between sets, so never reuse one
/// across a staging operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryChangeSet {
    pub untracked: BTreeSet<String>,
    pub unstaged: BTreeSet<String>,
    pub staged_modified: BTreeSet<String>,
    pub staged_deleted: BTreeSet<String>,
}

impl RepositoryChangeSet {
    /// True when nothing is staged for the next commit.
    pub fn staged_is_empty(&self) -> bool {
        self.staged_modified.is_empty() && self.staged_deleted.is_empty()
    }

    /// True when there is anything at all to stage or commit.
    pub fn has_pending(&self) -> bool {
        !(self.untracked.is_empty() && self.unstaged.is_empty() && self.staged_is_empty())
    }

    /// Human-readable overview of what the commit will contain.
    pub fn status_summary(&self) -> String {
        let mut lines = Vec::new();

        if !self.staged_is_empty() {
            lines.push("Changes to be committed:".to_string());
            for path in &self.staged_modified {
                lines.push(format!("\tmodified:   {path}"));
            }
            for path in &self.staged_deleted {
                lines.push(format!("\tdeleted:    {path}"));
            }
        }

        if !self.unstaged.is_empty() {
            lines.push("Changes not staged for commit:".to_string());
            lines.extend(self.unstaged.iter().map(|p| format!("\t{p}")));
        }

        if !self.untracked.is_empty() {
            lines.push("Untracked files:".to_string());
            lines.extend(self.untracked.iter().map(|p| format!("\t{p}")));
        }

        lines.join("\n")
    }
}

/// Discover the repository containing `path`.
///
/// Searches parent directories like `git` does. Bare repositories are
/// rejected since there is no working tree to inspect.
pub fn open_repository(path: &Path) -> Result<Repository, RepoError> {
    let repo = match Repository::discover(path) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => return Err(RepoError::NotARepository),
        Err(e) => return Err(RepoError::OpenRepository(e)),
    };

    if repo.is_bare() {
        return Err(RepoError::BareRepository);
    }

    Ok(repo)
}

/// Classify every changed path in the index and working tree.
///
/// Has no side effects. A path that is staged and then modified again
/// shows up both as staged and as unstaged.
pub fn inspect(repo: &Repository) -> Result<RepositoryChangeSet, RepoError> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .renames_head_to_index(false);

    let statuses = repo.statuses(Some(&mut opts)).map_err(RepoError::Status)?;

    let mut changes = RepositoryChangeSet::default();

    for entry in statuses.iter() {
        let path = match entry.path() {
            Some(path) => path.to_string(),
            None => {
                let lossy = String::from_utf8_lossy(entry.path_bytes()).into_owned();
                warn!("Path {:?} is not valid UTF-8; its diff cannot be shown", lossy);
                lossy
            }
        };
        let status = entry.status();

        if status.contains(Status::WT_NEW) {
            changes.untracked.insert(path.clone());
        }

        if status.intersects(
            Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE | Status::WT_RENAMED,
        ) {
            changes.unstaged.insert(path.clone());
        }

        if status.contains(Status::INDEX_DELETED) {
            changes.staged_deleted.insert(path);
        } else if status.intersects(
            Status::INDEX_NEW
                | Status::INDEX_MODIFIED
                | Status::INDEX_RENAMED
                | Status::INDEX_TYPECHANGE,
        ) {
            changes.staged_modified.insert(path);
        }
    }

    debug!(
        untracked = changes.untracked.len(),
        unstaged = changes.unstaged.len(),
        staged_modified = changes.staged_modified.len(),
        staged_deleted = changes.staged_deleted.len(),
        "Inspected repository"
    );

    Ok(changes)
}
