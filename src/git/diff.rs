//! Staged diff collection using git2.

use git2::{DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::RepoError;
use crate::git::status::RepositoryChangeSet;

/// The staged diff text for one file. The text is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub text: String,
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// so the staged diff is taken against the empty tree.
fn resolve_head_tree<'r>(repo: &'r Repository, path: &str) -> Result<Option<Tree<'r>>, RepoError> {
    let diff_err = |source| RepoError::Diff {
        path: path.to_string(),
        source,
    };

    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(diff_err(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(diff_err)?;
    Ok(Some(tree))
}

/// Staged-vs-HEAD patch text for a single path.
///
/// Deleted files yield their removal hunk. A path with no net staged change
/// yields an empty string, which is passed through as-is.
pub fn diff_staged(repo: &Repository, path: &str) -> Result<String, RepoError> {
    let head_tree = resolve_head_tree(repo, path)?;

    let mut opts = DiffOptions::new();
    opts.pathspec(path).disable_pathspec_match(true);

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(|source| RepoError::Diff {
            path: path.to_string(),
            source,
        })?;

    let mut text = String::new();
    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    }) {
        warn!("Failed to render diff for {path}: {e}");
        return Err(RepoError::Diff {
            path: path.to_string(),
            source: e,
        });
    }

    Ok(text)
}

/// Collect diffs for every staged path: modified files first, then deleted,
/// each group in path order.
pub fn collect_file_diffs(
    repo: &Repository,
    changes: &RepositoryChangeSet,
) -> Result<Vec<FileDiff>, RepoError> {
    changes
        .staged_modified
        .iter()
        .chain(changes.staged_deleted.iter())
        .map(|path| {
            Ok(FileDiff {
                path: path.clone(),
                text: diff_staged(repo, path)?,
            })
        })
        .collect()
}
