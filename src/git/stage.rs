//! Index mutations used by the staging negotiator.

use std::collections::HashSet;
use std::path::Path;

use git2::{IndexAddOption, IndexMatchedPath, Repository};

use crate::error::RepoError;

/// Stage untracked paths (like `git add -- <paths>`), honouring ignore rules.
///
/// Paths are taken literally; `a[1].txt` never matches `a1.txt`.
pub fn stage_untracked(repo: &Repository, paths: &[String]) -> Result<(), RepoError> {
    if paths.is_empty() {
        return Ok(());
    }

    let mut index = repo.index().map_err(RepoError::Staging)?;
    index
        .add_all(
            paths.iter(),
            IndexAddOption::DEFAULT | IndexAddOption::DISABLE_PATHSPEC_MATCH,
            None,
        )
        .map_err(RepoError::Staging)?;
    index.write().map_err(RepoError::Staging)
}

/// Stage exactly the given tracked paths, including working-tree deletions
/// (like `git add -u -- <paths>`).
pub fn stage_unstaged(repo: &Repository, paths: &[String]) -> Result<(), RepoError> {
    if paths.is_empty() {
        return Ok(());
    }

    // update_all has no literal-pathspec flag, so filter matches by hand.
    let listed: HashSet<&Path> = paths.iter().map(Path::new).collect();
    let mut only_listed = |path: &Path, _: &[u8]| -> i32 {
        if listed.contains(path) { 0 } else { 1 }
    };

    let mut index = repo.index().map_err(RepoError::Staging)?;
    index
        .update_all(paths.iter(), Some(&mut only_listed as &mut IndexMatchedPath))
        .map_err(RepoError::Staging)?;
    index.write().map_err(RepoError::Staging)
}
