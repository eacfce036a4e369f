//! Git operations: inspection and diffs via git2, commit and push via the `git` CLI.

pub mod diff;
pub mod publish;
pub mod stage;
pub mod status;

pub use diff::{FileDiff, collect_file_diffs, diff_staged};
pub use publish::{CommitStatus, GitCli, PushStatus, Publisher, publish};
pub use stage::{stage_unstaged, stage_untracked};
pub use status::{RepositoryChangeSet, inspect, open_repository};
