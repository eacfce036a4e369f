//! The end-to-end run: inspect, negotiate staging, generate, edit, commit, push.

use std::path::PathBuf;

use git2::Repository;
use tracing::info;

use crate::config::RunOptions;
use crate::draft::{CommitDraft, DraftOutcome, Editor, ScratchFile, edit_draft};
use crate::error::PipelineError;
use crate::git::{CommitStatus, PushStatus, Publisher, collect_file_diffs, inspect, publish};
use crate::llm::{GenerationBackend, GenerationOutcome, build_prompt, generate};
use crate::staging::{UserDecision, negotiate};

/// How a run ended when no fatal error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The working tree was clean to begin with.
    NothingToCommit,
    /// Nothing was staged after negotiation; no generation call was made.
    NoChangesToProcess,
    /// The user left the edited message empty.
    EmptyMessage,
    /// The user answered no at the final confirmation.
    Declined,
    Committed { message: String, push: PushStatus },
    /// `git commit` ran but exited non-zero.
    CommitFailed { code: Option<i32> },
}

/// Collaborators for one run. Selection of backend, editor and publisher
/// happens once, before the pipeline starts.
pub struct Pipeline<'a> {
    pub options: &'a RunOptions,
    pub backend: &'a dyn GenerationBackend,
    pub decision: &'a dyn UserDecision,
    pub editor: &'a dyn Editor,
    pub publisher: &'a dyn Publisher,
    /// Where to put the scratch file; the system temp dir when `None`.
    pub scratch_dir: Option<PathBuf>,
}

impl Pipeline<'_> {
    pub async fn run(&self, repo: &Repository) -> Result<RunOutcome, PipelineError> {
        let provider = &self.options.provider;

        let initial = inspect(repo)?;
        if !initial.has_pending() {
            println!("No changes to commit.");
            return Ok(RunOutcome::NothingToCommit);
        }

        println!("\nGenerating commit message in {}...", provider.language);

        negotiate(repo, &initial, self.decision)?;

        let changes = inspect(repo)?;
        if changes.staged_is_empty() {
            println!("No staged changes to commit. Aborting.");
            return Ok(RunOutcome::NoChangesToProcess);
        }

        let diffs = collect_file_diffs(repo, &changes)?;
        let prompt = build_prompt(&diffs, &provider.language, provider.style);

        let outcome = generate(self.backend, &prompt).await;
        if let GenerationOutcome::OtherFailure(detail) = &outcome {
            println!("Could not generate a commit message ({detail}). Using a default message.");
        }
        let message = outcome
            .message_or_fallback()
            .map_err(|detail| PipelineError::QuotaExhausted {
                provider: self.backend.provider(),
                detail,
            })?;

        // Dropped on every return below, which removes the file.
        let scratch = match &self.scratch_dir {
            Some(dir) => ScratchFile::create_in(dir)?,
            None => ScratchFile::create()?,
        };

        let draft = CommitDraft::new(message, &changes, diffs);
        let final_message = match edit_draft(&draft, &scratch, self.editor)? {
            DraftOutcome::Finalized(message) => message,
            DraftOutcome::Aborted => {
                println!("Empty commit message. Commit aborted.");
                return Ok(RunOutcome::EmptyMessage);
            }
        };

        println!("\n===== Changes for this commit =====");
        println!("{}", changes.status_summary());
        println!("\n===== Commit message =====");
        println!("{final_message}");
        println!();

        let confirmed = self
            .decision
            .confirm("Commit these changes?")
            .map_err(PipelineError::Prompt)?;
        if !confirmed {
            println!("Commit aborted.");
            return Ok(RunOutcome::Declined);
        }

        if let CommitStatus::Failed { code } = self.publisher.commit(scratch.path())? {
            println!("git commit failed (exit code {}).", describe_code(code));
            return Ok(RunOutcome::CommitFailed { code });
        }
        info!("Commit created");

        let push = publish(self.publisher, &self.options.remote)?;
        match &push {
            PushStatus::Pushed => println!("Pushed to '{}'.", self.options.remote),
            PushStatus::NoRemote(remote) => {
                println!("No '{remote}' remote found. Skipping git push.")
            }
            PushStatus::Failed { code } => {
                println!("git push failed (exit code {}).", describe_code(*code))
            }
        }

        Ok(RunOutcome::Committed {
            message: final_message,
            push,
        })
    }
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}
