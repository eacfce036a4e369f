//! Interactive staging of untracked and unstaged files before generation.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use dialoguer::Confirm;
use git2::Repository;
use tracing::info;

use crate::error::PipelineError;
use crate::git::{RepositoryChangeSet, stage_unstaged, stage_untracked};

/// A yes/no decision from the user.
///
/// The pipeline only asks through this trait, so it can run against canned
/// answers in tests or non-interactive contexts.
#[cfg_attr(test, mockall::automock)]
pub trait UserDecision {
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Asks on the terminal. Enter without an answer means "no".
pub struct TerminalDecision;

impl UserDecision for TerminalDecision {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(io::Error::other)
    }
}

/// Replays a fixed list of answers and records the questions asked.
///
/// Answers "no" once the list runs out.
#[derive(Debug, Default)]
pub struct ScriptedDecision {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedDecision {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl UserDecision for ScriptedDecision {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// What the negotiator staged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationReport {
    pub staged_untracked: Vec<String>,
    pub staged_unstaged: Vec<String>,
}

/// Offer untracked files, then unstaged files, for staging.
///
/// Each non-empty category is listed and confirmed as a whole. Declined
/// categories are left untouched. `changes` must be fresh; re-inspect the
/// repository afterwards since staging moves paths between sets.
pub fn negotiate<D: UserDecision + ?Sized>(
    repo: &Repository,
    changes: &RepositoryChangeSet,
    decision: &D,
) -> Result<NegotiationReport, PipelineError> {
    let mut report = NegotiationReport::default();

    if !changes.untracked.is_empty() {
        let paths: Vec<String> = changes.untracked.iter().cloned().collect();
        print_paths("Untracked files found:", &paths);

        if decision
            .confirm("Add all untracked files?")
            .map_err(PipelineError::Prompt)?
        {
            stage_untracked(repo, &paths)?;
            println!("Untracked files were added.");
            info!(count = paths.len(), "Staged untracked files");
            report.staged_untracked = paths;
        }
    }

    if !changes.unstaged.is_empty() {
        let paths: Vec<String> = changes.unstaged.iter().cloned().collect();
        print_paths("Modified but unstaged files found:", &paths);

        if decision
            .confirm("Add all unstaged files?")
            .map_err(PipelineError::Prompt)?
        {
            stage_unstaged(repo, &paths)?;
            println!("Unstaged files were added.");
            info!(count = paths.len(), "Staged unstaged files");
            report.staged_unstaged = paths;
        }
    }

    Ok(report)
}

fn print_paths(heading: &str, paths: &[String]) {
    println!("\n{heading}");
    for path in paths {
        println!(" - {path}");
    }
    println!();
}
