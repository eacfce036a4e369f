//! autocommit - drafts commit messages from staged diffs with an LLM.
//!
//! # Overview
//!
//! autocommit inspects the working tree, offers to stage untracked and
//! unstaged files, sends the staged diffs to Gemini, Z.ai or an
//! OpenAI-compatible API, opens the draft in your editor, and commits (and
//! pushes) the edited message.

pub mod config;
pub mod draft;
pub mod error;
pub mod git;
pub mod llm;
pub mod pipeline;
pub mod staging;

// Re-export commonly used types
pub use config::{CliOverrides, ProviderConfig, ProviderId, RunOptions, Style};
pub use draft::{CommitDraft, DraftOutcome};
pub use error::{BackendError, ConfigError, DraftError, PipelineError, PublishError, RepoError};
pub use git::{FileDiff, RepositoryChangeSet};
pub use llm::{GenerationBackend, GenerationOutcome};
pub use pipeline::{Pipeline, RunOutcome};
pub use staging::{ScriptedDecision, TerminalDecision, UserDecision};
