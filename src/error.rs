//! Error types for autocommit modules using thiserror.

use std::io;

use thiserror::Error;

use crate::config::ProviderId;

/// Errors from repository inspection and staging.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Not a git repository (or any of the parent directories)")]
    NotARepository,

    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Bare repositories have no working tree to commit from")]
    BareRepository,

    #[error("Failed to read repository status: {0}")]
    Status(#[source] git2::Error),

    #[error("Failed to collect diff for '{path}': {source}")]
    Diff {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to stage changes: {0}")]
    Staging(#[source] git2::Error),
}

/// Errors from resolving flags and environment into run options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{variable} is not set. Add it to your environment or a .env file to use {provider}.")]
    MissingCredential {
        provider: ProviderId,
        variable: &'static str,
    },

    #[error("Unknown provider '{0}'. Expected one of: gemini, zai, openai")]
    UnknownProvider(String),
}

/// Errors from a single generation backend call.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),
}

/// Structured error codes that providers use for rate limits and exhausted quota.
const QUOTA_CODES: &[&str] = &[
    "RESOURCE_EXHAUSTED",
    "insufficient_quota",
    "rate_limit_exceeded",
];

impl BackendError {
    /// Whether the backend refused the request because of rate limits or quota.
    pub fn is_quota(&self) -> bool {
        match self {
            BackendError::Api { status, code, .. } => {
                *status == 429
                    || code
                        .as_deref()
                        .is_some_and(|c| QUOTA_CODES.iter().any(|q| q.eq_ignore_ascii_case(c)))
            }
            BackendError::Transport(e) => {
                e.status().is_some_and(|s| s == reqwest::StatusCode::TOO_MANY_REQUESTS)
            }
            BackendError::InvalidResponse(_) => false,
        }
    }
}

/// Errors from the scratch document and editor workflow.
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Failed to access scratch commit message file: {0}")]
    Io(#[source] io::Error),

    #[error("Editor '{0}' not found. Set EDITOR or pass --editor.")]
    EditorNotFound(String),

    #[error("Editor command is empty. Set EDITOR or pass --editor.")]
    EditorNotConfigured,

    #[error("Failed to launch editor '{program}': {source}")]
    EditorSpawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Errors from the commit and push step.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to run git {operation}: {source}")]
    Spawn {
        operation: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Fatal errors that stop the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(
        "{provider} quota or rate limit exhausted: {detail}\n\
         No commit was created. Try again later or check your plan's quota."
    )]
    QuotaExhausted { provider: ProviderId, detail: String },

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Failed to read your answer: {0}")]
    Prompt(#[source] io::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
