//! Provider-agnostic message generation with a two-tier failure policy.
//!
//! Quota or rate-limit refusals are fatal to the run. Every other failure,
//! including an empty response, degrades to [`FALLBACK_MESSAGE`].

use std::sync::LazyLock;

use async_trait::async_trait;
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::config::ProviderId;
use crate::error::BackendError;

/// Message used when generation fails for any reason other than quota.
pub const FALLBACK_MESSAGE: &str = "Update changes";

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

/// A backend that turns a prompt into response text.
///
/// This abstraction allows substituting the HTTP clients in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Which provider this backend talks to.
    fn provider(&self) -> ProviderId;

    /// Send the prompt. `Ok(None)` means the call succeeded without text.
    async fn complete(&self, prompt: &str) -> Result<Option<String>, BackendError>;
}

/// Result of one generation call, classified for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    /// Fatal: abort the run without committing.
    QuotaExhausted(String),
    /// Non-fatal: continue with [`FALLBACK_MESSAGE`].
    OtherFailure(String),
}

impl GenerationOutcome {
    /// The message to draft, or the quota detail if the run must stop.
    pub fn message_or_fallback(self) -> Result<String, String> {
        match self {
            GenerationOutcome::Generated(message) => Ok(message),
            GenerationOutcome::OtherFailure(_) => Ok(FALLBACK_MESSAGE.to_string()),
            GenerationOutcome::QuotaExhausted(detail) => Err(detail),
        }
    }
}

/// Generate a commit message. Exactly one backend call, never retried.
pub async fn generate<B: GenerationBackend + ?Sized>(backend: &B, prompt: &str) -> GenerationOutcome {
    debug!(
        provider = %backend.provider(),
        prompt_len = prompt.len(),
        "Requesting commit message"
    );

    match backend.complete(prompt).await {
        Ok(Some(text)) => {
            let message = normalize_response(&text);
            if message.is_empty() {
                warn!("{} returned an empty message", backend.provider());
                GenerationOutcome::OtherFailure("empty response".to_string())
            } else {
                GenerationOutcome::Generated(message)
            }
        }
        Ok(None) => {
            warn!("{} returned no text", backend.provider());
            GenerationOutcome::OtherFailure("response contained no text".to_string())
        }
        Err(e) if e.is_quota() => GenerationOutcome::QuotaExhausted(e.to_string()),
        Err(e) => {
            warn!("{} request failed: {}", backend.provider(), e);
            GenerationOutcome::OtherFailure(e.to_string())
        }
    }
}

/// Trim the response and collapse runs of three or more newlines into one
/// blank line. Idempotent.
pub fn normalize_response(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    EXCESS_NEWLINES
        .replace_all(unified.trim(), "\n\n")
        .into_owned()
}
