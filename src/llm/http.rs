//! Shared handling of provider HTTP error responses.

use reqwest::Response;
use serde::Deserialize;

use crate::error::BackendError;

/// Maximum number of characters kept from an unparseable error body.
const MAX_ERROR_BODY: usize = 500;

/// Error envelope shared (loosely) by Gemini, OpenAI and Z.ai.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    /// Gemini: `RESOURCE_EXHAUSTED`, `INVALID_ARGUMENT`, ...
    #[serde(default)]
    status: Option<String>,
    /// OpenAI: string code; Z.ai: numeric string; Gemini: HTTP status number.
    #[serde(default)]
    code: Option<serde_json::Value>,
    /// OpenAI: `insufficient_quota`, `invalid_request_error`, ...
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl ErrorBody {
    fn structured_code(&self) -> Option<String> {
        let code = match &self.code {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        };
        self.status.clone().or(code).or_else(|| self.kind.clone())
    }
}

/// Convert a non-success response into [`BackendError::Api`].
pub(crate) async fn api_error(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    parse_api_error(status, &body)
}

pub(crate) fn parse_api_error(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => BackendError::Api {
            status,
            code: envelope.error.structured_code(),
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "no error message".to_string()),
        },
        Err(_) => BackendError::Api {
            status,
            code: None,
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        },
    }
}
