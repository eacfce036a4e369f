//! Run options resolved once from CLI flags with environment fallback.
//!
//! Flags win over environment variables, which win over built-in defaults.
//! Nothing below the binary's entry point reads the environment again.

use std::env;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::ConfigError;

/// Language used when neither `--lang` nor `COMMIT_LANGUAGE` is set.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Editor used when neither `--editor` nor `EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "vim";

/// Remote that receives the push after a successful commit.
pub const DEFAULT_REMOTE: &str = "origin";

const DEFAULT_ZAI_BASE_URL: &str = "https://api.z.ai/api/paas/v4";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Supported generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderId {
    Gemini,
    Zai,
    #[value(name = "openai")]
    OpenAi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "Gemini",
            ProviderId::Zai => "Z.ai",
            ProviderId::OpenAi => "OpenAI",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "GEMINI_API_KEY",
            ProviderId::Zai => "ZAI_API_KEY",
            ProviderId::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn model_var(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "GEMINI_MODEL",
            ProviderId::Zai => "ZAI_MODEL",
            ProviderId::OpenAi => "OPENAI_MODEL",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini-2.5-flash",
            ProviderId::Zai => "glm-4.6",
            ProviderId::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderId::Gemini),
            "zai" => Ok(ProviderId::Zai),
            "openai" => Ok(ProviderId::OpenAi),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Tone of the generated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Style {
    #[default]
    Standard,
    Humorous,
    Sarcastic,
}

impl Style {
    /// Whether the prompt needs the restrained-tone directive.
    pub fn is_playful(&self) -> bool {
        matches!(self, Style::Humorous | Style::Sarcastic)
    }
}

/// Everything needed to talk to one generation backend.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: String,
    pub style: Style,
    pub language: String,
}

// Hand-written so the API key never ends up in debug logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("style", &self.style)
            .field("language", &self.language)
            .finish()
    }
}

/// Values given on the command line. `None` means "not passed".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub language: Option<String>,
    pub model: Option<String>,
    pub provider: Option<ProviderId>,
    pub style: Option<Style>,
    pub zai_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub editor: Option<String>,
}

/// Options for one invocation, immutable once resolved.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub provider: ProviderConfig,
    pub editor: String,
    pub remote: String,
}

impl RunOptions {
    /// Resolve flags against the process environment.
    ///
    /// Fails with [`ConfigError::MissingCredential`] when the selected
    /// provider has no API key, before any network or repository access.
    pub fn resolve(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let provider = match overrides.provider {
            Some(p) => p,
            None => match env_var("AI_PROVIDER") {
                Some(raw) => raw.parse()?,
                None => ProviderId::Gemini,
            },
        };

        let api_key = env_var(provider.api_key_var()).ok_or(ConfigError::MissingCredential {
            provider,
            variable: provider.api_key_var(),
        })?;

        let model = overrides
            .model
            .or_else(|| env_var(provider.model_var()))
            .unwrap_or_else(|| provider.default_model().to_string());

        let base_url = match provider {
            ProviderId::Gemini => None,
            ProviderId::Zai => Some(
                overrides
                    .zai_base_url
                    .or_else(|| env_var("ZAI_BASE_URL"))
                    .unwrap_or_else(|| DEFAULT_ZAI_BASE_URL.to_string()),
            ),
            ProviderId::OpenAi => Some(
                overrides
                    .openai_base_url
                    .or_else(|| env_var("OPENAI_BASE_URL"))
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ),
        };

        let language = overrides
            .language
            .or_else(|| env_var("COMMIT_LANGUAGE"))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let editor = overrides
            .editor
            .or_else(|| env_var("EDITOR"))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Ok(RunOptions {
            provider: ProviderConfig {
                provider,
                model,
                base_url,
                api_key,
                style: overrides.style.unwrap_or_default(),
                language,
            },
            editor,
            remote: DEFAULT_REMOTE.to_string(),
        })
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
