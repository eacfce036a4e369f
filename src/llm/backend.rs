//! Backend selection, done once per run from the resolved config.

use async_trait::async_trait;

use crate::config::{ProviderConfig, ProviderId};
use crate::error::BackendError;
use crate::llm::chat::ChatCompletionsClient;
use crate::llm::gateway::GenerationBackend;
use crate::llm::gemini::GeminiClient;

/// The concrete backend for the selected provider.
pub enum Backend {
    Gemini(GeminiClient),
    ChatCompletions(ChatCompletionsClient),
}

impl Backend {
    pub fn from_config(config: &ProviderConfig) -> Self {
        match config.provider {
            ProviderId::Gemini => Backend::Gemini(GeminiClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
            )),
            ProviderId::Zai | ProviderId::OpenAi => {
                Backend::ChatCompletions(ChatCompletionsClient::new(
                    config.provider,
                    config.api_key.clone(),
                    config.model.clone(),
                    config.base_url.clone().unwrap_or_default(),
                ))
            }
        }
    }
}

#[async_trait]
impl GenerationBackend for Backend {
    fn provider(&self) -> ProviderId {
        match self {
            Backend::Gemini(client) => client.provider(),
            Backend::ChatCompletions(client) => client.provider(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>, BackendError> {
        match self {
            Backend::Gemini(client) => client.complete(prompt).await,
            Backend::ChatCompletions(client) => client.complete(prompt).await,
        }
    }
}
