//! Prompt construction and provider backends for commit message generation.

pub mod backend;
pub mod chat;
pub mod gateway;
pub mod gemini;
mod http;
pub mod prompt;

pub use backend::Backend;
pub use chat::ChatCompletionsClient;
pub use gateway::{
    FALLBACK_MESSAGE, GenerationBackend, GenerationOutcome, generate, normalize_response,
};
pub use gemini::GeminiClient;
pub use prompt::build_prompt;
