pub mod gemini_adapter;
pub mod rotation;
pub mod types;

pub use gemini_adapter::{
    is_allowed_model, GeminiAdapter, GeminiConfig, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL,
};
pub use rotation::Rotator;
pub use types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError};
