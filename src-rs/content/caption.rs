use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AgentConfig;
use crate::error::ContentError;
use crate::llm::{CompletionRequest, Message, ProviderAdapter};

#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    async fn generate(
        &self,
        title: &str,
        source_name: &str,
        config: &AgentConfig,
    ) -> Result<String, ContentError>;
}

pub fn fallback_caption(title: &str) -> String {
    format!("New video alert: {}", title)
}

pub struct LlmCaptionGenerator {
    adapter: Option<Arc<dyn ProviderAdapter>>,
}

impl LlmCaptionGenerator {
    pub fn new(adapter: Option<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl CaptionGenerator for LlmCaptionGenerator {
    async fn generate(
        &self,
        title: &str,
        source_name: &str,
        config: &AgentConfig,
    ) -> Result<String, ContentError> {
        let adapter = self.adapter.as_ref().ok_or(ContentError::MissingCredential)?;
        let request = CompletionRequest {
            messages: vec![Message::user(caption_prompt(title, source_name, config))],
            ..Default::default()
        };
        let response = adapter.complete(request).await?;
        Ok(response.content.trim().to_string())
    }
}

fn caption_prompt(title: &str, source_name: &str, config: &AgentConfig) -> String {
    format!(
        "Write a viral Facebook post caption for a video titled \"{}\" from the channel \"{}\".\n\
         Target Audience: {}.\n\
         Style: Engaging, click-worthy, but not spammy. Include 2 hashtags.\n\
         Keep it under 280 characters.",
        title, source_name, config.target_audience
    )
}
