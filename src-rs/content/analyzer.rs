use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::ChannelProfile;
use crate::error::ContentError;
use crate::llm::{CompletionRequest, Message, ProviderAdapter};

#[async_trait]
pub trait SourceAnalyzer: Send + Sync {
    async fn analyze(&self, reference: &str) -> Result<ChannelProfile, ContentError>;
}

pub fn placeholder_profile(reference: &str, err: &ContentError) -> ChannelProfile {
    match err {
        ContentError::MissingCredential => ChannelProfile {
            name: "Unknown Channel".to_string(),
            description: "API Key missing. Cannot analyze.".to_string(),
            tags: vec!["Error".to_string()],
            subscribers: "0".to_string(),
        },
        _ => ChannelProfile {
            name: format!("Channel {}", reference.chars().take(10).collect::<String>()),
            description: "Could not analyze channel details.".to_string(),
            tags: vec!["General".to_string()],
            subscribers: "Unknown".to_string(),
        },
    }
}

pub struct LlmSourceAnalyzer {
    adapter: Option<Arc<dyn ProviderAdapter>>,
}

impl LlmSourceAnalyzer {
    pub fn new(adapter: Option<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl SourceAnalyzer for LlmSourceAnalyzer {
    async fn analyze(&self, reference: &str) -> Result<ChannelProfile, ContentError> {
        let adapter = self.adapter.as_ref().ok_or(ContentError::MissingCredential)?;
        let request = CompletionRequest {
            messages: vec![Message::user(analysis_prompt(reference))],
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        };
        let response = adapter.complete(request).await?;
        parse_profile(&response.content)
    }
}

fn analysis_prompt(reference: &str) -> String {
    format!(
        "Analyze the YouTube channel URL/Name: \"{}\".\n\
         Return a JSON object with fields: \"name\" (creative guess based on url), \
         \"description\" (short 1 sentence summary), \"tags\" (array of 3 strings), \
         \"subscribers\" (estimate string like '1.2M').",
        reference
    )
}

fn parse_profile(text: &str) -> Result<ChannelProfile, ContentError> {
    let trimmed = text.trim();
    let body = if trimmed.is_empty() { "{}" } else { trimmed };
    serde_json::from_str::<ChannelProfile>(body)
        .map_err(|err| ContentError::InvalidResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMResponse, ProviderError};

    struct Canned(&'static str);

    #[async_trait]
    impl ProviderAdapter for Canned {
        async fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
            assert_eq!(request.response_mime_type.as_deref(), Some("application/json"));
            Ok(LLMResponse {
                content: self.0.to_string(),
                raw: None,
            })
        }
    }

    #[tokio::test]
    async fn parses_json_profile() {
        let analyzer = LlmSourceAnalyzer::new(Some(Arc::new(Canned(
            r#"{"name":"Chef TV","description":"Cooking.","tags":["food","pasta","italy"],"subscribers":"1.2M"}"#,
        ))));
        let profile = analyzer.analyze("youtube.com/@cheftv").await.unwrap();
        assert_eq!(profile.name, "Chef TV");
        assert_eq!(profile.tags.len(), 3);
        assert_eq!(profile.subscribers, "1.2M");
    }

    #[tokio::test]
    async fn partial_json_leaves_blank_fields() {
        let analyzer = LlmSourceAnalyzer::new(Some(Arc::new(Canned(r#"{"name":"Only Name"}"#))));
        let profile = analyzer.analyze("x").await.unwrap();
        assert_eq!(profile.name, "Only Name");
        assert!(profile.description.is_empty());
    }

    #[tokio::test]
    async fn numeric_subscribers_and_null_tags_still_parse() {
        let analyzer = LlmSourceAnalyzer::new(Some(Arc::new(Canned(
            r#"{"name":"Chef TV","description":"Cooking.","tags":null,"subscribers":45000}"#,
        ))));
        let profile = analyzer.analyze("x").await.unwrap();
        assert_eq!(profile.name, "Chef TV");
        assert_eq!(profile.subscribers, "45000");
        assert!(profile.tags.is_empty());
    }

    #[tokio::test]
    async fn garbage_is_an_invalid_response() {
        let analyzer = LlmSourceAnalyzer::new(Some(Arc::new(Canned("not json"))));
        let err = analyzer.analyze("x").await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidResponse(_)));
    }

    #[test]
    fn placeholders_depend_on_failure_kind() {
        let missing = placeholder_profile("https://youtube.com/@abc", &ContentError::MissingCredential);
        assert_eq!(missing.name, "Unknown Channel");
        assert_eq!(missing.tags, vec!["Error".to_string()]);
        assert_eq!(missing.subscribers, "0");

        let failed = placeholder_profile(
            "https://youtube.com/@abc",
            &ContentError::Provider(ProviderError::new("network_error", "down", true)),
        );
        assert_eq!(failed.name, "Channel https://yo");
        assert_eq!(failed.description, "Could not analyze channel details.");
        assert_eq!(failed.subscribers, "Unknown");
    }
}
