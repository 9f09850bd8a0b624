use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::rotation::Rotator;
use super::types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const GEMINI_ALLOWED_MODELS: [&str; 2] = ["gemini-2.5-flash", "gemini-2.5-pro"];

pub struct GeminiConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

pub struct GeminiAdapter {
    cfg: GeminiConfig,
    rotator: Rotator,
    client: Client,
}

impl GeminiAdapter {
    pub fn new(mut cfg: GeminiConfig) -> Result<Self, ProviderError> {
        if cfg.base_url.is_empty() {
            cfg.base_url = GEMINI_BASE_URL.to_string();
        }
        if cfg.model.is_empty() {
            cfg.model = GEMINI_DEFAULT_MODEL.to_string();
        }
        if !is_allowed_model(&cfg.model) {
            return Err(ProviderError::new(
                "invalid_model",
                &format!("model not allowed: {}", cfg.model),
                false,
            ));
        }
        if cfg.timeout_secs == 0 {
            cfg.timeout_secs = 30;
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|err| ProviderError::new("client_error", &err.to_string(), false))?;
        Ok(Self {
            rotator: Rotator::new(cfg.api_keys.clone()),
            cfg,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    async fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let payload = build_payload(
            &request.messages,
            self.cfg.temperature,
            request.response_mime_type.as_deref(),
        );

        let tries = self.rotator.len();
        if tries == 0 {
            return Err(ProviderError::new("auth_error", "no Gemini API keys", false));
        }
        let mut last_err = None;
        for _ in 0..tries {
            let key = match self.rotator.next() {
                Some(key) => key,
                None => break,
            };
            match send_request(&self.client, &self.cfg.base_url, &self.cfg.model, key, &payload).await {
                Ok(resp) => return Ok(resp),
                Err(err) if err.retryable => {
                    tracing::debug!(code = %err.code, "gemini request failed, rotating key");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| ProviderError::new("api_error", "request failed", true)))
    }
}

pub fn is_allowed_model(model: &str) -> bool {
    GEMINI_ALLOWED_MODELS.contains(&model)
}

fn build_payload(messages: &[Message], temperature: f64, response_mime_type: Option<&str>) -> Value {
    let contents: Vec<Value> = messages
        .iter()
        .map(|msg| {
            json!({
                "role": msg.role,
                "parts": [{"text": msg.content}]
            })
        })
        .collect();

    let mut payload = json!({
        "contents": contents,
        "generationConfig": {
            "temperature": temperature
        }
    });

    if let Some(mime) = response_mime_type {
        payload["generationConfig"]["responseMimeType"] = json!(mime);
    }

    payload
}

async fn send_request(
    client: &Client,
    base_url: &str,
    model: &str,
    api_key: &str,
    payload: &Value,
) -> Result<LLMResponse, ProviderError> {
    let endpoint = format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    );
    let resp = client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(payload)
        .send()
        .await
        .map_err(|err| ProviderError::new("network_error", &err.to_string(), true))?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if let Some(err) = classify_status(status.as_u16(), &body) {
        return Err(err);
    }

    let raw: Value = serde_json::from_str(&body)
        .map_err(|_| ProviderError::new("parse_error", "invalid json", false))?;
    let content = parse_response(&raw);
    Ok(LLMResponse {
        content,
        raw: Some(raw),
    })
}

fn classify_status(status: u16, body: &str) -> Option<ProviderError> {
    if status < 400 {
        return None;
    }
    let lowered = body.to_lowercase();
    if status == 401 || status == 403 {
        return Some(ProviderError::new("auth_error", body, true));
    }
    if status == 429 || lowered.contains("quota") || lowered.contains("resource_exhausted") {
        return Some(ProviderError::new("rate_limit", body, true));
    }
    if status >= 500 {
        return Some(ProviderError::new("server_error", body, true));
    }
    Some(ProviderError::new("api_error", body, false))
}

fn parse_response(raw: &Value) -> String {
    let mut text = String::new();

    let parts = raw
        .get("candidates")
        .and_then(|v| v.as_array())
        .and_then(|list| list.first())
        .and_then(|first| first.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|v| v.as_array());
    let parts = match parts {
        Some(parts) => parts,
        None => return text,
    };

    for part in parts {
        if let Some(chunk) = part.get("text").and_then(|v| v.as_str()) {
            text.push_str(chunk);
        }
    }

    text
}
