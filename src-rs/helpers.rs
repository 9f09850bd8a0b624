use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::config::ServiceConfig;
use crate::llm::{GeminiAdapter, GeminiConfig, ProviderAdapter, ProviderError, GEMINI_BASE_URL};

static COUNTER: AtomicUsize = AtomicUsize::new(1);

pub(crate) fn next_id(prefix: &str) -> String {
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), count)
}

fn load_keys_from_env(primary: &str, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Ok(raw) = env::var(primary) {
        for item in raw.split(',') {
            let trimmed = item.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    for idx in 2..=10 {
        let key = format!("{}_{}", prefix, idx);
        if let Ok(value) = env::var(&key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    keys
}

pub fn load_gemini_keys() -> Vec<String> {
    load_keys_from_env("GEMINI_API_KEY", "GEMINI_API_KEY")
}

pub fn build_gemini_adapter(cfg: &ServiceConfig) -> Result<Option<Arc<dyn ProviderAdapter>>, ProviderError> {
    let keys = load_gemini_keys();
    if keys.is_empty() {
        tracing::warn!("GEMINI_API_KEY not set; captions and channel analysis use fallback text");
        return Ok(None);
    }
    let adapter = GeminiAdapter::new(GeminiConfig {
        api_keys: keys,
        base_url: GEMINI_BASE_URL.to_string(),
        model: cfg.model.clone(),
        temperature: cfg.temperature,
        timeout_secs: cfg.request_timeout_secs,
    })?;
    let adapter: Arc<dyn ProviderAdapter> = Arc::new(adapter);
    Ok(Some(adapter))
}

pub fn init_tracing(fallback_level: &str) {
    let fallback = match fallback_level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
