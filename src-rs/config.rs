use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::llm::{is_allowed_model, GEMINI_DEFAULT_MODEL};

pub const MIN_VIDEOS_PER_DAY: u32 = 1;
pub const MAX_VIDEOS_PER_DAY: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub videos_per_day: u32,
    pub posting_window_start: String,
    pub posting_window_end: String,
    pub auto_approve: bool,
    pub target_audience: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            videos_per_day: 3,
            posting_window_start: "08:00".to_string(),
            posting_window_end: "20:00".to_string(),
            auto_approve: true,
            target_audience: "General Audience".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AgentConfigUpdate {
    pub videos_per_day: Option<u32>,
    pub posting_window_start: Option<String>,
    pub posting_window_end: Option<String>,
    pub auto_approve: Option<bool>,
    pub target_audience: Option<String>,
}

impl AgentConfig {
    pub fn merged(&self, update: AgentConfigUpdate) -> Result<AgentConfig, ConfigError> {
        let mut next = self.clone();
        if let Some(value) = update.videos_per_day {
            next.videos_per_day = value;
        }
        if let Some(value) = update.posting_window_start {
            next.posting_window_start = value.trim().to_string();
        }
        if let Some(value) = update.posting_window_end {
            next.posting_window_end = value.trim().to_string();
        }
        if let Some(value) = update.auto_approve {
            next.auto_approve = value;
        }
        if let Some(value) = update.target_audience {
            next.target_audience = value.trim().to_string();
        }
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_VIDEOS_PER_DAY..=MAX_VIDEOS_PER_DAY).contains(&self.videos_per_day) {
            return Err(ConfigError::invalid(
                "videos_per_day",
                format!(
                    "{} is outside {}..={}",
                    self.videos_per_day, MIN_VIDEOS_PER_DAY, MAX_VIDEOS_PER_DAY
                ),
            ));
        }
        parse_clock("posting_window_start", &self.posting_window_start)?;
        parse_clock("posting_window_end", &self.posting_window_end)?;
        if self.target_audience.is_empty() {
            return Err(ConfigError::invalid("target_audience", "must not be empty"));
        }
        Ok(())
    }
}

fn parse_clock(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ConfigError::invalid(field, format!("{:?} is not HH:MM", value)))
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub port: u16,
    pub tick_interval: Duration,
    pub model: String,
    pub temperature: f64,
    pub request_timeout_secs: u64,
    pub rng_seed: Option<u64>,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            tick_interval: Duration::from_millis(3000),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            request_timeout_secs: 30,
            rng_seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let tick_ms = env_parse("CONTENT_AGENT_TICK_MS", defaults.tick_interval.as_millis() as u64)?;
        if tick_ms == 0 {
            return Err(ConfigError::InvalidEnv {
                key: "CONTENT_AGENT_TICK_MS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(Self {
            port: env_parse("PORT", defaults.port)?,
            tick_interval: Duration::from_millis(tick_ms),
            model: parse_model(env_or("CONTENT_AGENT_MODEL", defaults.model))?,
            temperature: env_parse("CONTENT_AGENT_TEMPERATURE", defaults.temperature)?,
            request_timeout_secs: env_parse("CONTENT_AGENT_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            rng_seed: match env_opt("CONTENT_AGENT_SEED") {
                Some(raw) => Some(parse_value("CONTENT_AGENT_SEED", &raw)?),
                None => None,
            },
            log_level: env_or("CONTENT_AGENT_LOG", defaults.log_level),
        })
    }
}

fn parse_model(model: String) -> Result<String, ConfigError> {
    if is_allowed_model(&model) {
        Ok(model)
    } else {
        Err(ConfigError::InvalidEnv {
            key: "CONTENT_AGENT_MODEL".to_string(),
            value: model,
        })
    }
}

fn env_or(key: &str, fallback: String) -> String {
    env_opt(key).unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn env_parse<T: FromStr>(key: &str, fallback: T) -> Result<T, ConfigError> {
    match env_opt(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(fallback),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
