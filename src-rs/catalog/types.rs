use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub url: String,
    pub name: String,
    pub subscribers: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelProfile {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "loose_tags")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "loose_string")]
    pub subscribers: String,
}

impl ChannelProfile {
    pub fn with_defaults(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = "Unknown Channel".to_string();
        }
        if self.description.trim().is_empty() {
            self.description = "No description found.".to_string();
        }
        if self.subscribers.trim().is_empty() {
            self.subscribers = "Unknown".to_string();
        }
        self
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

// Model output is loosely typed: numbers stand in for strings and null for empty.
fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text).unwrap_or_default())
}

fn loose_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    };
    Ok(tags)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookPage {
    pub id: String,
    pub name: String,
    pub followers: u64,
    pub category: String,
    pub is_connected: bool,
}
