use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::next_id;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentAction {
    AnalyzingChannel,
    DownloadStarted,
    Downloading,
    GeneratingCaption,
    Uploading,
    Idle,
    Completed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: AgentAction,
    pub message: String,
}

pub fn create_log(action: AgentAction, message: impl Into<String>) -> LogEntry {
    LogEntry {
        id: next_id("log"),
        timestamp: Utc::now(),
        action,
        message: message.into(),
    }
}
