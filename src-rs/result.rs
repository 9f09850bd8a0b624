use serde::Serialize;

use crate::activity::LogEntry;
use crate::task::VideoTask;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepOutcome {
    Idle,
    Started { task_id: String },
    Advanced { task_id: String, progress: u8 },
    Completed { task_id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    Busy,
    NoSources,
    NoDestinations,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TickReport {
    Skipped { reason: SkipReason },
    Ran { seeded: Option<String>, step: StepOutcome },
}

#[derive(Clone, Debug, Serialize)]
pub struct DashboardSummary {
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub recent_logs: Vec<LogEntry>,
    pub active_tasks: Vec<VideoTask>,
}
