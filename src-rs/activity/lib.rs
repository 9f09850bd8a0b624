pub mod journal;
pub mod types;

pub use journal::ActivityLog;
pub use types::{create_log, AgentAction, LogEntry};
