pub mod agent;
pub mod config;
pub mod error;
pub mod helpers;
pub mod result;
pub mod step;

#[path = "activity/lib.rs"]
pub mod activity;
#[path = "catalog/lib.rs"]
pub mod catalog;
#[path = "content/lib.rs"]
pub mod content;
#[path = "llm/lib.rs"]
pub mod llm;
#[path = "task/lib.rs"]
pub mod task;
#[path = "api/lib.rs"]
pub mod api;

pub use agent::{Agent, AgentState};
pub use config::{AgentConfig, AgentConfigUpdate, ServiceConfig};
pub use error::{AgentError, ConfigError, ContentError};
pub use result::{DashboardSummary, SkipReason, StepOutcome, TickReport};
pub use step::process_step;
