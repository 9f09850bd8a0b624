use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_PROGRESS: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTask {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub progress: u8,
    pub generated_caption: Option<String>,
    pub facebook_page_id: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl VideoTask {
    pub fn pending(id: impl Into<String>, channel_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            title: title.into(),
            status: TaskStatus::Pending,
            progress: 0,
            generated_caption: None,
            facebook_page_id: None,
            scheduled_time: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub progress: Option<u8>,
    pub generated_caption: Option<String>,
    pub facebook_page_id: Option<String>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.generated_caption = Some(caption.into());
        self
    }

    pub fn destination(mut self, page_id: impl Into<String>) -> Self {
        self.facebook_page_id = Some(page_id.into());
        self
    }
}
