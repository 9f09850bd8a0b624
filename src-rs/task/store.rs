use super::types::{TaskStatus, TaskUpdate, VideoTask, MAX_PROGRESS};

#[derive(Clone, Debug, Default)]
pub struct TaskStore {
    tasks: Vec<VideoTask>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn list(&self) -> &[VideoTask] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&VideoTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn first_with_status(&self, status: TaskStatus) -> Option<&VideoTask> {
        self.tasks.iter().find(|task| task.status == status)
    }

    pub fn count_with_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|task| task.status == status).count()
    }

    pub fn insert(&mut self, mut task: VideoTask) -> bool {
        if self.get(&task.id).is_some() {
            tracing::warn!(task_id = %task.id, "duplicate task id rejected");
            return false;
        }
        normalize(&mut task);
        self.tasks.push(task);
        true
    }

    // Progress is 100 exactly when the task is completed and never regresses while in progress.
    pub fn apply(&mut self, id: &str, update: TaskUpdate) -> Option<&VideoTask> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(task_id = %id, "update for unknown task ignored");
            return None;
        };

        let was_in_progress = task.status == TaskStatus::InProgress;
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(progress) = update.progress {
            let stays_in_progress = was_in_progress && task.status == TaskStatus::InProgress;
            if stays_in_progress && progress < task.progress {
                tracing::warn!(
                    task_id = %id,
                    current = task.progress,
                    requested = progress,
                    "progress regression ignored"
                );
            } else {
                task.progress = progress;
            }
        }
        if let Some(caption) = update.generated_caption {
            task.generated_caption = Some(caption);
        }
        if let Some(page_id) = update.facebook_page_id {
            task.facebook_page_id = Some(page_id);
        }
        normalize(task);
        Some(&*task)
    }
}

fn normalize(task: &mut VideoTask) {
    if task.progress >= MAX_PROGRESS || task.status == TaskStatus::Completed {
        task.progress = MAX_PROGRESS;
        task.status = TaskStatus::Completed;
    }
}
