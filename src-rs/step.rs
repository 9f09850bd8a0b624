use crate::activity::{create_log, ActivityLog, AgentAction};
use crate::catalog::Channel;
use crate::config::AgentConfig;
use crate::content::{fallback_caption, CaptionGenerator};
use crate::result::StepOutcome;
use crate::task::{TaskStatus, TaskStore, TaskUpdate, VideoTask, MAX_PROGRESS};

pub const PROGRESS_STEP: u8 = 10;
pub const DOWNLOAD_CHECKPOINT: u8 = 20;
pub const CAPTION_CHECKPOINT: u8 = 50;
pub const UPLOAD_CHECKPOINT: u8 = 80;
const CAPTION_PREVIEW_CHARS: usize = 30;
const UNKNOWN_SOURCE: &str = "Unknown";

/// Performs at most one task transition.
pub async fn process_step(
    tasks: &mut TaskStore,
    journal: &mut ActivityLog,
    config: &AgentConfig,
    channels: &[Channel],
    captions: &dyn CaptionGenerator,
) -> StepOutcome {
    if let Some(active) = tasks.first_with_status(TaskStatus::InProgress).cloned() {
        return advance(active, tasks, journal, config, channels, captions).await;
    }

    if let Some(pending) = tasks.first_with_status(TaskStatus::Pending) {
        let task_id = pending.id.clone();
        let title = pending.title.clone();
        tasks.apply(&task_id, TaskUpdate::new().status(TaskStatus::InProgress).progress(0));
        journal.append(create_log(
            AgentAction::DownloadStarted,
            format!("Starting job for \"{}\"", title),
        ));
        tracing::info!(task_id = %task_id, title = %title, "task started");
        return StepOutcome::Started { task_id };
    }

    StepOutcome::Idle
}

async fn advance(
    task: VideoTask,
    tasks: &mut TaskStore,
    journal: &mut ActivityLog,
    config: &AgentConfig,
    channels: &[Channel],
    captions: &dyn CaptionGenerator,
) -> StepOutcome {
    let previous = task.progress;
    let progress = previous.saturating_add(PROGRESS_STEP).min(MAX_PROGRESS);
    let reached = |checkpoint: u8| previous < checkpoint && progress >= checkpoint;

    if progress < MAX_PROGRESS {
        tasks.apply(&task.id, TaskUpdate::new().progress(progress));
    }

    if reached(DOWNLOAD_CHECKPOINT) {
        journal.append(create_log(
            AgentAction::Downloading,
            format!("Downloading \"{}\"...", task.title),
        ));
    }

    if reached(CAPTION_CHECKPOINT) && task.generated_caption.is_none() {
        journal.append(create_log(
            AgentAction::GeneratingCaption,
            format!("Analyzing content for \"{}\"...", task.title),
        ));
        let source_name = channels
            .iter()
            .find(|channel| channel.id == task.channel_id)
            .map(|channel| channel.name.as_str())
            .unwrap_or(UNKNOWN_SOURCE);
        let caption = resolve_caption(&task, source_name, config, journal, captions).await;
        tasks.apply(&task.id, TaskUpdate::new().caption(caption.clone()));
        journal.append(create_log(
            AgentAction::GeneratingCaption,
            format!("Caption generated: \"{}...\"", preview(&caption)),
        ));
    }

    if reached(UPLOAD_CHECKPOINT) {
        journal.append(create_log(
            AgentAction::Uploading,
            format!("Uploading \"{}\" to Facebook Page...", task.title),
        ));
    }

    if progress >= MAX_PROGRESS {
        tasks.apply(
            &task.id,
            TaskUpdate::new().progress(MAX_PROGRESS).status(TaskStatus::Completed),
        );
        journal.append(create_log(
            AgentAction::Idle,
            format!("Successfully posted \"{}\"", task.title),
        ));
        tracing::info!(task_id = %task.id, title = %task.title, "task completed");
        return StepOutcome::Completed { task_id: task.id };
    }

    StepOutcome::Advanced {
        task_id: task.id,
        progress,
    }
}

async fn resolve_caption(
    task: &VideoTask,
    source_name: &str,
    config: &AgentConfig,
    journal: &mut ActivityLog,
    captions: &dyn CaptionGenerator,
) -> String {
    let failure = match captions.generate(&task.title, source_name, config).await {
        Ok(text) if !text.trim().is_empty() => return text,
        Ok(_) => "empty caption".to_string(),
        Err(err) => err.to_string(),
    };
    tracing::warn!(task_id = %task.id, error = %failure, "caption generation failed, using fallback");
    journal.append(create_log(
        AgentAction::Failed,
        format!(
            "Caption generation failed for \"{}\" ({}), using fallback",
            task.title, failure
        ),
    ));
    fallback_caption(&task.title)
}

fn preview(caption: &str) -> String {
    caption.chars().take(CAPTION_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::ContentError;

    enum Reply {
        Text(&'static str),
        Blank,
        Fail,
    }

    struct ScriptedCaptions {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl ScriptedCaptions {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CaptionGenerator for ScriptedCaptions {
        async fn generate(
            &self,
            _title: &str,
            source_name: &str,
            _config: &AgentConfig,
        ) -> Result<String, ContentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(format!("{} [{}]", text, source_name)),
                Reply::Blank => Ok("   ".to_string()),
                Reply::Fail => Err(ContentError::InvalidResponse("boom".to_string())),
            }
        }
    }

    fn channel(id: &str, name: &str) -> Channel {
        Channel {
            id: id.to_string(),
            url: String::new(),
            name: name.to_string(),
            subscribers: String::new(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    fn in_progress(id: &str, progress: u8) -> VideoTask {
        let mut task = VideoTask::pending(id, "c1", format!("Video {}", id));
        task.status = TaskStatus::InProgress;
        task.progress = progress;
        task
    }

    fn store(tasks: Vec<VideoTask>) -> TaskStore {
        let mut store = TaskStore::new();
        for task in tasks {
            store.insert(task);
        }
        store
    }

    async fn step(
        tasks: &mut TaskStore,
        journal: &mut ActivityLog,
        captions: &ScriptedCaptions,
    ) -> StepOutcome {
        let channels = vec![channel("c1", "Chef TV")];
        process_step(tasks, journal, &AgentConfig::default(), &channels, captions).await
    }

    fn actions(journal: &ActivityLog) -> Vec<AgentAction> {
        journal.entries().iter().map(|e| e.action).collect()
    }

    #[tokio::test]
    async fn starts_first_pending_task() {
        let mut tasks = store(vec![
            VideoTask::pending("a", "c1", "First"),
            VideoTask::pending("b", "c1", "Second"),
        ]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("hi"));

        let outcome = step(&mut tasks, &mut journal, &captions).await;

        assert_eq!(outcome, StepOutcome::Started { task_id: "a".to_string() });
        let a = tasks.get("a").unwrap();
        assert_eq!(a.status, TaskStatus::InProgress);
        assert_eq!(a.progress, 0);
        assert_eq!(tasks.get("b").unwrap().status, TaskStatus::Pending);
        assert_eq!(actions(&journal), vec![AgentAction::DownloadStarted]);
        assert!(journal.entries()[0].message.contains("First"));
    }

    #[tokio::test]
    async fn in_progress_task_blocks_pending_start() {
        let mut tasks = store(vec![
            VideoTask::pending("p", "c1", "Pending"),
            in_progress("a", 10),
            in_progress("b", 60),
        ]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("hi"));

        let outcome = step(&mut tasks, &mut journal, &captions).await;

        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                task_id: "a".to_string(),
                progress: 20
            }
        );
        assert_eq!(tasks.get("p").unwrap().status, TaskStatus::Pending);
        assert_eq!(tasks.get("b").unwrap().progress, 60);
        assert_eq!(actions(&journal), vec![AgentAction::Downloading]);
    }

    #[tokio::test]
    async fn caption_checkpoint_calls_generator_once() {
        let mut tasks = store(vec![in_progress("a", 40)]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("Fresh pasta tonight #food #pasta"));

        step(&mut tasks, &mut journal, &captions).await;

        let task = tasks.get("a").unwrap();
        assert_eq!(task.progress, 50);
        assert_eq!(
            task.generated_caption.as_deref(),
            Some("Fresh pasta tonight #food #pasta [Chef TV]")
        );
        assert_eq!(captions.calls(), 1);
        assert_eq!(
            actions(&journal),
            vec![AgentAction::GeneratingCaption, AgentAction::GeneratingCaption]
        );
        assert_eq!(
            journal.entries()[1].message,
            "Caption generated: \"Fresh pasta tonight #food #pas...\""
        );
    }

    #[tokio::test]
    async fn unknown_channel_resolves_to_placeholder_name() {
        let mut task = in_progress("a", 40);
        task.channel_id = "gone".to_string();
        let mut tasks = store(vec![task]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("hi"));

        step(&mut tasks, &mut journal, &captions).await;

        assert_eq!(tasks.get("a").unwrap().generated_caption.as_deref(), Some("hi [Unknown]"));
    }

    #[tokio::test]
    async fn final_step_completes_task() {
        let mut tasks = store(vec![in_progress("a", 90)]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("hi"));

        let outcome = step(&mut tasks, &mut journal, &captions).await;

        assert_eq!(outcome, StepOutcome::Completed { task_id: "a".to_string() });
        let task = tasks.get("a").unwrap();
        assert_eq!(task.progress, 100);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(actions(&journal), vec![AgentAction::Idle]);
        assert!(journal.entries()[0].message.contains("Video a"));
        assert_eq!(captions.calls(), 0);
    }

    #[tokio::test]
    async fn failing_generator_still_completes_with_fallback() {
        let mut tasks = store(vec![VideoTask::pending("a", "c1", "Morning Yoga Routine")]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Fail);

        let mut last = StepOutcome::Idle;
        for _ in 0..11 {
            last = step(&mut tasks, &mut journal, &captions).await;
        }

        assert_eq!(last, StepOutcome::Completed { task_id: "a".to_string() });
        let task = tasks.get("a").unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(
            task.generated_caption.as_deref(),
            Some("New video alert: Morning Yoga Routine")
        );
        assert_eq!(captions.calls(), 1);
        assert!(actions(&journal).contains(&AgentAction::Failed));
    }

    #[tokio::test]
    async fn blank_caption_uses_fallback() {
        let mut tasks = store(vec![in_progress("a", 40)]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Blank);

        step(&mut tasks, &mut journal, &captions).await;

        assert_eq!(
            tasks.get("a").unwrap().generated_caption.as_deref(),
            Some("New video alert: Video a")
        );
        assert_eq!(
            actions(&journal),
            vec![
                AgentAction::GeneratingCaption,
                AgentAction::Failed,
                AgentAction::GeneratingCaption,
            ]
        );
    }

    #[tokio::test]
    async fn full_lifecycle_is_monotonic_and_logs_each_checkpoint_once() {
        let mut tasks = store(vec![VideoTask::pending("a", "c1", "Travel Vlog")]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("caption"));

        let mut last_progress = 0;
        let mut last_len = 0;
        for _ in 0..15 {
            step(&mut tasks, &mut journal, &captions).await;
            let task = tasks.get("a").unwrap();
            assert!(task.progress >= last_progress);
            assert!(task.progress <= 100);
            assert_eq!(task.status == TaskStatus::Completed, task.progress == 100);
            assert!(journal.len() >= last_len);
            last_progress = task.progress;
            last_len = journal.len();
        }

        assert_eq!(captions.calls(), 1);
        assert_eq!(
            actions(&journal),
            vec![
                AgentAction::DownloadStarted,
                AgentAction::Downloading,
                AgentAction::GeneratingCaption,
                AgentAction::GeneratingCaption,
                AgentAction::Uploading,
                AgentAction::Idle,
            ]
        );
    }

    #[tokio::test]
    async fn nothing_to_do_is_idle() {
        let mut done = in_progress("a", 0);
        done.status = TaskStatus::Completed;
        let mut tasks = store(vec![done]);
        let mut journal = ActivityLog::new();
        let captions = ScriptedCaptions::new(Reply::Text("hi"));

        assert_eq!(step(&mut tasks, &mut journal, &captions).await, StepOutcome::Idle);
        assert!(journal.is_empty());
    }

    #[test]
    fn preview_counts_characters() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview(&"é".repeat(40)).chars().count(), 30);
    }
}
