use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;

use crate::activity::{create_log, ActivityLog, AgentAction, LogEntry};
use crate::catalog::{Catalog, Channel, FacebookPage};
use crate::config::{AgentConfig, AgentConfigUpdate, ServiceConfig};
use crate::content::{
    placeholder_profile, CaptionGenerator, LlmCaptionGenerator, LlmSourceAnalyzer, SourceAnalyzer,
};
use crate::error::AgentError;
use crate::helpers::build_gemini_adapter;
use crate::result::{DashboardSummary, SkipReason, StepOutcome, TickReport};
use crate::step::process_step;
use crate::task::{TaskSeeder, TaskStatus, TaskStore, VideoTask};

const DASHBOARD_LOGS: usize = 5;
const DASHBOARD_TASKS: usize = 5;

#[derive(Clone, Debug, Default)]
pub struct AgentState {
    pub tasks: TaskStore,
    pub journal: ActivityLog,
    pub config: AgentConfig,
    pub catalog: Catalog,
}

pub struct Agent {
    state: Mutex<AgentState>,
    published: watch::Sender<Arc<AgentState>>,
    seeder: StdMutex<TaskSeeder<StdRng>>,
    captions: Arc<dyn CaptionGenerator>,
    analyzer: Arc<dyn SourceAnalyzer>,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Agent {
    pub fn new(
        state: AgentState,
        seeder: TaskSeeder<StdRng>,
        captions: Arc<dyn CaptionGenerator>,
        analyzer: Arc<dyn SourceAnalyzer>,
    ) -> Self {
        let (published, _) = watch::channel(Arc::new(state.clone()));
        Self {
            state: Mutex::new(state),
            published,
            seeder: StdMutex::new(seeder),
            captions,
            analyzer,
            busy: AtomicBool::new(false),
        }
    }

    pub fn from_service_config(cfg: &ServiceConfig) -> Result<Self, AgentError> {
        let adapter = build_gemini_adapter(cfg)?;
        let seeder = match cfg.rng_seed {
            Some(seed) => TaskSeeder::from_seed(seed),
            None => TaskSeeder::from_entropy(),
        };
        Ok(Self::new(
            AgentState::default(),
            seeder,
            Arc::new(LlmCaptionGenerator::new(adapter.clone())),
            Arc::new(LlmSourceAnalyzer::new(adapter)),
        ))
    }

    // A tick that overlaps a running one is skipped, not queued.
    pub async fn tick(&self) -> TickReport {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("tick skipped, previous tick still running");
            return TickReport::Skipped {
                reason: SkipReason::Busy,
            };
        };

        let mut guard = self.state.lock().await;
        let AgentState {
            tasks,
            journal,
            config,
            catalog,
        } = &mut *guard;

        if catalog.channels().is_empty() {
            return TickReport::Skipped {
                reason: SkipReason::NoSources,
            };
        }
        let destinations = catalog.connected_pages();
        if destinations.is_empty() {
            return TickReport::Skipped {
                reason: SkipReason::NoDestinations,
            };
        }

        let seeded = self.seed_one(tasks, catalog.channels(), &destinations);
        let step = process_step(tasks, journal, config, catalog.channels(), self.captions.as_ref()).await;
        self.publish(&guard);
        TickReport::Ran { seeded, step }
    }

    fn seed_one(
        &self,
        tasks: &mut TaskStore,
        channels: &[Channel],
        destinations: &[&FacebookPage],
    ) -> Option<String> {
        let task = {
            let mut seeder = match self.seeder.lock() {
                Ok(seeder) => seeder,
                Err(poisoned) => poisoned.into_inner(),
            };
            seeder.seed(tasks.len(), channels, destinations)?
        };
        let id = task.id.clone();
        if !tasks.insert(task) {
            return None;
        }
        tracing::debug!(task_id = %id, "task seeded");
        Some(id)
    }

    pub async fn run<F>(self: Arc<Self>, period: Duration, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);
        tracing::info!(period_ms = period.as_millis() as u64, "agent loop started");
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    if let TickReport::Ran { step: StepOutcome::Completed { task_id }, .. } = self.tick().await {
                        tracing::debug!(task_id = %task_id, "tick completed a task");
                    }
                }
            }
        }
        tracing::info!("agent loop stopped");
    }

    pub async fn add_channel(&self, url: &str) -> Result<Channel, AgentError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AgentError::InvalidArgument("channel url required".to_string()));
        }
        self.record(create_log(
            AgentAction::AnalyzingChannel,
            format!("Analyzing channel: {}", url),
        ))
        .await;

        let analysis = self.analyzer.analyze(url).await;

        let mut state = self.state.lock().await;
        let profile = match analysis {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "channel analysis failed, using placeholder");
                state.journal.append(create_log(
                    AgentAction::Failed,
                    format!("Failed to analyze: {} ({})", url, err),
                ));
                placeholder_profile(url, &err)
            }
        };
        let channel = state.catalog.add_channel(url, profile);
        state.journal.append(create_log(
            AgentAction::Completed,
            format!("Added channel: {}", channel.name),
        ));
        self.publish(&state);
        Ok(channel)
    }

    pub async fn remove_channel(&self, id: &str) -> Result<Channel, AgentError> {
        let mut state = self.state.lock().await;
        let channel = state
            .catalog
            .remove_channel(id)
            .ok_or_else(|| AgentError::NotFound(format!("channel {}", id)))?;
        self.publish(&state);
        Ok(channel)
    }

    pub async fn toggle_page(&self, id: &str) -> Result<FacebookPage, AgentError> {
        let mut state = self.state.lock().await;
        let page = state
            .catalog
            .toggle_page(id)
            .ok_or_else(|| AgentError::NotFound(format!("page {}", id)))?;
        tracing::info!(page_id = %page.id, connected = page.is_connected, "page toggled");
        self.publish(&state);
        Ok(page)
    }

    pub async fn update_config(&self, update: AgentConfigUpdate) -> Result<AgentConfig, AgentError> {
        let mut state = self.state.lock().await;
        let next = state.config.merged(update)?;
        state.config = next.clone();
        self.publish(&state);
        Ok(next)
    }

    // Read views serve the last published state, so they never wait on a running tick.
    fn snapshot(&self) -> Arc<AgentState> {
        self.published.borrow().clone()
    }

    fn publish(&self, state: &AgentState) {
        self.published.send_replace(Arc::new(state.clone()));
    }

    pub fn config(&self) -> AgentConfig {
        self.snapshot().config.clone()
    }

    pub fn tasks(&self, limit: usize) -> Vec<VideoTask> {
        self.snapshot().tasks.list().iter().take(limit).cloned().collect()
    }

    pub fn logs(&self, limit: usize) -> Vec<LogEntry> {
        self.snapshot().journal.recent(limit)
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.snapshot().catalog.channels().to_vec()
    }

    pub fn pages(&self) -> Vec<FacebookPage> {
        self.snapshot().catalog.pages().to_vec()
    }

    pub fn dashboard(&self) -> DashboardSummary {
        let state = self.snapshot();
        DashboardSummary {
            completed: state.tasks.count_with_status(TaskStatus::Completed),
            pending: state.tasks.count_with_status(TaskStatus::Pending),
            in_progress: state.tasks.count_with_status(TaskStatus::InProgress),
            recent_logs: state.journal.recent(DASHBOARD_LOGS),
            active_tasks: state
                .tasks
                .list()
                .iter()
                .filter(|task| !task.is_finished())
                .take(DASHBOARD_TASKS)
                .cloned()
                .collect(),
        }
    }

    async fn record(&self, entry: LogEntry) {
        let mut state = self.state.lock().await;
        state.journal.append(entry);
        self.publish(&state);
    }
}
