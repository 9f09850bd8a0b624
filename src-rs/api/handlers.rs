use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::activity::LogEntry;
use crate::agent::Agent;
use crate::catalog::{Channel, FacebookPage};
use crate::config::{AgentConfig, AgentConfigUpdate};
use crate::error::AgentError;
use crate::result::{DashboardSummary, TickReport};
use crate::task::VideoTask;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AddChannelRequest {
    pub url: String,
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let status = match &self {
            AgentError::NotFound(_) => StatusCode::NOT_FOUND,
            AgentError::InvalidArgument(_) | AgentError::Config(_) => StatusCode::BAD_REQUEST,
            AgentError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_dashboard(State(agent): State<Arc<Agent>>) -> Json<DashboardSummary> {
    Json(agent.dashboard())
}

pub async fn handle_tasks(
    State(agent): State<Arc<Agent>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<VideoTask>> {
    Json(agent.tasks(query.limit.unwrap_or(DEFAULT_LIMIT)))
}

pub async fn handle_logs(
    State(agent): State<Arc<Agent>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<LogEntry>> {
    Json(agent.logs(query.limit.unwrap_or(DEFAULT_LIMIT)))
}

pub async fn handle_list_channels(State(agent): State<Arc<Agent>>) -> Json<Vec<Channel>> {
    Json(agent.channels())
}

pub async fn handle_add_channel(
    State(agent): State<Arc<Agent>>,
    Json(req): Json<AddChannelRequest>,
) -> Result<(StatusCode, Json<Channel>), AgentError> {
    let channel = agent.add_channel(&req.url).await?;
    Ok((StatusCode::CREATED, Json(channel)))
}

pub async fn handle_remove_channel(
    State(agent): State<Arc<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Channel>, AgentError> {
    agent.remove_channel(&id).await.map(Json)
}

pub async fn handle_pages(State(agent): State<Arc<Agent>>) -> Json<Vec<FacebookPage>> {
    Json(agent.pages())
}

pub async fn handle_toggle_page(
    State(agent): State<Arc<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<FacebookPage>, AgentError> {
    agent.toggle_page(&id).await.map(Json)
}

pub async fn handle_get_config(State(agent): State<Arc<Agent>>) -> Json<AgentConfig> {
    Json(agent.config())
}

pub async fn handle_update_config(
    State(agent): State<Arc<Agent>>,
    Json(update): Json<AgentConfigUpdate>,
) -> Result<Json<AgentConfig>, AgentError> {
    agent.update_config(update).await.map(Json)
}

pub async fn handle_tick(State(agent): State<Arc<Agent>>) -> Json<TickReport> {
    Json(agent.tick().await)
}
