use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::agent::Agent;
use crate::api::handlers::{
    handle_add_channel, handle_dashboard, handle_get_config, handle_health, handle_list_channels,
    handle_logs, handle_pages, handle_remove_channel, handle_tasks, handle_tick, handle_toggle_page,
    handle_update_config,
};

pub fn router(agent: Arc<Agent>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/dashboard", get(handle_dashboard))
        .route("/tasks", get(handle_tasks))
        .route("/logs", get(handle_logs))
        .route("/channels", get(handle_list_channels).post(handle_add_channel))
        .route("/channels/:id", delete(handle_remove_channel))
        .route("/pages", get(handle_pages))
        .route("/pages/:id/toggle", post(handle_toggle_page))
        .route("/config", get(handle_get_config).put(handle_update_config))
        .route("/tick", post(handle_tick))
        .with_state(agent)
}

pub struct AgentServer {
    pub port: u16,
    pub agent: Arc<Agent>,
}

impl AgentServer {
    pub fn new(port: u16, agent: Arc<Agent>) -> Self {
        Self { port, agent }
    }

    pub async fn start<F>(&self, shutdown: F) -> Result<(), String>
    where
        F: Future<Output = ()>,
    {
        let app = router(self.agent.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let builder = axum::Server::try_bind(&addr).map_err(|err| err.to_string())?;
        tracing::info!(%addr, "content-agent listening");
        builder
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| err.to_string())
    }
}
