use std::process::ExitCode;
use std::sync::Arc;

use content_agent_rs::api::AgentServer;
use content_agent_rs::helpers::init_tracing;
use content_agent_rs::{Agent, ServiceConfig};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("config error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&cfg.log_level);

    let agent = match Agent::from_service_config(&cfg) {
        Ok(agent) => Arc::new(agent),
        Err(err) => {
            tracing::error!(error = %err, "failed to build agent");
            return ExitCode::FAILURE;
        }
    };

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut loop_rx = stop_rx.clone();
    let ticker = tokio::spawn(agent.clone().run(cfg.tick_interval, async move {
        let _ = loop_rx.changed().await;
    }));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
        }
        let _ = stop_tx.send(true);
    });

    let server = AgentServer::new(cfg.port, agent);
    let mut server_rx = stop_rx;
    let served = server
        .start(async move {
            let _ = server_rx.changed().await;
        })
        .await;
    if served.is_err() {
        ticker.abort();
    }
    let _ = ticker.await;

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server error");
            ExitCode::FAILURE
        }
    }
}
