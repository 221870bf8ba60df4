mod bootstrap;
mod health;
mod service;
mod slash;

use std::time::Duration;

use anyhow::Result;
use chatci_core::config::{AppConfig, LoadOptions};
use tracing::{info, warn};

fn init_logging(config: &AppConfig) {
    use chatci_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging depends on config, so config errors surface on stderr only.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;
    let server = &app.config.server;

    let routes = health::router(health::HealthState::new(
        app.config.jenkins.base_url.clone(),
        app.config.chat.command_trigger.clone(),
    ))
    .merge(slash::router(slash::SlashState::new(
        app.command_router.clone(),
        app.config.chat.command_trigger.clone(),
        app.config.chat.verification_token.clone(),
    )));

    if app.config.chat.verification_token.is_none() {
        warn!(
            event_name = "system.server.unverified_commands",
            correlation_id = "bootstrap",
            "no verification token configured; slash command requests are not authenticated"
        );
    }

    let address = format!("{}:{}", server.bind_address, server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        jenkins_base_url = %app.jenkins.base_url(),
        command_trigger = %app.config.chat.command_trigger,
        "chatci-server listening"
    );

    let grace = Duration::from_secs(server.graceful_shutdown_secs);
    let serving =
        async move { axum::serve(listener, routes).with_graceful_shutdown(wait_for_shutdown()).await };
    tokio::select! {
        result = serving => result?,
        () = drain_deadline(grace) => {
            warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "in-flight requests did not finish before the shutdown deadline"
            );
        }
    }

    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "chatci-server stopping"
    );
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "failed to listen for ctrl-c"
        );
        std::future::pending::<()>().await;
    }
}

/// Resolves `grace` after the shutdown signal, bounding how long draining may take.
async fn drain_deadline(grace: Duration) {
    wait_for_shutdown().await;
    tokio::time::sleep(grace).await;
}
