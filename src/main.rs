//! # Chat Service
//!
//! HTTP service for numbered chats and messages.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Collaborator connections (PostgreSQL, Redis, Elasticsearch)
//! - The fan-out worker pool
//! - HTTP server

use anyhow::Result;
use tracing::info;

use chat_service::config::Settings;
use chat_service::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    chat_service::telemetry::init_tracing();

    info!("Starting Chat Service...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        backend = ?settings.backend,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    info!("Chat Service stopped");
    Ok(())
}
