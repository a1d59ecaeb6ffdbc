//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: configuration, types and the Airflow API contract
//! - Infrastructure: REST client and MCP stdio server
//! - Application: tool registry, dispatcher, logging
//! - Interface: command line and health check
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use crate::application::dispatch::Dispatcher;
use crate::application::logging;
use crate::application::tools::ToolRegistry;
use crate::domain::config::AppConfig;
use crate::domain::types::AccessLevel;
use crate::infrastructure::airflow::AirflowClient;
use crate::infrastructure::mcp::AirflowMcpServer;
use crate::interface::check::handle_check;
use crate::interface::cli::Cli;
use crate::strings::logs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Configuration: file, then environment, then flags
    let (mut config, config_path) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    config
        .apply_process_env()
        .context("Failed to read environment")?;
    cli.apply(&mut config);

    // 2. Logging (stdout belongs to the MCP transport)
    let _guard = logging::init(&config.logging)?;
    if let Some(path) = &config_path {
        tracing::info!("{}", logs::config_loaded(&path.display().to_string()));
    }

    if let Err(e) = config.validate() {
        tracing::error!("{}", logs::startup_failed(&e.to_string()));
        std::process::exit(1);
    }

    tracing::info!("{}", logs::SERVER_STARTING);
    tracing::info!("{}", logs::airflow_url(&config.airflow.base_url));
    tracing::info!("{}", logs::auth_type(config.airflow.auth_type.as_str()));
    tracing::info!("{}", logs::access_level(config.server.access_level.as_str()));
    match config.server.access_level {
        AccessLevel::Full => tracing::info!("{}", logs::WRITE_ENABLED),
        AccessLevel::ReadOnly => tracing::info!("{}", logs::READ_ONLY_ENABLED),
    }

    // 3. Airflow client
    let client = match AirflowClient::new(&config.airflow) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("{}", logs::startup_failed(&e.to_string()));
            std::process::exit(1);
        }
    };

    if cli.check {
        return handle_check(client.as_ref(), &mut std::io::stdout()).await;
    }

    // 4. Serve MCP over stdio
    let registry = ToolRegistry::new(config.server.access_level);
    let dispatcher = Arc::new(Dispatcher::new(registry, client));
    AirflowMcpServer::new(config.server.name.clone(), dispatcher)
        .run_stdio()
        .await
}
