//! # Command Line
//!
//! Flags layered on top of the file and environment configuration.

use clap::Parser;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::types::AccessLevel;

#[derive(Debug, Parser)]
#[command(name = "airflow-mcp", version, about = "MCP server for the Apache Airflow REST API")]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Airflow webserver URL (overrides AIRFLOW_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Tool access level (overrides AIRFLOW_ACCESS_LEVEL)
    #[arg(long, value_name = "LEVEL", value_parser = parse_access_level)]
    pub access_level: Option<AccessLevel>,

    /// Logging level
    #[arg(long, value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error"], ignore_case = true)]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Validate configuration, query Airflow health once, and exit
    #[arg(long)]
    pub check: bool,
}

fn parse_access_level(value: &str) -> Result<AccessLevel, String> {
    value.parse()
}

impl Cli {
    /// Apply command-line overrides, the highest-precedence layer.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.airflow.base_url = url.clone();
        }
        if let Some(level) = self.access_level {
            config.server.access_level = level;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.to_lowercase();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}
