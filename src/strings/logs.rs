//! # Log Lines
//!
//! Messages written to the `tracing` output during startup and tool calls.

pub const SERVER_STARTING: &str = "Starting Airflow MCP Server";
pub const SERVER_READY: &str = "MCP server initialized, waiting for requests...";
pub const SERVER_STOPPED: &str = "MCP client disconnected, shutting down";
pub const WRITE_ENABLED: &str = "Write operations enabled";
pub const READ_ONLY_ENABLED: &str = "Read-only mode enabled";

pub fn airflow_url(url: &str) -> String {
    format!("Airflow URL: {url}")
}

pub fn auth_type(auth: &str) -> String {
    format!("Auth Type: {auth}")
}

pub fn access_level(level: &str) -> String {
    format!("Access Level: {level}")
}

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn startup_failed(err: &str) -> String {
    format!("Failed to start server: {err}")
}

pub fn tool_called(name: &str) -> String {
    format!("Tool call: {name}")
}

pub fn tool_failed(name: &str, err: &str) -> String {
    format!("Error executing tool {name}: {err}")
}
