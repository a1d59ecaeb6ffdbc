//! # Configuration
//!
//! Loads the server configuration from an optional YAML file, then overlays
//! `AIRFLOW_*` environment variables. Command-line overrides are applied by `main`.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::types::{AccessLevel, AuthType};

pub const ENV_BASE_URL: &str = "AIRFLOW_BASE_URL";
pub const ENV_AUTH_TYPE: &str = "AIRFLOW_AUTH_TYPE";
pub const ENV_USERNAME: &str = "AIRFLOW_USERNAME";
pub const ENV_PASSWORD: &str = "AIRFLOW_PASSWORD";
pub const ENV_JWT_TOKEN: &str = "AIRFLOW_JWT_TOKEN";
pub const ENV_ACCESS_LEVEL: &str = "AIRFLOW_ACCESS_LEVEL";
pub const ENV_VERIFY_SSL: &str = "AIRFLOW_VERIFY_SSL";
pub const ENV_TIMEOUT: &str = "AIRFLOW_TIMEOUT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
    #[error("{0}")]
    Invalid(String),
}

/// Main application configuration structure.
/// Matches the layout of `config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub airflow: AirflowConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the Airflow webserver.
#[derive(Deserialize, Clone)]
pub struct AirflowConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub jwt_token: Option<String>,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AirflowConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_type: AuthType::default(),
            username: None,
            password: None,
            jwt_token: None,
            verify_ssl: default_verify_ssl(),
            timeout_secs: default_timeout(),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for AirflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirflowConfig")
            .field("base_url", &self.base_url)
            .field("auth_type", &self.auth_type)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("jwt_token", &self.jwt_token.as_ref().map(|_| "***"))
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AirflowConfig {
    /// Root of the stable REST API, e.g. `http://localhost:8080/api/v1`.
    pub fn api_root(&self) -> String {
        format!("{}/api/v1", self.base_url.trim_end_matches('/'))
    }
}

/// MCP-facing settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub access_level: AccessLevel,
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            access_level: AccessLevel::default(),
            name: default_server_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_server_name() -> String {
    "airflow-mcp-server".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `<config_dir>/airflow-mcp/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("airflow-mcp").join("config.yaml"))
}

impl AppConfig {
    /// Load from an explicit file, the default location if it exists, or defaults.
    ///
    /// Also returns the file that was read, if any.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let source = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok((config, source))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Overlay values from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay `AIRFLOW_*` values returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let airflow = &mut self.airflow;

        if let Some(url) = lookup(ENV_BASE_URL) {
            airflow.base_url = url;
        }
        if let Some(auth) = lookup(ENV_AUTH_TYPE) {
            airflow.auth_type = auth.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: ENV_AUTH_TYPE,
                reason,
            })?;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            airflow.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            airflow.password = Some(password);
        }
        if let Some(token) = lookup(ENV_JWT_TOKEN) {
            airflow.jwt_token = Some(token);
        }
        if let Some(verify) = lookup(ENV_VERIFY_SSL) {
            airflow.verify_ssl = verify.trim().eq_ignore_ascii_case("true");
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            airflow.timeout_secs =
                timeout
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnv {
                        var: ENV_TIMEOUT,
                        reason: e.to_string(),
                    })?;
        }
        if let Some(level) = lookup(ENV_ACCESS_LEVEL) {
            self.server.access_level =
                level.parse().map_err(|reason| ConfigError::InvalidEnv {
                    var: ENV_ACCESS_LEVEL,
                    reason,
                })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let airflow = &self.airflow;

        if airflow.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{ENV_BASE_URL} is required")));
        }
        match reqwest::Url::parse(&airflow.base_url) {
            Ok(url) if !url.username().is_empty() || url.password().is_some() => {
                return Err(ConfigError::Invalid(format!(
                    "{ENV_BASE_URL} must not embed credentials; use {ENV_USERNAME}/{ENV_PASSWORD}"
                )));
            }
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(ConfigError::Invalid(format!(
                    "{ENV_BASE_URL} must use http or https, got '{}'",
                    url.scheme()
                )));
            }
            Err(e) => {
                return Err(ConfigError::Invalid(format!(
                    "{ENV_BASE_URL} '{}' is not a valid URL: {e}",
                    airflow.base_url
                )));
            }
        }

        match airflow.auth_type {
            AuthType::Basic => {
                if is_blank(&airflow.username) || is_blank(&airflow.password) {
                    return Err(ConfigError::Invalid(
                        "Username and password are required for basic auth".to_string(),
                    ));
                }
            }
            AuthType::Jwt => {
                if is_blank(&airflow.jwt_token) {
                    return Err(ConfigError::Invalid(
                        "JWT token is required for JWT auth".to_string(),
                    ));
                }
            }
        }

        if airflow.timeout_secs == 0 {
            return Err(ConfigError::Invalid(format!(
                "{ENV_TIMEOUT} must be greater than zero"
            )));
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
