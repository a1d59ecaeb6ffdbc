//! Airflow stable REST API client
//!
//! Injects credentials on every request and maps HTTP failures onto `AirflowError`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde_json::{Value, json};
use std::time::Duration;

use crate::domain::config::AirflowConfig;
use crate::domain::errors::AirflowError;
use crate::domain::traits::{AirflowApi, ApiResult};
use crate::domain::types::{AuthType, Page, is_dot_segment};

/// Longest raw error body echoed back to the caller.
const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
}

/// HTTP implementation of [`AirflowApi`]. Cheap to share behind an `Arc`; the
/// connection pool lives for the lifetime of the client.
#[derive(Clone)]
pub struct AirflowClient {
    http: Client,
    api_root: Url,
    credentials: Credentials,
}

impl AirflowClient {
    pub fn new(config: &AirflowConfig) -> Result<Self, AirflowError> {
        let api_root = Url::parse(&config.api_root())
            .map_err(|e| AirflowError::Url(format!("{}: {}", config.api_root(), e)))?;

        let credentials = match config.auth_type {
            AuthType::Basic => Credentials::Basic {
                username: config.username.clone().unwrap_or_default(),
                password: config.password.clone().unwrap_or_default(),
            },
            AuthType::Jwt => Credentials::Bearer(config.jwt_token.clone().unwrap_or_default()),
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| AirflowError::Transport {
                url: api_root.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_root,
            credentials,
        })
    }

    /// Append percent-encoded path segments to the API root.
    ///
    /// Dot-only segments are refused: URL parsers resolve them, even as `%2E`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AirflowError> {
        if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(AirflowError::Url(format!(
                "'{segment}' cannot be used as a path segment"
            )));
        }

        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| AirflowError::Url(self.api_root.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        tracing::debug!("Airflow request: {} {}", method, url.path());

        let mut builder = self.http.request(method.clone(), url.clone());
        builder = match &self.credentials {
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::Bearer(token) => builder.bearer_auth(token),
        };
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!("Airflow request {} {} failed: {}", method, url.path(), e);
            AirflowError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| AirflowError::Transport {
            url: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!("Airflow {} {} returned {}", method, url.path(), status);
            return Err(AirflowError::Status {
                status,
                url: url.to_string(),
                detail: error_detail(status, &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| AirflowError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> ApiResult {
        self.request(Method::GET, segments, query, None).await
    }
}

/// Best-effort human message from an Airflow error response.
///
/// Airflow answers with RFC 7807 problem JSON (`title`, `detail`, `status`).
fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(problem) = serde_json::from_str::<Value>(body) {
        for field in ["detail", "title", "message"] {
            if let Some(text) = problem.get(field).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    if trimmed.chars().count() > MAX_ERROR_BODY {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl AirflowApi for AirflowClient {
    async fn list_dags(&self, page: Page) -> ApiResult {
        self.get(&["dags"], &page.query()).await
    }

    async fn get_dag(&self, dag_id: &str) -> ApiResult {
        self.get(&["dags", dag_id], &[]).await
    }

    async fn get_dag_runs(&self, dag_id: &str, page: Page) -> ApiResult {
        self.get(&["dags", dag_id, "dagRuns"], &page.query()).await
    }

    async fn get_dag_run(&self, dag_id: &str, dag_run_id: &str) -> ApiResult {
        self.get(&["dags", dag_id, "dagRuns", dag_run_id], &[]).await
    }

    async fn get_task_instances(&self, dag_id: &str, dag_run_id: &str, page: Page) -> ApiResult {
        self.get(
            &["dags", dag_id, "dagRuns", dag_run_id, "taskInstances"],
            &page.query(),
        )
        .await
    }

    async fn get_task_instance(
        &self,
        dag_id: &str,
        dag_run_id: &str,
        task_id: &str,
    ) -> ApiResult {
        self.get(
            &["dags", dag_id, "dagRuns", dag_run_id, "taskInstances", task_id],
            &[],
        )
        .await
    }

    async fn get_task_logs(
        &self,
        dag_id: &str,
        dag_run_id: &str,
        task_id: &str,
        try_number: u32,
    ) -> ApiResult {
        let try_number = try_number.to_string();
        self.get(
            &[
                "dags",
                dag_id,
                "dagRuns",
                dag_run_id,
                "taskInstances",
                task_id,
                "logs",
                &try_number,
            ],
            &[],
        )
        .await
    }

    async fn list_variables(&self, page: Page) -> ApiResult {
        self.get(&["variables"], &page.query()).await
    }

    async fn get_variable(&self, key: &str) -> ApiResult {
        self.get(&["variables", key], &[]).await
    }

    async fn list_connections(&self, page: Page) -> ApiResult {
        self.get(&["connections"], &page.query()).await
    }

    async fn get_connection(&self, connection_id: &str) -> ApiResult {
        self.get(&["connections", connection_id], &[]).await
    }

    async fn health(&self) -> ApiResult {
        self.get(&["health"], &[]).await
    }

    async fn trigger_dag(&self, dag_id: &str, conf: Option<Value>) -> ApiResult {
        let body = match conf {
            Some(Value::Object(map)) if !map.is_empty() => json!({ "conf": map }),
            _ => json!({}),
        };
        self.request(Method::POST, &["dags", dag_id, "dagRuns"], &[], Some(body))
            .await
    }

    async fn set_dag_paused(&self, dag_id: &str, paused: bool) -> ApiResult {
        self.request(
            Method::PATCH,
            &["dags", dag_id],
            &[("update_mask", "is_paused".to_string())],
            Some(json!({ "is_paused": paused })),
        )
        .await
    }

    async fn set_variable(&self, key: &str, value: &str, description: &str) -> ApiResult {
        let body = json!({
            "key": key,
            "value": value,
            "description": description,
        });
        self.request(Method::POST, &["variables"], &[], Some(body))
            .await
    }

    async fn delete_variable(&self, key: &str) -> ApiResult {
        self.request(Method::DELETE, &["variables", key], &[], None)
            .await
    }
}
