//! # Tool Dispatcher
//!
//! Turns a tool name plus JSON arguments into a call on the Airflow API, enforcing
//! the access level on every call.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::application::tools::*;
use crate::domain::errors::AirflowError;
use crate::domain::traits::AirflowApi;
use crate::domain::types::{AccessLevel, Page, is_dot_segment};
use crate::strings::{logs, messages};

pub type JsonArgs = serde_json::Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{}", messages::unknown_tool(.0))]
    UnknownTool(String),
    #[error("{}", messages::READ_ONLY_DENIED)]
    ReadOnly,
    #[error("{}", messages::invalid_arguments(.tool, .reason))]
    InvalidArguments { tool: &'static str, reason: String },
    #[error(transparent)]
    Airflow(#[from] AirflowError),
}

pub struct Dispatcher {
    registry: ToolRegistry,
    api: Arc<dyn AirflowApi>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, api: Arc<dyn AirflowApi>) -> Self {
        Self { registry, api }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn access_level(&self) -> AccessLevel {
        self.registry.access_level()
    }

    /// Run a tool by name. Absent arguments are treated as an empty object.
    pub async fn call(&self, name: &str, arguments: Option<JsonArgs>) -> Result<Value, ToolError> {
        tracing::info!("{}", logs::tool_called(name));

        let result = self.execute(name, arguments.unwrap_or_default()).await;
        if let Err(e) = &result {
            tracing::error!("{}", logs::tool_failed(name, &e.to_string()));
        }
        result
    }

    async fn execute(&self, name: &str, args: JsonArgs) -> Result<Value, ToolError> {
        let tool = self
            .registry
            .lookup(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        if !self.registry.is_enabled(tool) {
            return Err(ToolError::ReadOnly);
        }

        let api = self.api.as_ref();
        let tool_name = tool.name;

        let value = match tool.kind {
            ToolKind::ListDags => {
                let p: PageParams = parse(tool_name, args)?;
                api.list_dags(p.page()).await?
            }
            ToolKind::GetDag => {
                let p: DagParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                api.get_dag(&p.dag_id).await?
            }
            ToolKind::GetDagRuns => {
                let p: DagRunsParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                api.get_dag_runs(&p.dag_id, Page::new(p.limit, p.offset))
                    .await?
            }
            ToolKind::GetDagRun => {
                let p: DagRunParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                require(tool_name, "dag_run_id", &p.dag_run_id)?;
                api.get_dag_run(&p.dag_id, &p.dag_run_id).await?
            }
            ToolKind::GetTaskInstances => {
                let p: TaskInstancesParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                require(tool_name, "dag_run_id", &p.dag_run_id)?;
                api.get_task_instances(
                    &p.dag_id,
                    &p.dag_run_id,
                    Page::new(p.limit, p.offset),
                )
                .await?
            }
            ToolKind::GetTaskInstance => {
                let p: TaskInstanceParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                require(tool_name, "dag_run_id", &p.dag_run_id)?;
                require(tool_name, "task_id", &p.task_id)?;
                api.get_task_instance(&p.dag_id, &p.dag_run_id, &p.task_id)
                    .await?
            }
            ToolKind::GetTaskLogs => {
                let p: TaskLogsParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                require(tool_name, "dag_run_id", &p.dag_run_id)?;
                require(tool_name, "task_id", &p.task_id)?;
                api.get_task_logs(&p.dag_id, &p.dag_run_id, &p.task_id, p.task_try_number)
                    .await?
            }
            ToolKind::GetVariables => {
                let p: PageParams = parse(tool_name, args)?;
                api.list_variables(p.page()).await?
            }
            ToolKind::GetVariable => {
                let p: VariableKeyParams = parse(tool_name, args)?;
                require(tool_name, "key", &p.key)?;
                api.get_variable(&p.key).await?
            }
            ToolKind::GetConnections => {
                let p: PageParams = parse(tool_name, args)?;
                api.list_connections(p.page()).await?
            }
            ToolKind::GetConnection => {
                let p: ConnectionParams = parse(tool_name, args)?;
                require(tool_name, "connection_id", &p.connection_id)?;
                api.get_connection(&p.connection_id).await?
            }
            ToolKind::GetHealth => api.health().await?,
            ToolKind::TriggerDag => {
                let p: TriggerDagParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                api.trigger_dag(&p.dag_id, p.conf.map(Value::Object)).await?
            }
            ToolKind::PauseDag => {
                let p: DagParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                api.set_dag_paused(&p.dag_id, true).await?
            }
            ToolKind::UnpauseDag => {
                let p: DagParams = parse(tool_name, args)?;
                require(tool_name, "dag_id", &p.dag_id)?;
                api.set_dag_paused(&p.dag_id, false).await?
            }
            ToolKind::SetVariable => {
                let p: SetVariableParams = parse(tool_name, args)?;
                require(tool_name, "key", &p.key)?;
                api.set_variable(&p.key, &p.value, &p.description).await?
            }
            ToolKind::DeleteVariable => {
                let p: VariableKeyParams = parse(tool_name, args)?;
                require(tool_name, "key", &p.key)?;
                match api.delete_variable(&p.key).await? {
                    Value::Null => json!({ "key": p.key, "deleted": true }),
                    other => other,
                }
            }
        };

        Ok(value)
    }
}

fn parse<T: DeserializeOwned>(tool: &'static str, args: JsonArgs) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::InvalidArguments {
        tool,
        reason: e.to_string(),
    })
}

/// Identifiers end up as URL path segments; an empty or dot-only one would
/// address a different resource.
fn require(tool: &'static str, field: &str, value: &str) -> Result<(), ToolError> {
    let reason = if value.trim().is_empty() {
        messages::empty_argument(field)
    } else if is_dot_segment(value) {
        messages::dot_argument(field)
    } else {
        return Ok(());
    };
    Err(ToolError::InvalidArguments { tool, reason })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::traits::ApiResult;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Records every call and answers with a canned payload describing it.
    #[derive(Default)]
    pub(crate) struct RecordingApi {
        pub calls: Mutex<Vec<String>>,
        pub fail_with_status: Option<StatusCode>,
        pub delete_body: Option<Value>,
    }

    impl RecordingApi {
        fn record(&self, call: String) -> ApiResult {
            self.calls.lock().unwrap().push(call.clone());
            if let Some(status) = self.fail_with_status {
                return Err(AirflowError::Status {
                    status,
                    url: "http://airflow/api/v1".to_string(),
                    detail: "boom".to_string(),
                });
            }
            Ok(json!({ "call": call }))
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AirflowApi for RecordingApi {
        async fn list_dags(&self, page: Page) -> ApiResult {
            self.record(format!("list_dags {} {}", page.limit, page.offset))
        }
        async fn get_dag(&self, dag_id: &str) -> ApiResult {
            self.record(format!("get_dag {dag_id}"))
        }
        async fn get_dag_runs(&self, dag_id: &str, page: Page) -> ApiResult {
            self.record(format!("get_dag_runs {dag_id} {} {}", page.limit, page.offset))
        }
        async fn get_dag_run(&self, dag_id: &str, dag_run_id: &str) -> ApiResult {
            self.record(format!("get_dag_run {dag_id} {dag_run_id}"))
        }
        async fn get_task_instances(&self, dag_id: &str, run: &str, page: Page) -> ApiResult {
            self.record(format!(
                "get_task_instances {dag_id} {run} {} {}",
                page.limit, page.offset
            ))
        }
        async fn get_task_instance(&self, dag_id: &str, run: &str, task: &str) -> ApiResult {
            self.record(format!("get_task_instance {dag_id} {run} {task}"))
        }
        async fn get_task_logs(&self, dag_id: &str, run: &str, task: &str, n: u32) -> ApiResult {
            self.record(format!("get_task_logs {dag_id} {run} {task} {n}"))
        }
        async fn list_variables(&self, page: Page) -> ApiResult {
            self.record(format!("list_variables {} {}", page.limit, page.offset))
        }
        async fn get_variable(&self, key: &str) -> ApiResult {
            self.record(format!("get_variable {key}"))
        }
        async fn list_connections(&self, page: Page) -> ApiResult {
            self.record(format!("list_connections {} {}", page.limit, page.offset))
        }
        async fn get_connection(&self, connection_id: &str) -> ApiResult {
            self.record(format!("get_connection {connection_id}"))
        }
        async fn health(&self) -> ApiResult {
            self.record("health".to_string())
        }
        async fn trigger_dag(&self, dag_id: &str, conf: Option<Value>) -> ApiResult {
            let conf = conf.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
            self.record(format!("trigger_dag {dag_id} {conf}"))
        }
        async fn set_dag_paused(&self, dag_id: &str, paused: bool) -> ApiResult {
            self.record(format!("set_dag_paused {dag_id} {paused}"))
        }
        async fn set_variable(&self, key: &str, value: &str, description: &str) -> ApiResult {
            self.record(format!("set_variable {key}={value} '{description}'"))
        }
        async fn delete_variable(&self, key: &str) -> ApiResult {
            self.calls.lock().unwrap().push(format!("delete_variable {key}"));
            Ok(self.delete_body.clone().unwrap_or(Value::Null))
        }
    }

    fn dispatcher(level: AccessLevel) -> (Dispatcher, Arc<RecordingApi>) {
        let api = Arc::new(RecordingApi::default());
        (Dispatcher::new(ToolRegistry::new(level), api.clone()), api)
    }

    fn args(value: Value) -> Option<JsonArgs> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_list_tools_use_default_pagination() {
        let (dispatcher, api) = dispatcher(AccessLevel::ReadOnly);

        dispatcher.call("list_dags", None).await.unwrap();
        dispatcher
            .call("get_variables", args(json!({"limit": 5})))
            .await
            .unwrap();
        dispatcher
            .call("get_connections", args(json!({"offset": 10})))
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "list_dags 100 0",
                "list_variables 5 0",
                "list_connections 100 10"
            ]
        );
    }

    #[tokio::test]
    async fn test_read_tools_forward_identifiers() {
        let (dispatcher, api) = dispatcher(AccessLevel::ReadOnly);

        dispatcher
            .call("get_dag_runs", args(json!({"dag_id": "etl", "limit": 3})))
            .await
            .unwrap();
        dispatcher
            .call(
                "get_task_instances",
                args(json!({"dag_id": "etl", "dag_run_id": "r1"})),
            )
            .await
            .unwrap();
        dispatcher
            .call(
                "get_task_logs",
                args(json!({"dag_id": "etl", "dag_run_id": "r1", "task_id": "load"})),
            )
            .await
            .unwrap();
        dispatcher
            .call("get_connection", args(json!({"connection_id": "pg"})))
            .await
            .unwrap();
        let result = dispatcher.call("get_health", None).await.unwrap();

        assert_eq!(result, json!({"call": "health"}));
        assert_eq!(
            api.calls(),
            vec![
                "get_dag_runs etl 3 0",
                "get_task_instances etl r1 100 0",
                "get_task_logs etl r1 load 1",
                "get_connection pg",
                "health"
            ]
        );
    }

    #[tokio::test]
    async fn test_write_tools_rejected_in_read_only_mode() {
        let (dispatcher, api) = dispatcher(AccessLevel::ReadOnly);

        for (name, arguments) in [
            ("trigger_dag", json!({"dag_id": "etl"})),
            ("pause_dag", json!({"dag_id": "etl"})),
            ("unpause_dag", json!({"dag_id": "etl"})),
            ("set_variable", json!({"key": "k", "value": "v"})),
            ("delete_variable", json!({"key": "k"})),
        ] {
            let err = dispatcher.call(name, args(arguments)).await.unwrap_err();
            assert!(matches!(err, ToolError::ReadOnly), "{name} was not gated");
            assert_eq!(err.to_string(), "Operation not permitted in read-only mode");
        }

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_write_tools_in_full_mode() {
        let (dispatcher, api) = dispatcher(AccessLevel::Full);

        dispatcher
            .call(
                "trigger_dag",
                args(json!({"dag_id": "etl", "conf": {"day": "mon"}})),
            )
            .await
            .unwrap();
        dispatcher
            .call("pause_dag", args(json!({"dag_id": "etl"})))
            .await
            .unwrap();
        dispatcher
            .call("unpause_dag", args(json!({"dag_id": "etl"})))
            .await
            .unwrap();
        dispatcher
            .call("set_variable", args(json!({"key": "env", "value": "prod"})))
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                r#"trigger_dag etl {"day":"mon"}"#,
                "set_dag_paused etl true",
                "set_dag_paused etl false",
                "set_variable env=prod ''"
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_variable_reports_deleted_key() {
        let (dispatcher, _api) = dispatcher(AccessLevel::Full);
        let result = dispatcher
            .call("delete_variable", args(json!({"key": "env"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"key": "env", "deleted": true}));
    }

    #[tokio::test]
    async fn test_delete_variable_keeps_non_empty_response() {
        let api = Arc::new(RecordingApi {
            delete_body: Some(json!({"key": "env", "value": "prod"})),
            ..RecordingApi::default()
        });
        let dispatcher = Dispatcher::new(ToolRegistry::new(AccessLevel::Full), api);

        let result = dispatcher
            .call("delete_variable", args(json!({"key": "env"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"key": "env", "value": "prod"}));
    }

    #[tokio::test]
    async fn test_dot_only_identifiers_rejected() {
        let (dispatcher, api) = dispatcher(AccessLevel::Full);

        let err = dispatcher
            .call("get_variable", args(json!({"key": "."})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'key' must not be '.' or '..'"));

        let err = dispatcher
            .call("get_dag_runs", args(json!({"dag_id": ".."})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "get_dag_runs", .. }));

        dispatcher
            .call("get_variable", args(json!({"key": ".env"})))
            .await
            .unwrap();
        assert_eq!(api.calls(), vec!["get_variable .env"]);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (dispatcher, _api) = dispatcher(AccessLevel::Full);
        let err = dispatcher.call("drop_dag", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: drop_dag");
    }

    #[tokio::test]
    async fn test_missing_and_empty_arguments() {
        let (dispatcher, api) = dispatcher(AccessLevel::ReadOnly);

        let err = dispatcher.call("get_dag", None).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "get_dag", .. }));
        assert!(err.to_string().contains("dag_id"));

        let err = dispatcher
            .call("get_dag", args(json!({"dag_id": "  "})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'dag_id' must not be empty"));

        let err = dispatcher
            .call("list_dags", args(json!({"limit": -1})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_airflow_errors_propagate() {
        let api = Arc::new(RecordingApi {
            fail_with_status: Some(StatusCode::NOT_FOUND),
            ..RecordingApi::default()
        });
        let dispatcher = Dispatcher::new(ToolRegistry::new(AccessLevel::ReadOnly), api);

        let err = dispatcher
            .call("get_dag", args(json!({"dag_id": "nope"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Airflow(_)));
        assert!(err.to_string().contains("404"));
    }
}
