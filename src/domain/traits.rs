//! # Domain Traits
//!
//! Abstract interface for the remote Airflow REST API.
//! The HTTP implementation lives in the Infrastructure layer; tool dispatch only sees this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::AirflowError;
use crate::domain::types::Page;

pub type ApiResult = Result<Value, AirflowError>;

/// Operations of the Airflow stable REST API exposed as tools.
#[async_trait]
pub trait AirflowApi: Send + Sync {
    async fn list_dags(&self, page: Page) -> ApiResult;

    async fn get_dag(&self, dag_id: &str) -> ApiResult;

    async fn get_dag_runs(&self, dag_id: &str, page: Page) -> ApiResult;

    async fn get_dag_run(&self, dag_id: &str, dag_run_id: &str) -> ApiResult;

    async fn get_task_instances(&self, dag_id: &str, dag_run_id: &str, page: Page) -> ApiResult;

    async fn get_task_instance(&self, dag_id: &str, dag_run_id: &str, task_id: &str)
    -> ApiResult;

    /// Log of one attempt of a task instance. `try_number` starts at 1.
    async fn get_task_logs(
        &self,
        dag_id: &str,
        dag_run_id: &str,
        task_id: &str,
        try_number: u32,
    ) -> ApiResult;

    async fn list_variables(&self, page: Page) -> ApiResult;

    async fn get_variable(&self, key: &str) -> ApiResult;

    async fn list_connections(&self, page: Page) -> ApiResult;

    async fn get_connection(&self, connection_id: &str) -> ApiResult;

    async fn health(&self) -> ApiResult;

    /// Create a DAG run. `conf` is only sent when it is a non-empty object.
    async fn trigger_dag(&self, dag_id: &str, conf: Option<Value>) -> ApiResult;

    async fn set_dag_paused(&self, dag_id: &str, paused: bool) -> ApiResult;

    async fn set_variable(&self, key: &str, value: &str, description: &str) -> ApiResult;

    /// Airflow answers 204; implementations return `Value::Null` for the empty body.
    async fn delete_variable(&self, key: &str) -> ApiResult;
}
