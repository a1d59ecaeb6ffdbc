//! # Tool Descriptions
//!
//! Descriptions advertised to MCP clients in `tools/list`.

pub const LIST_DAGS: &str = "List all DAGs in Airflow";
pub const GET_DAG: &str = "Get details of a specific DAG";
pub const GET_DAG_RUNS: &str = "Get DAG runs for a specific DAG";
pub const GET_DAG_RUN: &str = "Get details of a single DAG run";
pub const GET_TASK_INSTANCES: &str = "Get task instances for a specific DAG run";
pub const GET_TASK_INSTANCE: &str = "Get details of a single task instance in a DAG run";
pub const GET_TASK_LOGS: &str = "Get logs for a specific task instance";
pub const GET_VARIABLES: &str = "Get Airflow variables";
pub const GET_VARIABLE: &str = "Get a specific Airflow variable";
pub const GET_CONNECTIONS: &str = "Get Airflow connections";
pub const GET_CONNECTION: &str = "Get a specific Airflow connection";
pub const GET_HEALTH: &str = "Get Airflow health status";

pub const TRIGGER_DAG: &str = "Trigger a DAG run";
pub const PAUSE_DAG: &str = "Pause a DAG";
pub const UNPAUSE_DAG: &str = "Unpause a DAG";
pub const SET_VARIABLE: &str = "Set an Airflow variable";
pub const DELETE_VARIABLE: &str = "Delete an Airflow variable";

pub fn server_instructions(access_level: &str) -> String {
    format!(
        "Apache Airflow REST API bridge (access level: {access_level}). \
         Use list_dags/get_dag to discover workflows, get_dag_runs and get_task_instances \
         to inspect executions, get_task_logs to read task output, and get_health to check \
         the scheduler and metadatabase."
    )
}
