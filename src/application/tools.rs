//! # Tool Registry
//!
//! The fixed catalogue of tools, their parameter schemas, and which of them the
//! configured access level exposes.

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::types::{AccessLevel, Page, ToolAccess, default_limit};
use crate::strings::tools as desc;

// ============================================================================
// Tool Parameter Types
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmptyParams {}

/// Parameters shared by list tools
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PageParams {
    /// Number of items to return
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items to skip
    #[serde(default)]
    pub offset: u32,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DagParams {
    /// The DAG ID
    pub dag_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DagRunsParams {
    /// The DAG ID
    pub dag_id: String,
    /// Number of DAG runs to return
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of DAG runs to skip
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DagRunParams {
    /// The DAG ID
    pub dag_id: String,
    /// The DAG run ID
    pub dag_run_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TaskInstancesParams {
    /// The DAG ID
    pub dag_id: String,
    /// The DAG run ID
    pub dag_run_id: String,
    /// Number of task instances to return
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of task instances to skip
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TaskInstanceParams {
    /// The DAG ID
    pub dag_id: String,
    /// The DAG run ID
    pub dag_run_id: String,
    /// The task ID
    pub task_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TaskLogsParams {
    /// The DAG ID
    pub dag_id: String,
    /// The DAG run ID
    pub dag_run_id: String,
    /// The task ID
    pub task_id: String,
    /// The task try number
    #[serde(default = "default_try_number")]
    pub task_try_number: u32,
}

fn default_try_number() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VariableKeyParams {
    /// The variable key
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionParams {
    /// The connection ID
    pub connection_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TriggerDagParams {
    /// The DAG ID
    pub dag_id: String,
    /// Configuration for the DAG run
    #[serde(default)]
    pub conf: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetVariableParams {
    /// The variable key
    pub key: String,
    /// The variable value
    pub value: String,
    /// Variable description
    #[serde(default)]
    pub description: String,
}

// ============================================================================
// Catalogue
// ============================================================================

/// Every tool this server knows about, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ListDags,
    GetDag,
    GetDagRuns,
    GetDagRun,
    GetTaskInstances,
    GetTaskInstance,
    GetTaskLogs,
    GetVariables,
    GetVariable,
    GetConnections,
    GetConnection,
    GetHealth,
    TriggerDag,
    PauseDag,
    UnpauseDag,
    SetVariable,
    DeleteVariable,
}

impl ToolKind {
    pub const ALL: [ToolKind; 17] = [
        ToolKind::ListDags,
        ToolKind::GetDag,
        ToolKind::GetDagRuns,
        ToolKind::GetDagRun,
        ToolKind::GetTaskInstances,
        ToolKind::GetTaskInstance,
        ToolKind::GetTaskLogs,
        ToolKind::GetVariables,
        ToolKind::GetVariable,
        ToolKind::GetConnections,
        ToolKind::GetConnection,
        ToolKind::GetHealth,
        ToolKind::TriggerDag,
        ToolKind::PauseDag,
        ToolKind::UnpauseDag,
        ToolKind::SetVariable,
        ToolKind::DeleteVariable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ListDags => "list_dags",
            ToolKind::GetDag => "get_dag",
            ToolKind::GetDagRuns => "get_dag_runs",
            ToolKind::GetDagRun => "get_dag_run",
            ToolKind::GetTaskInstances => "get_task_instances",
            ToolKind::GetTaskInstance => "get_task_instance",
            ToolKind::GetTaskLogs => "get_task_logs",
            ToolKind::GetVariables => "get_variables",
            ToolKind::GetVariable => "get_variable",
            ToolKind::GetConnections => "get_connections",
            ToolKind::GetConnection => "get_connection",
            ToolKind::GetHealth => "get_health",
            ToolKind::TriggerDag => "trigger_dag",
            ToolKind::PauseDag => "pause_dag",
            ToolKind::UnpauseDag => "unpause_dag",
            ToolKind::SetVariable => "set_variable",
            ToolKind::DeleteVariable => "delete_variable",
        }
    }

    pub fn access(&self) -> ToolAccess {
        match self {
            ToolKind::TriggerDag
            | ToolKind::PauseDag
            | ToolKind::UnpauseDag
            | ToolKind::SetVariable
            | ToolKind::DeleteVariable => ToolAccess::Write,
            _ => ToolAccess::Read,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::ListDags => desc::LIST_DAGS,
            ToolKind::GetDag => desc::GET_DAG,
            ToolKind::GetDagRuns => desc::GET_DAG_RUNS,
            ToolKind::GetDagRun => desc::GET_DAG_RUN,
            ToolKind::GetTaskInstances => desc::GET_TASK_INSTANCES,
            ToolKind::GetTaskInstance => desc::GET_TASK_INSTANCE,
            ToolKind::GetTaskLogs => desc::GET_TASK_LOGS,
            ToolKind::GetVariables => desc::GET_VARIABLES,
            ToolKind::GetVariable => desc::GET_VARIABLE,
            ToolKind::GetConnections => desc::GET_CONNECTIONS,
            ToolKind::GetConnection => desc::GET_CONNECTION,
            ToolKind::GetHealth => desc::GET_HEALTH,
            ToolKind::TriggerDag => desc::TRIGGER_DAG,
            ToolKind::PauseDag => desc::PAUSE_DAG,
            ToolKind::UnpauseDag => desc::UNPAUSE_DAG,
            ToolKind::SetVariable => desc::SET_VARIABLE,
            ToolKind::DeleteVariable => desc::DELETE_VARIABLE,
        }
    }

    /// JSON schema of the tool's parameters.
    pub fn schema(&self) -> Arc<JsonObject> {
        match self {
            ToolKind::ListDags | ToolKind::GetVariables | ToolKind::GetConnections => {
                cached_schema_for_type::<PageParams>()
            }
            ToolKind::GetDag | ToolKind::PauseDag | ToolKind::UnpauseDag => {
                cached_schema_for_type::<DagParams>()
            }
            ToolKind::GetDagRuns => cached_schema_for_type::<DagRunsParams>(),
            ToolKind::GetDagRun => cached_schema_for_type::<DagRunParams>(),
            ToolKind::GetTaskInstances => cached_schema_for_type::<TaskInstancesParams>(),
            ToolKind::GetTaskInstance => cached_schema_for_type::<TaskInstanceParams>(),
            ToolKind::GetTaskLogs => cached_schema_for_type::<TaskLogsParams>(),
            ToolKind::GetVariable | ToolKind::DeleteVariable => {
                cached_schema_for_type::<VariableKeyParams>()
            }
            ToolKind::GetConnection => cached_schema_for_type::<ConnectionParams>(),
            ToolKind::GetHealth => cached_schema_for_type::<EmptyParams>(),
            ToolKind::TriggerDag => cached_schema_for_type::<TriggerDagParams>(),
            ToolKind::SetVariable => cached_schema_for_type::<SetVariableParams>(),
        }
    }
}

/// A tool as advertised to clients.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub kind: ToolKind,
    pub name: &'static str,
    pub description: &'static str,
    pub access: ToolAccess,
    pub schema: Arc<JsonObject>,
}

impl ToolSpec {
    fn from_kind(kind: ToolKind) -> Self {
        Self {
            kind,
            name: kind.name(),
            description: kind.description(),
            access: kind.access(),
            schema: kind.schema(),
        }
    }
}

/// Catalogue filtered through the configured access level.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    access_level: AccessLevel,
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new(access_level: AccessLevel) -> Self {
        Self {
            access_level,
            tools: ToolKind::ALL.into_iter().map(ToolSpec::from_kind).collect(),
        }
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Tools enabled at the current access level, reads first.
    pub fn list(&self) -> Vec<&ToolSpec> {
        self.tools
            .iter()
            .filter(|tool| self.access_level.permits(tool.access))
            .collect()
    }

    /// Look up any known tool, enabled or not.
    pub fn lookup(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn is_enabled(&self, tool: &ToolSpec) -> bool {
        self.access_level.permits(tool.access)
    }
}
