//! MCP server for Apache Airflow
//!
//! Exposes the tool registry over the Model Context Protocol and forwards calls
//! to the dispatcher.

use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, stdin, stdout};

use crate::application::dispatch::Dispatcher;
use crate::application::tools::ToolSpec;
use crate::strings::{logs, messages, tools as desc};

/// Airflow MCP Server
///
/// Cheap to clone; all clones share one dispatcher and HTTP connection pool.
#[derive(Clone)]
pub struct AirflowMcpServer {
    name: String,
    dispatcher: Arc<Dispatcher>,
}

impl AirflowMcpServer {
    pub fn new(name: impl Into<String>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    /// Run the MCP server using stdio transport until the client disconnects.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        self.run((stdin(), stdout())).await
    }

    /// Serve on any byte stream pair.
    pub async fn run<R, W>(self, transport: (R, W)) -> anyhow::Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let server = self.serve(transport).await?;
        tracing::info!("{}", logs::SERVER_READY);
        server.waiting().await?;
        tracing::info!("{}", logs::SERVER_STOPPED);
        Ok(())
    }

    fn to_mcp_tool(spec: &ToolSpec) -> Tool {
        Tool::new(spec.name, spec.description, spec.schema.clone())
    }
}

impl ServerHandler for AirflowMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                title: Some("Apache Airflow MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(desc::server_instructions(
                self.dispatcher.access_level().as_str(),
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self
            .dispatcher
            .registry()
            .list()
            .into_iter()
            .map(Self::to_mcp_tool)
            .collect();

        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .dispatcher
            .call(request.name.as_ref(), request.arguments)
            .await;

        let content = match result {
            Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match content {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(error) => Ok(CallToolResult::error(vec![Content::text(
                messages::tool_error(&error),
            )])),
        }
    }
}
