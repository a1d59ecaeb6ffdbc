//! # Messages
//!
//! Text returned to MCP clients inside tool results.

pub const READ_ONLY_DENIED: &str = "Operation not permitted in read-only mode";

pub fn unknown_tool(name: &str) -> String {
    format!("Unknown tool: {name}")
}

pub fn invalid_arguments(tool: &str, reason: &str) -> String {
    format!("Invalid arguments for {tool}: {reason}")
}

pub fn empty_argument(field: &str) -> String {
    format!("'{field}' must not be empty")
}

pub fn dot_argument(field: &str) -> String {
    format!("'{field}' must not be '.' or '..'")
}

pub fn tool_error(err: &str) -> String {
    format!("Error: {err}")
}
