//! # MCP Module
//!
//! Model Context Protocol server exposing the Airflow tools over stdio.

pub mod server;

pub use server::AirflowMcpServer;
