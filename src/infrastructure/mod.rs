//! # Infrastructure Layer
//!
//! Handles interactions with external systems: the Airflow REST API and the MCP transport.
//! Implements the traits defined in the Domain layer (e.g., AirflowApi).

pub mod airflow;
pub mod mcp;
