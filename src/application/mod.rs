//! # Application Layer
//!
//! Orchestrates tool calls: the registry decides what is exposed, the dispatcher
//! turns calls into Airflow API requests, and logging wires up `tracing`.

pub mod dispatch;
pub mod logging;
pub mod tools;
