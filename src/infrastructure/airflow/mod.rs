//! # Airflow Module
//!
//! HTTP binding for the Airflow stable REST API (`/api/v1`).

pub mod client;

pub use client::AirflowClient;
