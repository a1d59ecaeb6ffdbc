//! # Domain Errors
//!
//! Failures surfaced by the Airflow API seam.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AirflowError {
    /// Airflow answered with a non-2xx status.
    #[error("Airflow returned {status} for {url}: {detail}")]
    Status {
        status: StatusCode,
        url: String,
        detail: String,
    },
    /// The request never produced a response (connect, TLS, timeout).
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("invalid request URL: {0}")]
    Url(String),
}

impl AirflowError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AirflowError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
