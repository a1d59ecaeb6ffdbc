//! # Health Check Command
//!
//! `--check`: query Airflow once and print the result instead of serving MCP.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::io::Write;

use crate::domain::traits::AirflowApi;

/// Fetch `/health` and write it to `out` as pretty JSON.
///
/// Fails if Airflow is unreachable or any reported component is not `healthy`.
pub async fn handle_check(api: &dyn AirflowApi, out: &mut impl Write) -> Result<()> {
    let health = match api.health().await {
        Ok(health) => health,
        Err(e) if is_auth_failure(e.status()) => {
            return Err(e).context("Airflow rejected the configured credentials");
        }
        Err(e) => return Err(e).context("Airflow health request failed"),
    };

    let rendered = serde_json::to_string_pretty(&health)?;
    writeln!(out, "{rendered}")?;

    let unhealthy = unhealthy_components(&health);
    if !unhealthy.is_empty() {
        anyhow::bail!("Airflow components not healthy: {}", unhealthy.join(", "));
    }
    Ok(())
}

fn is_auth_failure(status: Option<StatusCode>) -> bool {
    matches!(
        status,
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
    )
}

/// Components whose `status` field is present and not `healthy`.
fn unhealthy_components(health: &Value) -> Vec<String> {
    let Some(components) = health.as_object() else {
        return Vec::new();
    };

    components
        .iter()
        .filter_map(|(name, component)| {
            let status = component.get("status")?.as_str()?;
            (status != "healthy").then(|| format!("{name}={status}"))
        })
        .collect()
}
