// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probes for Cat Manager servers.
// Purpose: Ensure servers are ready without arbitrary sleeps.
// Dependencies: reqwest, tokio
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use tokio::time::sleep;

/// Polls the health route until the server answers OK or timeout expires.
pub async fn wait_for_server_ready(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<(), String> {
    let url = format!("{base_url}/healthz");
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        let outcome = match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => format!("status {}", response.status()),
            Err(err) => err.to_string(),
        };
        if start.elapsed() > timeout {
            return Err(format!("server readiness timeout after {attempts} attempts: {outcome}"));
        }
        sleep(Duration::from_millis(50)).await;
    }
}
