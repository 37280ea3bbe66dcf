//! Target application readiness probing
//!
//! The harness never spawns the application under test; it only refuses
//! to launch a browser against a dead URL.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Poll the target base URL until it answers or the wait expires.
///
/// Any HTTP response counts as up; the page itself is the scenario's
/// problem. Connection refused is expected while a dev server starts.
pub async fn wait_for_ready(base_url: &str, wait: Duration) -> HarnessResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = std::time::Instant::now();
    let mut attempts = 0;

    while start.elapsed() < wait {
        attempts += 1;

        match client.get(base_url).send().await {
            Ok(_) => return Ok(()),
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for target at {}...", base_url);
                }
                if !e.is_connect() && !e.is_timeout() {
                    warn!("Probe error: {}", e);
                }
            }
        }

        sleep(Duration::from_millis(100)).await;
    }

    Err(HarnessError::TargetUnreachable {
        url: base_url.to_string(),
        attempts,
    })
}
