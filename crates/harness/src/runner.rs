//! Scenario runner: sequences readiness probing, the browser session,
//! and report assembly

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info};

use crate::error::{HarnessError, HarnessResult};
use crate::playwright::{Browser, PlaywrightConfig, PlaywrightHandle};
use crate::report::{ScenarioReport, ScreenshotArtifact, SuiteReport};
use crate::scenario::Scenario;
use crate::target;

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base URL of the running application under test
    pub base_url: String,

    /// Directory for failure screenshots and reports
    pub artifacts_dir: PathBuf,

    pub browser: Browser,
    pub headless: bool,

    /// Upper bound on one whole browser session
    pub session_timeout: Duration,

    /// How long to wait for the target to answer its first probe
    pub target_wait: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            artifacts_dir: PathBuf::from("verification"),
            browser: Browser::Chromium,
            headless: true,
            session_timeout: Duration::from_secs(120),
            target_wait: Duration::from_secs(15),
        }
    }
}

/// Runs scenarios one at a time, each in a fresh browser context
pub struct ScenarioRunner {
    config: RunnerConfig,
}

impl ScenarioRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn playwright_config(&self) -> PlaywrightConfig {
        PlaywrightConfig {
            base_url: self.config.base_url.clone(),
            artifacts_dir: self.config.artifacts_dir.clone(),
            browser: self.config.browser,
            headless: self.config.headless,
            session_timeout: self.config.session_timeout,
        }
    }

    /// Run a single scenario.
    ///
    /// Verification failures come back as a failed [`ScenarioReport`];
    /// `Err` is reserved for harness-level problems (Playwright missing,
    /// target unreachable, unparseable script output).
    pub async fn run(&self, scenario: &Scenario) -> HarnessResult<ScenarioReport> {
        debug!("Running scenario: {}", scenario.name);

        PlaywrightHandle::ensure_installed()?;
        target::wait_for_ready(&self.config.base_url, self.config.target_wait).await?;

        let handle = PlaywrightHandle::new(self.playwright_config())?;

        let start = Instant::now();
        let outcome = handle.run(scenario).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if outcome.success {
            return Ok(ScenarioReport {
                name: scenario.name.clone(),
                passed: true,
                duration_ms,
                finished_at: Utc::now(),
                failed_step: None,
                error: None,
                screenshot: None,
            });
        }

        let step = outcome.step.unwrap_or_else(|| "setup".to_string());
        let reason = outcome.error.unwrap_or_else(|| "unknown error".to_string());
        let failure = classify_failure(&step, &reason);
        error!("{}: {}", scenario.name, failure);

        let screenshot = outcome
            .screenshot
            .as_deref()
            .and_then(|p| ScreenshotArtifact::capture(Path::new(p)));

        Ok(ScenarioReport {
            name: scenario.name.clone(),
            passed: false,
            duration_ms,
            finished_at: Utc::now(),
            failed_step: Some(step),
            error: Some(failure.to_string()),
            screenshot,
        })
    }

    /// Run scenarios in order and aggregate a suite report
    pub async fn run_all(&self, scenarios: &[Scenario]) -> HarnessResult<SuiteReport> {
        let start = Instant::now();
        let mut reports = Vec::with_capacity(scenarios.len());

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let report = self.run(scenario).await?;
            if report.passed {
                info!("✓ {} ({} ms)", report.name, report.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    report.name,
                    report.error.as_deref().unwrap_or("unknown error")
                );
            }
            reports.push(report);
        }

        let suite = SuiteReport::from_reports(reports, start.elapsed().as_millis() as u64);

        info!(
            "Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );

        Ok(suite)
    }
}

/// Sort a script failure into the harness error taxonomy: timeouts mean
/// the UI never reached the expected state, assertion failures mean the
/// page loaded without the expected content, anything else is the step's
/// own error.
fn classify_failure(step: &str, reason: &str) -> HarnessError {
    if reason.contains("Timeout") || reason.contains("timeout") {
        HarnessError::Timeout(format!("{step}: {reason}"))
    } else if reason.starts_with("expected ") {
        HarnessError::AssertionFailed(format!("{step}: {reason}"))
    } else if let Some(urls) = reason.strip_prefix("unmocked API requests: ") {
        HarnessError::UnmockedRequest(urls.to_string())
    } else {
        HarnessError::StepFailed {
            step: step.to_string(),
            reason: reason.to_string(),
        }
    }
}
