//! Error types for the verification harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Target not reachable at {url} after {attempts} probes")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Invalid base URL: {0}")]
    BadBaseUrl(String),

    #[error("Scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("Invalid mock pattern '{pattern}': {reason}")]
    BadPattern { pattern: String, reason: String },

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Unmocked API requests: {0}")]
    UnmockedRequest(String),

    #[error("Browser script failed:\nstdout: {stdout}\nstderr: {stderr}")]
    Script { stdout: String, stderr: String },

    #[error("Browser session exceeded {0} seconds")]
    SessionTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
