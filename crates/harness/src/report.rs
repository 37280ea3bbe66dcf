//! Verification reports and failure artifacts

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::HarnessResult;

/// Outcome of one scenario run: pass, or the first failure with its
/// diagnostic screenshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,

    /// Label of the step that failed, if any
    #[serde(default)]
    pub failed_step: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub screenshot: Option<ScreenshotArtifact>,
}

/// A screenshot on disk plus its digest, so a report can be tied to the
/// exact artifact it was written with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotArtifact {
    pub path: PathBuf,
    pub sha256: String,
}

impl ScreenshotArtifact {
    /// Record a screenshot the browser already wrote. Returns None when
    /// the file is missing (the page died before the handler ran).
    pub fn capture(path: &Path) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        let mut hasher = Sha256::new();
        hasher.update(&data);

        Some(Self {
            path: path.to_path_buf(),
            sha256: hex::encode(hasher.finalize()),
        })
    }
}

/// Aggregate outcome when several scenarios run in one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn from_reports(reports: Vec<ScenarioReport>, duration_ms: u64) -> Self {
        let passed = reports.iter().filter(|r| r.passed).count();

        Self {
            total: reports.len(),
            passed,
            failed: reports.len() - passed,
            duration_ms,
            reports,
        }
    }

    /// Write the machine-readable report JSON into the artifacts directory
    pub fn write(&self, dir: &Path) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("report.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Report written to: {}", path.display());
        Ok(path)
    }
}
