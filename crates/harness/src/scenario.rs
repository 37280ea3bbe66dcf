//! Declarative YAML scenario definitions

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::auth::AuthConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::mock::MockRoute;

/// A complete verification scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewport size for the browser
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Identity injected as a cookie before the first navigation
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Canned API responses, evaluated first-match-wins
    #[serde(default)]
    pub mocks: Vec<MockRoute>,

    /// Steps to execute in order
    pub steps: Vec<ScenarioStep>,

    /// Stem of the diagnostic screenshot written when a step fails
    /// (defaults to `<name>-fail`)
    #[serde(default)]
    pub failure_screenshot: Option<String>,
}

fn default_viewport() -> Viewport {
    Viewport { width: 1280, height: 720 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A single step in a scenario
///
/// Selectors are passed through to the browser verbatim, so Playwright
/// syntax such as `text=...` and `>> nth=0` works. An `assert` step with
/// no fields set checks visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Navigate to a URL (relative to the target base URL)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Assert something about an element
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default)]
        count: Option<usize>,
    },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
    },

    /// Take a screenshot
    Screenshot {
        name: String,
        #[serde(default)]
        full_page: bool,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep {
        ms: u64,
    },

    /// Emit a progress message
    Log {
        message: String,
    },
}

fn default_wait_timeout() -> u64 {
    10_000 // slow-loading dashboards need the full 10 seconds
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
}

impl ScenarioStep {
    /// Short label used in logs and failure reports
    pub fn label(&self) -> String {
        match self {
            ScenarioStep::Navigate { url, .. } => format!("navigate:{}", url),
            ScenarioStep::Wait { selector, .. } => format!("wait:{}", selector),
            ScenarioStep::Assert { selector, .. } => format!("assert:{}", selector),
            ScenarioStep::Click { selector, .. } => format!("click:{}", selector),
            ScenarioStep::Fill { selector, .. } => format!("fill:{}", selector),
            ScenarioStep::Screenshot { name, .. } => format!("screenshot:{}", name),
            ScenarioStep::Sleep { ms } => format!("sleep:{}ms", ms),
            ScenarioStep::Log { message } => {
                let cut = message
                    .char_indices()
                    .nth(30)
                    .map(|(i, _)| i)
                    .unwrap_or(message.len());
                format!("log:{}", &message[..cut])
            }
        }
    }
}

impl Scenario {
    /// Parse a scenario from a YAML string
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            HarnessError::ScenarioParse(format!("{}: {}", path.display(), e))
        })
    }

    /// Load all scenarios from a directory, in file-name order
    pub fn load_all(dir: &Path) -> HarnessResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let scenario = Self::from_file(entry.path())?;
            scenarios.push(scenario);
        }

        Ok(scenarios)
    }

    /// Stem of the screenshot written when this scenario fails
    pub fn failure_screenshot_name(&self) -> String {
        self.failure_screenshot
            .clone()
            .unwrap_or_else(|| format!("{}-fail", self.name))
    }
}
