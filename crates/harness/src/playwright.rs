//! Playwright browser automation
//!
//! Drives Playwright through a generated Node.js script executed with
//! `tokio::process::Command`. One script is generated per scenario: the
//! auth cookie and mock routes are registered up front, then every step
//! runs in order inside a single page session, so page state (selected
//! candidate, verification progress) carries across steps. The script
//! prints a JSON result as its final stdout line, which is parsed on the
//! Rust side.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::auth::cookie_domain;
use crate::error::{HarnessError, HarnessResult};
use crate::mock::MockRegistry;
use crate::scenario::{Scenario, ScenarioStep, WaitState};

/// Playwright browser handle
pub struct PlaywrightHandle {
    base_url: String,
    artifacts_dir: PathBuf,
    browser: Browser,
    headless: bool,
    session_timeout: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Final JSON line printed by the generated script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptOutcome {
    pub success: bool,

    /// Label of the step that was executing when the run failed
    #[serde(default)]
    pub step: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    /// Diagnostic screenshot written by the in-page failure handler
    #[serde(default)]
    pub screenshot: Option<String>,

    /// API request URLs no mock claimed
    #[serde(default)]
    pub unmocked: Vec<String>,
}

/// Configuration for a Playwright session
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub artifacts_dir: PathBuf,
    pub browser: Browser,
    pub headless: bool,
    pub session_timeout: Duration,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            artifacts_dir: PathBuf::from("verification"),
            browser: Browser::Chromium,
            headless: true,
            session_timeout: Duration::from_secs(120),
        }
    }
}

/// Encode a Rust string as a JS string literal (JSON escapes are valid JS)
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

impl PlaywrightHandle {
    pub fn new(config: PlaywrightConfig) -> HarnessResult<Self> {
        std::fs::create_dir_all(&config.artifacts_dir)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            artifacts_dir: config.artifacts_dir,
            browser: config.browser,
            headless: config.headless,
            session_timeout: config.session_timeout,
        })
    }

    /// Check that Playwright is installed and reachable via npx
    pub fn ensure_installed() -> HarnessResult<()> {
        let status = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(HarnessError::PlaywrightNotFound),
        }
    }

    /// Build the Node.js script for a whole scenario
    pub fn build_script(&self, scenario: &Scenario) -> HarnessResult<String> {
        let registry = MockRegistry::new(&scenario.mocks)?;
        let domain = cookie_domain(&self.base_url)?;

        debug!(
            "Generating script for '{}' with {} mock route(s)",
            scenario.name,
            registry.len()
        );

        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = scenario.viewport.width,
            height = scenario.viewport.height,
        ));

        // Cookie goes in before any page exists, so the very first request
        // already carries the identity.
        if let Some(auth) = &scenario.auth {
            script.push_str(&format!(
                "  await context.addCookies([{}]);\n",
                auth.cookie_json(&domain)
            ));
        }

        script.push_str(
            r#"  const page = await context.newPage();
  const unmocked = [];
"#,
        );

        // Playwright hands a request to the most recently registered route
        // first, so this guard only sees API calls no mock claimed, and the
        // registry is emitted in reverse to keep first-match-wins semantics.
        script.push_str(
            r#"  await page.route('**/api/**', route => {
    unmocked.push(route.request().url());
    route.abort('failed');
  });
"#,
        );

        for mock in registry.routes().rev() {
            script.push_str(&format!(
                r#"  await page.route({pattern}, route => route.fulfill({{
    status: {status},
    contentType: {content_type},
    body: JSON.stringify({body})
  }}));
"#,
                pattern = js_str(&mock.pattern),
                status = mock.status,
                content_type = js_str(&mock.content_type),
                body = mock.body,
            ));
        }

        script.push_str("\n  let step = \"setup\";\n  try {\n");

        for (i, step) in scenario.steps.iter().enumerate() {
            script.push_str(&format!("\n    // step {}: {}\n", i + 1, step.label()));
            script.push_str(&format!("    step = {};\n", js_str(&step.label())));
            script.push_str(&self.step_to_js(step));
        }

        let fail_shot = self
            .artifacts_dir
            .join(format!("{}.png", scenario.failure_screenshot_name()));

        script.push_str(&format!(
            r#"
    step = "unmocked-check";
    if (unmocked.length > 0) {{
      throw new Error("unmocked API requests: " + unmocked.join(", "));
    }}
    console.log(JSON.stringify({{ success: true, unmocked }}));
  }} catch (error) {{
    const shot = {shot};
    try {{ await page.screenshot({{ path: shot, fullPage: true }}); }} catch (e) {{}}
    console.log(JSON.stringify({{ success: false, step, error: error.message, screenshot: shot, unmocked }}));
    process.exitCode = 1;
  }} finally {{
    await browser.close();
  }}
}})();
"#,
            shot = js_str(&fail_shot.to_string_lossy()),
        ));

        Ok(script)
    }

    fn step_to_js(&self, step: &ScenarioStep) -> String {
        match step {
            ScenarioStep::Navigate { url, wait_for_selector } => {
                let full_url = format!("{}{}", self.base_url, url);
                let mut code = format!("    await page.goto({});\n", js_str(&full_url));
                if let Some(selector) = wait_for_selector {
                    code.push_str(&format!(
                        "    await page.waitForSelector({});\n",
                        js_str(selector)
                    ));
                }
                code
            }
            ScenarioStep::Wait { selector, timeout_ms, state } => {
                let state = match state {
                    WaitState::Visible => "visible",
                    WaitState::Hidden => "hidden",
                };
                format!(
                    "    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});\n",
                    js_str(selector),
                    state,
                    timeout_ms
                )
            }
            ScenarioStep::Assert { selector, visible, text_contains, count } => {
                let mut code = String::new();

                // An assert with no fields set is a visibility check.
                let check_visible =
                    visible.unwrap_or(text_contains.is_none() && count.is_none());

                if visible.is_some() || (text_contains.is_none() && count.is_none()) {
                    if check_visible {
                        code.push_str(&format!(
                            "    if (!(await page.isVisible({sel}))) {{ throw new Error({msg}); }}\n",
                            sel = js_str(selector),
                            msg = js_str(&format!("expected visible: {selector}")),
                        ));
                    } else {
                        code.push_str(&format!(
                            "    if (await page.isVisible({sel})) {{ throw new Error({msg}); }}\n",
                            sel = js_str(selector),
                            msg = js_str(&format!("expected hidden: {selector}")),
                        ));
                    }
                }

                if let Some(expected) = text_contains {
                    code.push_str(&format!(
                        "    {{ const t = await page.textContent({sel}); if (!t || !t.includes({exp})) {{ throw new Error({msg}); }} }}\n",
                        sel = js_str(selector),
                        exp = js_str(expected),
                        msg = js_str(&format!("expected text '{expected}' in: {selector}")),
                    ));
                }

                if let Some(expected) = count {
                    code.push_str(&format!(
                        "    {{ const n = await page.locator({sel}).count(); if (n !== {expected}) {{ throw new Error({msg} + n); }} }}\n",
                        sel = js_str(selector),
                        expected = expected,
                        msg = js_str(&format!("expected {expected} matches for {selector}, got ")),
                    ));
                }

                code
            }
            ScenarioStep::Click { selector, timeout_ms } => {
                format!(
                    "    await page.click({}, {{ timeout: {} }});\n",
                    js_str(selector),
                    timeout_ms.unwrap_or(10_000)
                )
            }
            ScenarioStep::Fill { selector, value } => {
                format!(
                    "    await page.fill({}, {});\n",
                    js_str(selector),
                    js_str(value)
                )
            }
            ScenarioStep::Screenshot { name, full_page } => {
                let path = self.artifacts_dir.join(format!("{name}.png"));
                format!(
                    "    await page.screenshot({{ path: {}, fullPage: {} }});\n",
                    js_str(&path.to_string_lossy()),
                    full_page
                )
            }
            ScenarioStep::Sleep { ms } => {
                format!("    await page.waitForTimeout({ms});\n")
            }
            ScenarioStep::Log { message } => {
                format!("    console.log({});\n", js_str(message))
            }
        }
    }

    /// Stage the generated script and run it with node
    pub async fn run(&self, scenario: &Scenario) -> HarnessResult<ScriptOutcome> {
        let script = self.build_script(scenario)?;

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, &script)?;

        debug!("Staged browser script at {}", script_path.display());

        // NODE_PATH so require('playwright') resolves from the harness's
        // working directory rather than the temp dir.
        let node_modules = std::env::current_dir()?.join("node_modules");

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .env("NODE_PATH", &node_modules)
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.session_timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(HarnessError::SessionTimeout(self.session_timeout.as_secs()))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match parse_outcome(&stdout) {
            Some(outcome) => Ok(outcome),
            None => Err(HarnessError::Script {
                stdout: stdout.into_owned(),
                stderr: stderr.into_owned(),
            }),
        }
    }
}

/// The script's result is the last non-empty stdout line
fn parse_outcome(stdout: &str) -> Option<ScriptOutcome> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| serde_json::from_str(line).ok())
}
