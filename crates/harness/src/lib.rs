//! Ballotproof UI verification harness
//!
//! Drives a headless browser against a running Ballotproof deployment,
//! serving canned API responses in place of the real backend and
//! asserting that the UI renders the expected content. Scenarios are
//! declarative YAML; runs are fail-fast with diagnostic screenshots.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Scenario Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── wait_for_ready(base_url)                             │
//! │    ├── run(scenario) -> ScenarioReport                      │
//! │    └── run_all(scenarios) -> SuiteReport                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (YAML)                                            │
//! │    ├── auth: { role, token }  -> cookie before first load   │
//! │    ├── mocks: [{ pattern, status, body }]  first-match-wins │
//! │    └── steps: [ navigate | wait | assert | click | fill     │
//! │               | screenshot | sleep | log ]                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightHandle                                           │
//! │    └── one generated Node script per scenario; the final    │
//! │        stdout line is the JSON outcome                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod error;
pub mod mock;
pub mod playwright;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod target;

pub use error::{HarnessError, HarnessResult};
pub use report::{ScenarioReport, SuiteReport};
pub use runner::{RunnerConfig, ScenarioRunner};
pub use scenario::{Scenario, ScenarioStep};
