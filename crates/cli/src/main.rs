//! Ballotproof verification CLI - Main Entry Point
//!
//! Runs UI verification scenarios against a live Ballotproof deployment
//! with the backend APIs mocked. Exit code 0 means every scenario
//! passed, 1 means a verification failure, 2 means the harness itself
//! could not run.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

mod output;

use ballotproof_harness::playwright::Browser;
use ballotproof_harness::{HarnessResult, RunnerConfig, Scenario, ScenarioRunner};

const ADMIN_DASHBOARD: &str = include_str!("../../../scenarios/admin_dashboard.yaml");
const VOTE_FLOW: &str = include_str!("../../../scenarios/vote_flow.yaml");

/// Ballotproof UI verification harness
#[derive(Parser)]
#[command(name = "ballotproof")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the running application
    #[arg(long, default_value = "http://localhost:3000", global = true)]
    base_url: String,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium", global = true)]
    browser: String,

    /// Run with a visible browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Directory for failure screenshots and reports
    #[arg(long, default_value = "verification", global = true)]
    artifacts_dir: PathBuf,

    /// Kill a browser session after this many seconds
    #[arg(long, default_value = "120", global = true)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the admin dashboard renders mocked stats and elections
    AdminDashboard,

    /// Verify the voter ballot-casting journey end to end
    VoteFlow,

    /// Run scenario files
    Run {
        #[arg(required = true)]
        specs: Vec<PathBuf>,
    },

    /// Run every scenario in a directory
    All {
        #[arg(long, default_value = "scenarios")]
        dir: PathBuf,

        /// Run only scenarios carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

async fn run(cli: Cli) -> HarnessResult<bool> {
    let scenarios = load_scenarios(&cli.command)?;

    let config = RunnerConfig {
        base_url: cli.base_url,
        artifacts_dir: cli.artifacts_dir.clone(),
        browser: parse_browser(&cli.browser),
        headless: !cli.headed,
        session_timeout: Duration::from_secs(cli.timeout_secs),
        ..Default::default()
    };

    let runner = ScenarioRunner::new(config);
    let suite = runner.run_all(&scenarios).await?;

    suite.write(&cli.artifacts_dir)?;
    output::print_suite(&suite);

    Ok(suite.failed == 0)
}

fn load_scenarios(command: &Commands) -> HarnessResult<Vec<Scenario>> {
    match command {
        Commands::AdminDashboard => Ok(vec![Scenario::from_yaml(ADMIN_DASHBOARD)?]),
        Commands::VoteFlow => Ok(vec![Scenario::from_yaml(VOTE_FLOW)?]),
        Commands::Run { specs } => specs.iter().map(|p| Scenario::from_file(p)).collect(),
        Commands::All { dir, tag } => {
            let mut scenarios = Scenario::load_all(dir)?;
            if let Some(tag) = tag {
                scenarios.retain(|s| s.tags.contains(tag));
            }
            Ok(scenarios)
        }
    }
}

fn parse_browser(name: &str) -> Browser {
    match name {
        "firefox" => Browser::Firefox,
        "webkit" => Browser::Webkit,
        _ => Browser::Chromium,
    }
}
