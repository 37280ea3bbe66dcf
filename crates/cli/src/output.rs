//! Pass/fail output formatting

use ballotproof_harness::{ScenarioReport, SuiteReport};
use colored::Colorize;

pub fn print_suite(suite: &SuiteReport) {
    println!();
    for report in &suite.reports {
        print_report(report);
    }

    let summary = format!(
        "{} passed, {} failed ({} ms)",
        suite.passed, suite.failed, suite.duration_ms
    );
    println!();
    if suite.failed == 0 {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn print_report(report: &ScenarioReport) {
    if report.passed {
        println!("{} {} ({} ms)", "✓".green(), report.name, report.duration_ms);
    } else {
        println!("{} {} ({} ms)", "✗".red(), report.name, report.duration_ms);
        if let Some(error) = &report.error {
            println!("    {error}");
        }
        if let Some(shot) = &report.screenshot {
            println!("    screenshot: {}", shot.path.display());
        }
    }
}
