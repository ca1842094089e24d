//! Diaglint CLI - BPMN/DMN lint automation runner
//!
//! Globs diagram files, runs the configured rule engine over each one, and
//! writes a JSON, HTML, or JUnit report for CI/CD pipelines.

use clap::Parser;
use owo_colors::OwoColorize;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing/logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    if let Err(err) = cli::run(cli).await {
        eprintln!("{} {err:#}", "ERROR:".bright_red().bold());
        std::process::exit(1);
    }
}
