//! modup - Interactive Go module upgrader CLI tool
//!
//! Lists the modules of a Go project, finds newer versions, lets the
//! operator pick which to take and runs `go get` for each of them.

use clap::Parser;
use modup::cli::CliArgs;
use modup::orchestrator::{Orchestrator, RunConfig};
use modup::output::Reporter;
use modup::select::spawn_stdin_reader;
use modup::source::{CandidateSource, DryRun, GoToolchain, Upgrader};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = RunConfig::from_cli(&args)?;

    if args.verbose {
        eprintln!("modup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", config.working_dir.display());
        if config.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let toolchain = Arc::new(
        GoToolchain::new(config.working_dir.clone()).with_indirect(config.include_indirect),
    );
    let source: Arc<dyn CandidateSource> = toolchain.clone();
    let upgrader: Arc<dyn Upgrader> = if config.dry_run {
        Arc::new(DryRun)
    } else {
        toolchain
    };

    // With --force nothing is read; the closed channel is ignored until review
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    if config.select.force {
        drop(input_tx);
    } else {
        spawn_stdin_reader(input_tx);
    }

    let mut reporter = Reporter::new(config.output.clone());
    let orchestrator = Orchestrator::new(source, upgrader, config);
    let summary = orchestrator.run(input_rx, &mut reporter).await;

    reporter.summary(&summary)?;
    Ok(ExitCode::from(summary.exit_code()))
}
