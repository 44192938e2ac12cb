//! venue-probe: command-line runner for map/venue-search UI checks
//!
//! ## Usage
//!
//! ```bash
//! venue-probe run                                  # All scenarios in headless Chromium
//! venue-probe run -s over_filtering_shows_empty_state --city Dubai
//! venue-probe run --driver fake --format json      # In-memory sample map
//! venue-probe list                                 # Scenario names
//! venue-probe locators --check                     # Validate the locator table
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use venue_probe_cli::{Cli, CliConfig, CliResult, ColorChoice, CommandRunner, Commands, Verbosity};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    let mut runner = CommandRunner::new(config);
    match cli.command {
        Commands::Run(args) => runner.run(&args),
        Commands::List => {
            runner.list();
            Ok(())
        }
        Commands::Locators(args) => runner.locators(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins over the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
