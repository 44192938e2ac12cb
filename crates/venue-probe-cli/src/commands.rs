//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// venue-probe: resilient UI checks for the venue map
#[derive(Parser, Debug)]
#[command(name = "venue-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the map page
    Run(RunArgs),

    /// List available scenarios
    List,

    /// Print or validate the locator table
    Locators(LocatorsArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Scenario to run (repeatable); all scenarios when omitted
    #[arg(short, long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,

    /// Probe configuration file (YAML); flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Map page URL
    #[arg(long, env = "VENUE_PROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// City to select before filtering
    #[arg(long, env = "VENUE_PROBE_CITY")]
    pub city: Option<String>,

    /// City used when the requested one is not offered
    #[arg(long, env = "VENUE_PROBE_FALLBACK_CITY")]
    pub fallback_city: Option<String>,

    /// Exploratory filter clicks allowed per run
    #[arg(long, env = "VENUE_PROBE_CLICK_BUDGET")]
    pub budget: Option<u32>,

    /// Delay after every click in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Maximum acceptable load latency in milliseconds
    #[arg(long)]
    pub max_load_ms: Option<u64>,

    /// Locator table file replacing the embedded one
    #[arg(long, env = "VENUE_PROBE_LOCATORS", value_name = "FILE")]
    pub locators: Option<PathBuf>,

    /// Directory for failure screenshots
    #[arg(long, env = "VENUE_PROBE_ARTIFACTS_DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Write a JUnit XML report here
    #[arg(long, value_name = "FILE")]
    pub junit: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,

    /// Stop at the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Driver backing the run
    #[arg(long, default_value = "chromium", env = "VENUE_PROBE_DRIVER")]
    pub driver: DriverArg,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Chromium executable
    #[arg(long, env = "CHROME_PATH", value_name = "PATH")]
    pub chrome: Option<String>,
}

/// Arguments for the locators command
#[derive(Parser, Debug)]
pub struct LocatorsArgs {
    /// Locator table file; the embedded table when omitted
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Only validate, do not print
    #[arg(long)]
    pub check: bool,
}

/// Driver backing a run
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Headless Chromium over CDP
    #[default]
    Chromium,
    /// In-memory sample map (no browser)
    Fake,
}

/// Report format on stdout
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color choice argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
