//! Command execution

use std::path::Path;
use std::time::Instant;

use venue_probe::{
    DriverConfig, FakeMapApp, LocatorTable, ProbeConfig, Reporter, Scenario, ScenarioRunner,
};

use crate::commands::{DriverArg, LocatorsArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};

/// Executes CLI commands against the probe library
#[derive(Debug)]
pub struct CommandRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl CommandRunner {
    /// Create a runner with console output per `config`
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// CLI configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Run the selected scenarios; fails when any scenario fails
    pub fn run(&mut self, args: &RunArgs) -> CliResult<()> {
        let settings = probe_config(args)?;
        let table = load_table(args.locators.as_deref())?;
        let scenarios = select_scenarios(&args.scenarios)?;

        let mut runner = ScenarioRunner::new(settings.clone(), table.clone());
        if args.fail_fast {
            runner = runner.with_fail_fast();
        }

        let target = match args.driver {
            DriverArg::Chromium => settings.base_url.as_str(),
            DriverArg::Fake => "in-memory sample map",
        };
        self.reporter.header(&format!("venue-probe: {target}"));
        if self.config.verbosity.is_verbose() {
            self.reporter.info(&format!(
                "city: {}, fallback: {}, budget: {}",
                display_city(&settings),
                settings.fallback_city,
                settings.click_budget
            ));
        }

        let start = Instant::now();
        self.reporter
            .start_spinner(&format!("running {} scenarios", scenarios.len()));
        let outcome = match args.driver {
            DriverArg::Fake => {
                Ok(runner.run(&scenarios, || Ok(FakeMapApp::sample(table.clone()))))
            }
            DriverArg::Chromium => run_chromium(&runner, &scenarios, &driver_config(args)),
        };
        self.reporter.finish();
        let report = outcome?;

        for entry in report.results() {
            self.reporter.entry(entry);
        }
        self.reporter.summary(
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
            start.elapsed(),
        );

        if OutputFormat::from(args.format) == OutputFormat::Json {
            println!("{}", report.render_json()?);
        }
        if let Some(ref path) = args.junit {
            report.generate_junit(path)?;
            self.reporter
                .info(&format!("JUnit report written to {}", path.display()));
        }

        if report.all_passed() {
            Ok(())
        } else {
            Err(CliError::ScenariosFailed {
                failed: report.failed_count(),
                total: report.total_count(),
            })
        }
    }

    /// Print every scenario with its description
    pub fn list(&self) {
        for scenario in Scenario::ALL {
            println!("{:<34} {}", scenario.name(), scenario.description());
        }
    }

    /// Print the effective locator table, or only validate it
    pub fn locators(&self, args: &LocatorsArgs) -> CliResult<()> {
        let table = load_table(args.file.as_deref())?;
        if args.check {
            self.reporter.success(&format!(
                "locator table v{} is valid ({} targets)",
                table.version,
                table.targets.len()
            ));
            return Ok(());
        }
        print!("{}", table.to_yaml()?);
        Ok(())
    }
}

/// Resolve scenario names; all scenarios when `names` is empty
pub fn select_scenarios(names: &[String]) -> CliResult<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| {
            Scenario::from_name(name).ok_or_else(|| {
                let known: Vec<&str> = Scenario::ALL.iter().map(Scenario::name).collect();
                CliError::invalid_argument(format!(
                    "unknown scenario '{name}' (known: {})",
                    known.join(", ")
                ))
            })
        })
        .collect()
}

/// Embedded table, or the one at `path`
pub fn load_table(path: Option<&Path>) -> CliResult<LocatorTable> {
    let table = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading locator table");
            LocatorTable::from_file(path)?
        }
        None => LocatorTable::embedded()?,
    };
    Ok(table)
}

/// Configuration file (if any) overridden by flags and environment
pub fn probe_config(args: &RunArgs) -> CliResult<ProbeConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let yaml = std::fs::read_to_string(path)?;
            serde_yaml_ng::from_str::<ProbeConfig>(&yaml)?
        }
        None => ProbeConfig::default(),
    };

    if let Some(ref url) = args.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(ref city) = args.city {
        config = config.with_city(city.clone());
    }
    if let Some(ref city) = args.fallback_city {
        config = config.with_fallback_city(city.clone());
    }
    if let Some(budget) = args.budget {
        config = config.with_click_budget(budget);
    }
    if let Some(ms) = args.settle_ms {
        config = config.with_settle_ms(ms);
    }
    if let Some(ms) = args.max_load_ms {
        config = config.with_max_load_ms(ms);
    }
    if let Some(ref dir) = args.artifacts_dir {
        config = config.with_artifacts_dir(dir.clone());
    }

    if config.fallback_city.trim().is_empty() {
        return Err(CliError::config("fallback city must not be blank"));
    }
    Ok(config)
}

/// Browser launch settings from flags
pub fn driver_config(args: &RunArgs) -> DriverConfig {
    let mut config = DriverConfig::new().headless(!args.headed);
    if args.no_sandbox {
        config = config.no_sandbox();
    }
    if let Some(ref path) = args.chrome {
        config = config.executable_path(path.clone());
    }
    config
}

fn display_city(config: &ProbeConfig) -> &str {
    match config.requested_city() {
        "" => "(unset)",
        city => city,
    }
}

#[cfg(feature = "browser")]
fn run_chromium(
    runner: &ScenarioRunner,
    scenarios: &[Scenario],
    driver: &DriverConfig,
) -> CliResult<Reporter> {
    Ok(runner.run(scenarios, || venue_probe::CdpDriver::launch(driver.clone())))
}

#[cfg(not(feature = "browser"))]
fn run_chromium(
    _runner: &ScenarioRunner,
    _scenarios: &[Scenario],
    _driver: &DriverConfig,
) -> CliResult<Reporter> {
    Err(CliError::config(
        "built without the `browser` feature; use --driver fake",
    ))
}
