//! Scenario harness.
//!
//! Runs scenarios one after another, each on a fresh driver from a factory,
//! records results, and captures a screenshot when a scenario fails.

use std::time::Instant;

use crate::artifacts::ArtifactStore;
use crate::config::ProbeConfig;
use crate::driver::UiDriver;
use crate::locator::LocatorTable;
use crate::page_object::MapPage;
use crate::reporter::{FailureMode, Reporter, TestResultEntry};
use crate::result::ProbeResult;
use crate::scenario::Scenario;

/// Sequential scenario runner
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: ProbeConfig,
    table: LocatorTable,
    failure_mode: FailureMode,
    artifacts: Option<ArtifactStore>,
}

impl ScenarioRunner {
    /// Create a runner; screenshots go to `config.artifacts_dir`
    #[must_use]
    pub fn new(config: ProbeConfig, table: LocatorTable) -> Self {
        let artifacts = Some(ArtifactStore::new(config.artifacts_dir.clone()));
        Self {
            config,
            table,
            failure_mode: FailureMode::default(),
            artifacts,
        }
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.failure_mode = FailureMode::FailFast;
        self
    }

    /// Disable failure screenshots
    #[must_use]
    pub fn without_artifacts(mut self) -> Self {
        self.artifacts = None;
        self
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run `scenarios` in order. `factory` is called once per scenario and
    /// the driver is dropped when the scenario ends.
    pub fn run<D, F>(&self, scenarios: &[Scenario], mut factory: F) -> Reporter
    where
        D: UiDriver,
        F: FnMut() -> ProbeResult<D>,
    {
        let mut reporter = Reporter::new().with_failure_mode(self.failure_mode);

        for (i, scenario) in scenarios.iter().enumerate() {
            let entry = self.run_one(*scenario, &mut factory);
            if reporter.record(entry).is_err() {
                tracing::warn!(scenario = scenario.name(), "fail-fast: skipping remaining scenarios");
                for rest in scenarios.iter().skip(i + 1) {
                    let _ = reporter.record(TestResultEntry::skipped(rest.name()));
                }
                break;
            }
        }
        tracing::info!(summary = %reporter.summary(), "run finished");
        reporter
    }

    fn run_one<D, F>(&self, scenario: Scenario, factory: &mut F) -> TestResultEntry
    where
        D: UiDriver,
        F: FnMut() -> ProbeResult<D>,
    {
        let start = Instant::now();
        let driver = match factory() {
            Ok(driver) => driver,
            Err(e) => {
                tracing::error!(scenario = scenario.name(), error = %e, "driver startup failed");
                return TestResultEntry::failed(scenario.name(), start.elapsed(), e.to_string());
            }
        };

        let mut page = MapPage::new(driver, self.config.clone(), self.table.clone());
        match scenario.run(&mut page) {
            Ok(outcome) => {
                tracing::info!(scenario = scenario.name(), "passed");
                TestResultEntry::passed(scenario.name(), start.elapsed()).with_notes(outcome.notes)
            }
            Err(e) => {
                tracing::error!(scenario = scenario.name(), error = %e, "failed");
                let entry = TestResultEntry::failed(scenario.name(), start.elapsed(), e.to_string());
                match self.capture(scenario, page.driver()) {
                    Some(path) => entry.with_screenshot(path),
                    None => entry,
                }
            }
        }
    }

    /// Screenshot failures are logged and never mask the scenario failure
    fn capture<D: UiDriver>(&self, scenario: Scenario, driver: &D) -> Option<std::path::PathBuf> {
        let store = self.artifacts.as_ref()?;
        let saved = driver
            .screenshot()
            .and_then(|png| store.save_screenshot(scenario.name(), &png));
        match saved {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(scenario = scenario.name(), error = %e, "could not capture screenshot");
                None
            }
        }
    }
}
