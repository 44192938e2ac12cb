//! Venue Probe: resilient UI checks for a map/venue-search web application
//!
//! The application under test is a single-page map with a filter panel,
//! venue cards, map markers and a "Show N venues" call-to-action. It renders
//! asynchronously and re-renders often, so every interaction here assumes
//! elements can vanish, refuse clicks or arrive late.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    VENUE PROBE Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ MapPage    │    │ UiDriver   │            │
//! │   │ Runner     │───►│ + search   │───►│ CDP / fake │            │
//! │   │ (reporter) │    │ (locators) │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use venue_probe::{FakeMapApp, LocatorTable, ProbeConfig, Scenario, ScenarioRunner};
//!
//! let table = LocatorTable::embedded().unwrap();
//! let runner = ScenarioRunner::new(ProbeConfig::instant(), table.clone()).without_artifacts();
//! let reporter = runner.run(&[Scenario::PageLoad], || Ok(FakeMapApp::sample(table.clone())));
//! assert!(reporter.all_passed());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod artifacts;
mod assertion;
#[cfg(feature = "browser")]
mod cdp;
mod click;
mod config;
mod driver;
mod fake;
mod harness;
mod locator;
mod page_object;
mod reporter;
mod result;
mod scenario;
mod search;
mod snapshot;

/// Bounded polling and settle delays
pub mod wait;

pub use artifacts::ArtifactStore;
pub use assertion::{Assertion, AssertionResult};
#[cfg(feature = "browser")]
pub use cdp::CdpDriver;
pub use click::{
    ClickMode, ClickStrategy, DirectClick, FallbackClicker, ScriptedClick, SCRIPTED_CLICK,
};
pub use config::{ProbeConfig, DEFAULT_BASE_URL, DEFAULT_FALLBACK_CITY};
pub use driver::{DriverConfig, ElementHandle, UiDriver};
pub use fake::{ClickRecord, FakeEffect, FakeMapApp, FakeNode};
pub use harness::ScenarioRunner;
pub use locator::{Locator, LocatorTable, Selector, Target, LOCATOR_TABLE_VERSION};
pub use page_object::{ClickOutcome, FilterOption, MapPage, PageObject, LOAD_SIGNAL};
pub use reporter::{FailureMode, Reporter, TestResultEntry, TestStatus};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{Scenario, ScenarioOutcome};
pub use search::{
    apply_filters_to_minimize_venues, resolve_city, CitySelection, ClickBudget, FilterSelection,
    MinimizeOutcome, MinimizeReport,
};
pub use snapshot::{CtaCount, UiSnapshot};
pub use wait::{settle, wait_until, WaitOptions, WaitResult, Waiter};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::*;
    #[cfg(feature = "browser")]
    pub use super::cdp::*;
    pub use super::click::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::fake::*;
    pub use super::harness::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::reporter::*;
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::search::*;
    pub use super::snapshot::*;
    pub use super::wait::*;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod prelude_tests {
        use crate::prelude::*;

        #[test]
        fn test_prelude_covers_a_scenario_run() {
            let table = LocatorTable::embedded().unwrap();
            let app = FakeMapApp::sample(table.clone());
            let mut page = MapPage::new(app, ProbeConfig::instant(), table);
            let outcome = Scenario::FilterPanelVisible.run(&mut page).unwrap();
            assert!(outcome.notes.is_empty());
        }
    }

    #[test]
    fn test_reexported_defaults() {
        assert_eq!(DEFAULT_FALLBACK_CITY, "Abu Dhabi");
        assert!(DEFAULT_BASE_URL.ends_with("/map"));
        assert_eq!(SCRIPTED_CLICK, "arguments[0].click();");
    }
}
