//! Probe configuration.
//!
//! Timing values are stored in milliseconds so the configuration
//! serializes cleanly; accessors hand out [`Duration`]s.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Staging map page probed by default
pub const DEFAULT_BASE_URL: &str = "https://staging-website.privilee.ae/map";

/// City selected when the requested one is unset or not offered
pub const DEFAULT_FALLBACK_CITY: &str = "Abu Dhabi";

/// Configuration for one probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Map page URL
    pub base_url: String,
    /// Requested city; blank means unset
    pub city: Option<String>,
    /// City used when the requested one is unavailable
    pub fallback_city: String,
    /// Ceiling for the initial load signal
    pub load_timeout_ms: u64,
    /// Ceiling for a filter chip to appear
    pub chip_timeout_ms: u64,
    /// Poll interval for bounded waits
    pub poll_interval_ms: u64,
    /// Fixed delay after every click
    pub settle_ms: u64,
    /// Delay after opening the filter panel
    pub panel_open_ms: u64,
    /// Exploratory clicks allowed per minimization run
    pub click_budget: u32,
    /// Largest non-zero count accepted when zero is unreachable
    pub partial_ceiling: u32,
    /// Maximum acceptable time until the load signal
    pub max_load_ms: u64,
    /// Where failure screenshots are written
    pub artifacts_dir: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            city: None,
            fallback_city: DEFAULT_FALLBACK_CITY.to_string(),
            load_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            chip_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: 1_500,
            panel_open_ms: 800,
            click_budget: 12,
            partial_ceiling: 3,
            max_load_ms: 4_000,
            artifacts_dir: PathBuf::from("target/venue-probe/artifacts"),
        }
    }
}

impl ProbeConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for tests against an in-memory application: no delays and
    /// short timeouts
    #[must_use]
    pub fn instant() -> Self {
        Self {
            load_timeout_ms: 200,
            chip_timeout_ms: 200,
            poll_interval_ms: 1,
            settle_ms: 0,
            panel_open_ms: 0,
            ..Self::default()
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the requested city
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the fallback city
    #[must_use]
    pub fn with_fallback_city(mut self, city: impl Into<String>) -> Self {
        self.fallback_city = city.into();
        self
    }

    /// Set the click budget
    #[must_use]
    pub const fn with_click_budget(mut self, budget: u32) -> Self {
        self.click_budget = budget;
        self
    }

    /// Set the partial-result ceiling
    #[must_use]
    pub const fn with_partial_ceiling(mut self, ceiling: u32) -> Self {
        self.partial_ceiling = ceiling;
        self
    }

    /// Set the settle delay
    #[must_use]
    pub const fn with_settle_ms(mut self, ms: u64) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Set the load timeout
    #[must_use]
    pub const fn with_load_timeout_ms(mut self, ms: u64) -> Self {
        self.load_timeout_ms = ms;
        self
    }

    /// Set the maximum acceptable load latency
    #[must_use]
    pub const fn with_max_load_ms(mut self, ms: u64) -> Self {
        self.max_load_ms = ms;
        self
    }

    /// Set the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// Requested city with blank values treated as unset
    #[must_use]
    pub fn requested_city(&self) -> &str {
        self.city.as_deref().map_or("", str::trim)
    }

    /// Settle delay
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Panel-open delay
    #[must_use]
    pub const fn panel_open(&self) -> Duration {
        Duration::from_millis(self.panel_open_ms)
    }

    /// Maximum acceptable load latency
    #[must_use]
    pub const fn max_load(&self) -> Duration {
        Duration::from_millis(self.max_load_ms)
    }

    /// Wait options for the initial load signal
    #[must_use]
    pub const fn load_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.load_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for filter chip presence
    #[must_use]
    pub const fn chip_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.chip_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}
