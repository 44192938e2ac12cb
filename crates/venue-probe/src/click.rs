//! Click strategies with fallback.
//!
//! A direct pointer click is the faithful interaction, but a re-rendering
//! SPA regularly rejects it (element detached, covered, not yet
//! interactable). A scripted `element.click()` bypasses hit testing. The
//! [`FallbackClicker`] tries its strategies in order so call sites never
//! repeat that dance themselves.

use crate::driver::{ElementHandle, UiDriver};
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Script used for programmatic clicks
pub const SCRIPTED_CLICK: &str = "arguments[0].click();";

/// How a click was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickMode {
    /// Native pointer click through the driver
    Direct,
    /// `element.click()` executed in page context
    Scripted,
}

impl fmt::Display for ClickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Scripted => f.write_str("scripted"),
        }
    }
}

/// One way of clicking an element
pub trait ClickStrategy: fmt::Debug + Send + Sync {
    /// Mode reported when this strategy succeeds
    fn mode(&self) -> ClickMode;

    /// Attempt the click
    fn click(&self, driver: &mut dyn UiDriver, element: &ElementHandle) -> ProbeResult<()>;
}

/// Native click
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectClick;

impl ClickStrategy for DirectClick {
    fn mode(&self) -> ClickMode {
        ClickMode::Direct
    }

    fn click(&self, driver: &mut dyn UiDriver, element: &ElementHandle) -> ProbeResult<()> {
        driver.click(element)
    }
}

/// Programmatic click via script
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedClick;

impl ClickStrategy for ScriptedClick {
    fn mode(&self) -> ClickMode {
        ClickMode::Scripted
    }

    fn click(&self, driver: &mut dyn UiDriver, element: &ElementHandle) -> ProbeResult<()> {
        driver
            .execute_script(SCRIPTED_CLICK, std::slice::from_ref(element))
            .map(|_| ())
    }
}

/// Ordered list of click strategies; the first success wins
#[derive(Debug)]
pub struct FallbackClicker {
    strategies: Vec<Box<dyn ClickStrategy>>,
}

impl Default for FallbackClicker {
    fn default() -> Self {
        Self::new(vec![Box::new(DirectClick), Box::new(ScriptedClick)])
    }
}

impl FallbackClicker {
    /// Create a clicker from an explicit strategy list
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ClickStrategy>>) -> Self {
        Self { strategies }
    }

    /// Modes in the order they are tried
    #[must_use]
    pub fn modes(&self) -> Vec<ClickMode> {
        self.strategies.iter().map(|s| s.mode()).collect()
    }

    /// Click `element`, falling through strategies on failure.
    ///
    /// Returns the mode that succeeded, or [`ProbeError::ClickFailed`]
    /// listing every attempt.
    pub fn click(
        &self,
        driver: &mut dyn UiDriver,
        element: &ElementHandle,
        target: &str,
    ) -> ProbeResult<ClickMode> {
        let mut failures = Vec::new();
        for strategy in &self.strategies {
            match strategy.click(driver, element) {
                Ok(()) => {
                    if !failures.is_empty() {
                        tracing::warn!(
                            %target,
                            mode = %strategy.mode(),
                            "click succeeded after fallback: {}",
                            failures.join("; ")
                        );
                    }
                    return Ok(strategy.mode());
                }
                Err(e) => {
                    tracing::debug!(%target, mode = %strategy.mode(), error = %e, "click attempt failed");
                    failures.push(format!("{}: {e}", strategy.mode()));
                }
            }
        }
        Err(ProbeError::ClickFailed {
            target: target.to_string(),
            attempts: if failures.is_empty() {
                "no strategies configured".to_string()
            } else {
                failures.join("; ")
            },
        })
    }
}
