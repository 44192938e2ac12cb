//! Bounded greedy filter minimization.
//!
//! Drives the live application toward the fewest results by applying filter
//! options one at a time, never exceeding a click budget and never touching
//! a filter twice. The application is uncontrolled staging data, so the
//! search reports one of three outcomes instead of promising zero:
//!
//! ```text
//! resolve city ──► loop while budget remains
//!                    ├─ CTA == 0        ──► Zero
//!                    ├─ pass over unapplied options
//!                    │    click, consume, settle, re-read CTA
//!                    │    CTA == 0      ──► Zero
//!                    └─ pass clicked nothing ──► stop
//!                  final CTA ──► Partial(n) | Unknown
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::driver::UiDriver;
use crate::page_object::MapPage;
use crate::result::{ProbeError, ProbeResult};
use crate::snapshot::CtaCount;

/// Exploratory click allowance for one run; consumed, never replenished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickBudget {
    /// Maximum clicks
    pub limit: u32,
    /// Clicks consumed so far
    pub used: u32,
}

impl ClickBudget {
    /// Fresh budget
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self { limit, used: 0 }
    }

    /// Clicks left
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    /// Whether no clicks are left
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Take one unit; false when already exhausted
    pub fn consume(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.used += 1;
        true
    }
}

/// Which city ended up selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySelection {
    /// City asked for (blank when unset)
    pub requested: String,
    /// City actually selected; always `requested` or the fallback
    pub selected: String,
    /// Whether the fallback was used
    pub used_fallback: bool,
}

/// One filter option the search tried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Option label
    pub label: String,
    /// Whether the click was delivered
    pub selected: bool,
}

/// Three-way result of a minimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimizeOutcome {
    /// The CTA read exactly zero
    Zero,
    /// The CTA was legible but never reached zero
    Partial(u32),
    /// The CTA was never legible at the end
    Unknown,
}

impl MinimizeOutcome {
    /// Classify a final CTA reading
    #[must_use]
    pub const fn from_count(count: CtaCount) -> Self {
        match count {
            CtaCount::Known(0) => Self::Zero,
            CtaCount::Known(n) => Self::Partial(n),
            CtaCount::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for MinimizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("zero"),
            Self::Partial(n) => write!(f, "partial ({n} venues)"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Everything a minimization run did and saw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizeReport {
    /// City selection step
    pub city: CitySelection,
    /// Options attempted, in click order
    pub filters: Vec<FilterSelection>,
    /// Budget state at the end
    pub budget: ClickBudget,
    /// Last CTA reading
    pub final_count: CtaCount,
    /// Classified result
    pub outcome: MinimizeOutcome,
}

impl MinimizeReport {
    fn finish(
        city: CitySelection,
        filters: Vec<FilterSelection>,
        budget: ClickBudget,
        final_count: CtaCount,
    ) -> Self {
        Self {
            city,
            filters,
            budget,
            final_count,
            outcome: MinimizeOutcome::from_count(final_count),
        }
    }

    /// Labels of filters whose click was delivered
    #[must_use]
    pub fn applied(&self) -> Vec<&str> {
        self.filters
            .iter()
            .filter(|f| f.selected)
            .map(|f| f.label.as_str())
            .collect()
    }
}

/// Select the requested city, or the fallback when the requested one is
/// blank or not offered.
///
/// Fails with [`ProbeError::NoViableCity`] when neither is present; that is a
/// setup precondition and is never retried.
pub fn resolve_city<D: UiDriver>(
    page: &mut MapPage<D>,
    requested: &str,
    fallback: &str,
) -> ProbeResult<CitySelection> {
    let requested = requested.trim();
    let _ = page.open_filters_panel()?;

    if !requested.is_empty() && page.is_filter_chip_present(requested)? {
        let _ = page.select_filter_chip(requested)?;
        tracing::info!(city = %requested, "selected requested city");
        return Ok(CitySelection {
            requested: requested.to_string(),
            selected: requested.to_string(),
            used_fallback: false,
        });
    }

    tracing::warn!(requested = %requested, %fallback, "requested city unavailable, falling back");
    if !page.is_filter_chip_present(fallback)? {
        return Err(ProbeError::NoViableCity {
            requested: requested.to_string(),
            fallback: fallback.to_string(),
        });
    }
    let _ = page.select_filter_chip(fallback)?;
    tracing::info!(city = %fallback, "selected fallback city");
    Ok(CitySelection {
        requested: requested.to_string(),
        selected: fallback.to_string(),
        used_fallback: true,
    })
}

/// Resolve the city, then greedily apply filter options until the CTA reads
/// zero, the budget runs out, or a full pass clicks nothing.
///
/// The city click is setup and does not count against `budget`. Every click
/// attempt on an option consumes one unit whether or not it was delivered.
pub fn apply_filters_to_minimize_venues<D: UiDriver>(
    page: &mut MapPage<D>,
    requested_city: &str,
    fallback_city: &str,
    budget: u32,
) -> ProbeResult<MinimizeReport> {
    let city = resolve_city(page, requested_city, fallback_city)?;
    let mut budget = ClickBudget::new(budget);
    let mut filters: Vec<FilterSelection> = Vec::new();

    while !budget.is_exhausted() {
        let current = page.cta_count()?;
        if current.is_zero() {
            return Ok(MinimizeReport::finish(city, filters, budget, current));
        }

        let mut clicked_something = false;
        for option in page.filter_options()? {
            if budget.is_exhausted() {
                break;
            }
            if option.label.contains(city.selected.as_str())
                || filters.iter().any(|f| f.label == option.label)
            {
                continue;
            }

            let _ = budget.consume();
            let delivered = match page.click_option(&option) {
                Ok(_) => true,
                Err(e) if e.is_transient_interaction() => false,
                Err(ProbeError::ClickFailed { attempts, .. }) => {
                    tracing::warn!(label = %option.label, %attempts, "filter click failed");
                    false
                }
                Err(e) => return Err(e),
            };
            filters.push(FilterSelection {
                label: option.label.clone(),
                selected: delivered,
            });
            if !delivered {
                continue;
            }
            clicked_something = true;

            let updated = page.cta_count()?;
            tracing::info!(
                label = %option.label,
                count = %updated,
                used = budget.used,
                limit = budget.limit,
                "applied filter"
            );
            if updated.is_zero() {
                return Ok(MinimizeReport::finish(city, filters, budget, updated));
            }
        }

        if !clicked_something {
            tracing::debug!("pass clicked nothing, stopping");
            break;
        }
    }

    let final_count = page.cta_count()?;
    Ok(MinimizeReport::finish(city, filters, budget, final_count))
}
