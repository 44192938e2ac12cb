//! Scenario driver.
//!
//! Each scenario is a straight line: open the page, take one focused action,
//! assert on semantic observations. Scenarios only talk to [`MapPage`], never
//! to the driver, so they survive markup changes that keep visible behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::assertion::Assertion;
use crate::driver::UiDriver;
use crate::page_object::MapPage;
use crate::result::ProbeResult;
use crate::search::{apply_filters_to_minimize_venues, MinimizeOutcome};
use crate::wait::{settle, Waiter};

/// A passing scenario's remarks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Notes worth surfacing in reports (fallbacks, partial results)
    pub notes: Vec<String>,
}

impl ScenarioOutcome {
    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// The checks the probe knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// The map boots: filter panel or loading indicator appears
    PageLoad,
    /// The filter panel is shown after load
    FilterPanelVisible,
    /// Clicking a filter visibly changes results or state
    FilterChangesResults,
    /// Over-filtering reaches zero venues and the empty state
    OverFilteringShowsEmptyState,
    /// The map shows data or feedback, never a blank page
    MapNotSilentlyEmpty,
    /// Some venue title or card carries real text
    VenueDataNotBlank,
    /// The load signal appears within the latency ceiling
    LoadLatency,
}

impl Scenario {
    /// Every scenario in run order
    pub const ALL: [Self; 7] = [
        Self::PageLoad,
        Self::FilterPanelVisible,
        Self::FilterChangesResults,
        Self::OverFilteringShowsEmptyState,
        Self::MapNotSilentlyEmpty,
        Self::VenueDataNotBlank,
        Self::LoadLatency,
    ];

    /// Stable identifier used in reports and artifact names
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PageLoad => "page_load",
            Self::FilterPanelVisible => "filter_panel_visible",
            Self::FilterChangesResults => "filter_changes_results",
            Self::OverFilteringShowsEmptyState => "over_filtering_shows_empty_state",
            Self::MapNotSilentlyEmpty => "map_not_silently_empty",
            Self::VenueDataNotBlank => "venue_data_not_blank",
            Self::LoadLatency => "load_latency",
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::PageLoad => "map page shows the filter panel or a loading indicator",
            Self::FilterPanelVisible => "filter panel is visible after load",
            Self::FilterChangesResults => "a filter click changes results or shows a state message",
            Self::OverFilteringShowsEmptyState => {
                "over-filtering reaches 'Show 0 venues' and the empty state"
            }
            Self::MapNotSilentlyEmpty => "map shows venues, markers or explicit feedback",
            Self::VenueDataNotBlank => "a venue title or card has meaningful text",
            Self::LoadLatency => "load signal appears within the latency ceiling",
        }
    }

    /// Look a scenario up by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Run against a freshly created page
    pub fn run<D: UiDriver>(&self, page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
        tracing::info!(scenario = self.name(), "running");
        match self {
            Self::PageLoad => page_load(page),
            Self::FilterPanelVisible => filter_panel_visible(page),
            Self::FilterChangesResults => filter_changes_results(page),
            Self::OverFilteringShowsEmptyState => over_filtering_shows_empty_state(page),
            Self::MapNotSilentlyEmpty => map_not_silently_empty(page),
            Self::VenueDataNotBlank => venue_data_not_blank(page),
            Self::LoadLatency => load_latency(page),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn failed(expected: &str, observed: &str) -> ProbeResult<ScenarioOutcome> {
    Assertion::is_true(false, expected, observed).into_result()?;
    Ok(ScenarioOutcome::default())
}

/// After a state-changing action the page must show data or say why not
fn ensure_not_silently_empty<D: UiDriver>(page: &MapPage<D>, action: &str) -> ProbeResult<()> {
    let snapshot = page.snapshot()?;
    Assertion::is_true(
        !snapshot.is_silently_empty(),
        &format!("venues, markers or explicit feedback after {action}"),
        &format!("a blank map ({snapshot})"),
    )
    .into_result()
}

fn page_load<D: UiDriver>(page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
    let waited = page.open()?;
    Ok(ScenarioOutcome::default().note(format!(
        "load signal after {}ms",
        waited.elapsed.as_millis()
    )))
}

fn filter_panel_visible<D: UiDriver>(page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
    let _ = page.open()?;
    let _ = Waiter::new(page.config().load_wait())
        .until("filter panel", || page.is_filter_panel_visible())?;
    Ok(ScenarioOutcome::default())
}

fn filter_changes_results<D: UiDriver>(page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
    let _ = page.open()?;
    Assertion::is_true(
        page.is_filter_panel_visible()?,
        "a visible filter panel before filtering",
        "no filter panel",
    )
    .into_result()?;

    match page.apply_first_effective_filter()? {
        Some(label) => {
            ensure_not_silently_empty(page, &format!("selecting '{label}'"))?;
            Ok(ScenarioOutcome::default().note(format!("'{label}' changed the page")))
        }
        None => failed(
            "a filter click to change results or show a state message",
            &format!("no visible change ({})", page.snapshot()?),
        ),
    }
}

fn over_filtering_shows_empty_state<D: UiDriver>(
    page: &mut MapPage<D>,
) -> ProbeResult<ScenarioOutcome> {
    let _ = page.open()?;
    let requested = page.config().requested_city().to_string();
    let fallback = page.config().fallback_city.clone();
    let budget = page.config().click_budget;
    let ceiling = page.config().partial_ceiling;

    let report = apply_filters_to_minimize_venues(page, &requested, &fallback, budget)?;
    let mut outcome = ScenarioOutcome::default();
    if report.city.used_fallback {
        outcome = outcome.note(format!("city fell back to '{}'", report.city.selected));
    }
    tracing::info!(
        outcome = %report.outcome,
        clicks = report.budget.used,
        applied = ?report.applied(),
        "minimization finished"
    );

    match report.outcome {
        MinimizeOutcome::Zero => {
            let label = page.cta_label()?.unwrap_or_default();
            Assertion::contains("call-to-action", &label.to_lowercase(), "show").into_result()?;
            Assertion::contains("call-to-action", &label, "0").into_result()?;
            Assertion::is_true(
                page.is_show_zero_venues_visible()?,
                "a visible 'Show 0 venues' button",
                &format!("call-to-action '{label}'"),
            )
            .into_result()?;

            let _ = page.click_show_venues()?;
            Assertion::is_true(
                page.is_zero_result_state()?,
                "the zero-venues header and apology on the results panel",
                &page.snapshot()?.to_string(),
            )
            .into_result()?;
            Ok(outcome)
        }
        MinimizeOutcome::Partial(n) if n <= ceiling => {
            ensure_not_silently_empty(page, "over-filtering")?;
            Ok(outcome.note(format!(
                "zero not reachable within {} clicks; {n} venues remain (ceiling {ceiling})",
                report.budget.used
            )))
        }
        MinimizeOutcome::Partial(n) => failed(
            &format!("zero or at most {ceiling} venues after over-filtering"),
            &format!("{n} venues after {} filter clicks", report.budget.used),
        ),
        MinimizeOutcome::Unknown => failed(
            "a legible 'Show N venues' counter after over-filtering",
            &format!("{:?}", page.cta_label()?),
        ),
    }
}

fn map_not_silently_empty<D: UiDriver>(page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
    let _ = page.open()?;
    settle(page.config().settle());
    let snapshot = page.snapshot()?;
    Assertion::is_true(
        !snapshot.is_silently_empty(),
        "venues, markers or explicit feedback (no results, error, clear filters)",
        &format!("a blank map ({snapshot})"),
    )
    .into_result()?;
    Ok(ScenarioOutcome::default())
}

fn venue_data_not_blank<D: UiDriver>(page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
    let _ = page.open()?;
    settle(page.config().settle());
    let text = page.any_visible_venue_text()?;
    Assertion::not_blank("venue title or card text", text.as_deref()).into_result()?;
    Ok(ScenarioOutcome::default())
}

fn load_latency<D: UiDriver>(page: &mut MapPage<D>) -> ProbeResult<ScenarioOutcome> {
    let start = Instant::now();
    let _ = page.open()?;
    let elapsed = start.elapsed();
    Assertion::within("page load", elapsed, page.config().max_load()).into_result()?;
    Ok(ScenarioOutcome::default().note(format!("loaded in {}ms", elapsed.as_millis())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::fake::{FakeEffect, FakeMapApp, FakeNode};
    use crate::locator::{LocatorTable, Target};
    use crate::result::ProbeError;
    use std::time::Duration;

    fn table() -> LocatorTable {
        LocatorTable::embedded().unwrap()
    }

    fn sample_page() -> MapPage<FakeMapApp> {
        MapPage::new(FakeMapApp::sample(table()), ProbeConfig::instant(), table())
    }

    #[test]
    fn test_names_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_name(scenario.name()), Some(scenario));
            assert!(!scenario.description().is_empty());
        }
        assert_eq!(Scenario::from_name("nope"), None);
    }

    #[test]
    fn test_every_scenario_passes_on_sample() {
        for scenario in Scenario::ALL {
            let mut page = sample_page();
            let result = scenario.run(&mut page);
            assert!(result.is_ok(), "{scenario} failed: {result:?}");
        }
    }

    #[test]
    fn test_blank_map_fails_with_description() {
        let app = FakeMapApp::new(table()).with(FakeNode::new(Target::FilterHeader, "Filters"));
        let mut page = MapPage::new(app, ProbeConfig::instant(), table());
        let err = Scenario::MapNotSilentlyEmpty.run(&mut page).unwrap_err();
        assert!(matches!(err, ProbeError::AssertionFailed { .. }));
        assert!(err.to_string().contains("a blank map"));
    }

    #[test]
    fn test_filter_that_blanks_map_fails() {
        let mut app = FakeMapApp::new(table())
            .with(FakeNode::new(Target::FilterHeader, "Filter your search"))
            .with(
                FakeNode::new(Target::FilterOptions, "Fitness")
                    .on_click(FakeEffect::SetCount {
                        target: Target::VenueCards,
                        count: 0,
                    })
                    .on_click(FakeEffect::SetCount {
                        target: Target::Markers,
                        count: 0,
                    }),
            );
        for _ in 0..5 {
            app.push(FakeNode::new(Target::VenueCards, "Corniche Club"));
            app.push(FakeNode::new(Target::Markers, ""));
        }
        let mut page = MapPage::new(app, ProbeConfig::instant(), table());

        let err = Scenario::FilterChangesResults.run(&mut page).unwrap_err();
        assert!(matches!(err, ProbeError::AssertionFailed { .. }));
        let msg = err.to_string();
        assert!(msg.contains("after selecting 'Fitness'"), "{msg}");
        assert!(msg.contains("a blank map"), "{msg}");
    }

    #[test]
    fn test_filter_with_feedback_passes() {
        let app = FakeMapApp::new(table())
            .with(FakeNode::new(Target::FilterHeader, "Filter your search"))
            .with(FakeNode::new(Target::VenueCards, "Corniche Club"))
            .with(
                FakeNode::new(Target::FilterOptions, "Fitness")
                    .on_click(FakeEffect::Remove(Target::VenueCards))
                    .on_click(FakeEffect::Reveal(Target::NoResultsMessage)),
            )
            .with(FakeNode::new(Target::NoResultsMessage, "No venues found").absent());
        let mut page = MapPage::new(app, ProbeConfig::instant(), table());

        let outcome = Scenario::FilterChangesResults.run(&mut page).unwrap();
        assert_eq!(outcome.notes, vec!["'Fitness' changed the page".to_string()]);
    }

    #[test]
    fn test_slow_load_fails_latency() {
        let app = FakeMapApp::sample(table()).with_navigation_delay(Duration::from_millis(30));
        let config = ProbeConfig::instant().with_max_load_ms(5);
        let mut page = MapPage::new(app, config, table());
        let err = Scenario::LoadLatency.run(&mut page).unwrap_err();
        assert!(err.to_string().contains("expected at most 5ms"));
    }
}
