//! Page Object for the venue map.
//!
//! [`MapPage`] is the single canonical interaction core: every scenario goes
//! through it and never touches the driver directly.
//!
//! - **Actions** locate the first visible, enabled candidate, click it through
//!   the [`FallbackClicker`] and then settle for a fixed delay
//! - **Observations** are pure reads; an element going stale mid-read counts
//!   as "not there" rather than an error
//! - **Locators** all come from the [`LocatorTable`]

use crate::click::{ClickMode, FallbackClicker};
use crate::config::ProbeConfig;
use crate::driver::{ElementHandle, UiDriver};
use crate::locator::{Locator, LocatorTable, Target};
use crate::result::{ProbeError, ProbeResult};
use crate::snapshot::{CtaCount, UiSnapshot};
use crate::wait::{settle, WaitResult, Waiter};

/// Condition awaited after navigation
pub const LOAD_SIGNAL: &str = "filter panel or loading indicator";

/// Minimum length of text accepted as venue data
const MIN_VENUE_TEXT_LEN: usize = 3;

/// Trait for page objects representing a page in the UI.
pub trait PageObject {
    /// URL this page lives at
    fn url_pattern(&self) -> &str;

    /// Optional wait time for page load (in milliseconds)
    fn load_timeout_ms(&self) -> u64 {
        30000
    }

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Result of [`MapPage::perform_click`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A candidate was clicked and the page settled
    Clicked(ClickMode),
    /// No visible, enabled candidate existed; nothing happened
    NoTarget,
}

impl ClickOutcome {
    /// Whether a click was delivered
    #[must_use]
    pub const fn clicked(&self) -> bool {
        matches!(self, Self::Clicked(_))
    }
}

/// A clickable filter option as found on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Element handle; may go stale after any click
    pub handle: ElementHandle,
    /// Trimmed visible label
    pub label: String,
}

/// The venue map page
#[derive(Debug)]
pub struct MapPage<D: UiDriver> {
    driver: D,
    config: ProbeConfig,
    table: LocatorTable,
    clicker: FallbackClicker,
}

impl<D: UiDriver> PageObject for MapPage<D> {
    fn url_pattern(&self) -> &str {
        &self.config.base_url
    }

    fn load_timeout_ms(&self) -> u64 {
        self.config.load_timeout_ms
    }

    fn page_name(&self) -> &str {
        "map"
    }
}

impl<D: UiDriver> MapPage<D> {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: D, config: ProbeConfig, table: LocatorTable) -> Self {
        Self {
            driver,
            config,
            table,
            clicker: FallbackClicker::default(),
        }
    }

    /// Replace the click strategy list
    #[must_use]
    pub fn with_clicker(mut self, clicker: FallbackClicker) -> Self {
        self.clicker = clicker;
        self
    }

    /// Underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Give the driver back
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Locator table in effect
    #[must_use]
    pub const fn table(&self) -> &LocatorTable {
        &self.table
    }

    // ---------- Actions ----------

    /// Navigate to the map and wait for the filter panel or a loading
    /// indicator, whichever shows first.
    pub fn open(&mut self) -> ProbeResult<WaitResult> {
        let url = self.config.base_url.clone();
        tracing::info!(%url, "opening map page");
        self.driver
            .navigate(&url)
            .map_err(|e| match e {
                ProbeError::NavigationError { .. } => e,
                other => ProbeError::NavigationError {
                    url: url.clone(),
                    message: other.to_string(),
                },
            })?;

        let waited = Waiter::new(self.config.load_wait()).until(LOAD_SIGNAL, || {
            Ok(self.is_filter_panel_visible()? || self.is_loading()?)
        })?;
        tracing::info!(elapsed_ms = waited.elapsed.as_millis(), "map page booted");
        Ok(waited)
    }

    /// Click the first visible, enabled match of `locator`, falling back to a
    /// scripted click, then settle.
    ///
    /// Finding no candidate is not an error: the caller gets
    /// [`ClickOutcome::NoTarget`] and must check it.
    pub fn perform_click(&mut self, locator: &Locator) -> ProbeResult<ClickOutcome> {
        let Some(element) = self.first_interactable(locator)? else {
            tracing::debug!(%locator, "no visible, enabled candidate to click");
            return Ok(ClickOutcome::NoTarget);
        };
        let mode = self.click_and_settle(&element, &locator.to_string())?;
        Ok(ClickOutcome::Clicked(mode))
    }

    /// Open the filter panel unless it is already shown.
    ///
    /// Returns whether the Filters button was clicked.
    pub fn open_filters_panel(&mut self) -> ProbeResult<bool> {
        if self.is_filter_panel_visible()? {
            return Ok(false);
        }
        let button = self.table.locator(Target::FiltersButton);
        let outcome = self.perform_click(&button)?;
        if outcome.clicked() {
            settle(self.config.panel_open());
        }
        Ok(outcome.clicked())
    }

    /// Wait for the chip labelled `label`, click it with fallback and settle.
    pub fn select_filter_chip(&mut self, label: &str) -> ProbeResult<ClickMode> {
        let chip = self.table.filter_chip(label);
        let waited_for = chip.to_string();
        let found = Waiter::new(self.config.chip_wait()).until(&waited_for, || {
            Ok(!self.driver.find_all(chip.selector())?.is_empty())
        });
        if let Err(ProbeError::Timeout { .. }) = found {
            return Err(ProbeError::FilterNotFound {
                label: label.to_string(),
            });
        }
        found?;

        let element = match self.first_interactable(&chip)? {
            Some(element) => element,
            None => self
                .driver
                .find_all(chip.selector())?
                .into_iter()
                .next()
                .ok_or_else(|| ProbeError::FilterNotFound {
                    label: label.to_string(),
                })?,
        };
        let mode = self.click_and_settle(&element, &waited_for)?;
        tracing::info!(%label, %mode, "selected filter chip");
        Ok(mode)
    }

    /// Open the panel if needed and check whether a chip labelled `label`
    /// exists.
    pub fn is_filter_chip_present(&mut self, label: &str) -> ProbeResult<bool> {
        let _ = self.open_filters_panel()?;
        let chip = self.table.filter_chip(label);
        Ok(!self.driver.find_all(chip.selector())?.is_empty())
    }

    /// Click the "Show N venues" call-to-action once it is clickable
    pub fn click_show_venues(&mut self) -> ProbeResult<ClickMode> {
        let cta = self.table.locator(Target::ShowVenuesButton);
        let waited_for = format!("clickable {cta}");
        let mut element = None;
        let _ = Waiter::new(self.config.chip_wait()).until(&waited_for, || {
            element = self.first_interactable(&cta)?;
            Ok(element.is_some())
        })?;
        let element = element.ok_or_else(|| ProbeError::Timeout {
            ms: self.config.chip_timeout_ms,
            waited_for: waited_for.clone(),
        })?;
        self.click_and_settle(&element, &cta.to_string())
    }

    /// Visible, enabled filter options in document order, without excluded
    /// controls ("Clear filters", the CTA, the "Filters" toggle) or blank labels.
    pub fn filter_options(&self) -> ProbeResult<Vec<FilterOption>> {
        let locator = self.table.locator(Target::FilterOptions);
        let mut options = Vec::new();
        for handle in self.driver.find_all(locator.selector())? {
            let label = match self.interactable_text(&handle) {
                Ok(Some(label)) => label,
                Ok(None) => continue,
                Err(e) if e.is_transient_interaction() => continue,
                Err(e) => return Err(e),
            };
            if label.is_empty() || self.table.is_excluded_option(&label) {
                continue;
            }
            options.push(FilterOption { handle, label });
        }
        Ok(options)
    }

    /// Click one filter option with fallback and settle
    pub fn click_option(&mut self, option: &FilterOption) -> ProbeResult<ClickMode> {
        self.click_and_settle(&option.handle, &option.label)
    }

    /// Snapshot, click, snapshot: true when the click had a visible effect
    /// (counts changed or a state message newly appeared).
    ///
    /// A locator with no clickable candidate yields `false`.
    pub fn detect_change_after_action(&mut self, locator: &Locator) -> ProbeResult<bool> {
        let before = self.snapshot()?;
        if !self.perform_click(locator)?.clicked() {
            return Ok(false);
        }
        let after = self.snapshot()?;
        let changed = after.differs_from(&before);
        tracing::debug!(%locator, %before, %after, changed, "change detection");
        Ok(changed)
    }

    /// Click filter options in order until one is proven effective.
    ///
    /// Returns the label of the first effective option, or `None` when every
    /// option was a no-op.
    pub fn apply_first_effective_filter(&mut self) -> ProbeResult<Option<String>> {
        let _ = self.open_filters_panel()?;
        let before = self.snapshot()?;
        for option in self.filter_options()? {
            match self.click_option(&option) {
                Ok(_) => {}
                Err(e) if e.is_transient_interaction() => continue,
                Err(ProbeError::ClickFailed { .. }) => continue,
                Err(e) => return Err(e),
            }
            let after = self.snapshot()?;
            if after.differs_from(&before) {
                tracing::info!(label = %option.label, "filter proven effective");
                return Ok(Some(option.label));
            }
            tracing::debug!(label = %option.label, "filter click had no visible effect");
        }
        Ok(None)
    }

    // ---------- Observations ----------

    /// Filter panel anchor is shown
    pub fn is_filter_panel_visible(&self) -> ProbeResult<bool> {
        self.any_displayed(Target::FilterHeader)
    }

    /// Loading indicator is shown
    pub fn is_loading(&self) -> ProbeResult<bool> {
        self.any_displayed(Target::LoadingMessage)
    }

    /// Error message is shown
    pub fn is_error(&self) -> ProbeResult<bool> {
        self.any_displayed(Target::ErrorMessage)
    }

    /// A no-results message or the empty-state apology is shown
    pub fn is_no_results(&self) -> ProbeResult<bool> {
        Ok(self.any_displayed(Target::NoResultsMessage)?
            || self.any_displayed(Target::ZeroVenuesApology)?)
    }

    /// Empty-state header AND apology are both shown.
    ///
    /// Either one alone is a partial render, not the zero state.
    pub fn is_zero_result_state(&self) -> ProbeResult<bool> {
        Ok(self.any_displayed(Target::ZeroVenuesHeader)?
            && self.any_displayed(Target::ZeroVenuesApology)?)
    }

    /// "Clear filters" control is shown
    pub fn is_clear_filters_visible(&self) -> ProbeResult<bool> {
        self.any_displayed(Target::ClearFilters)
    }

    /// "Show 0 venues" call-to-action is shown
    pub fn is_show_zero_venues_visible(&self) -> ProbeResult<bool> {
        self.any_displayed(Target::ShowZeroVenuesButton)
    }

    /// Number of venue-card-like nodes
    pub fn venue_card_count(&self) -> ProbeResult<usize> {
        self.count(Target::VenueCards)
    }

    /// Number of marker-like nodes
    pub fn marker_like_count(&self) -> ProbeResult<usize> {
        self.count(Target::Markers)
    }

    /// Raw text of the first call-to-action, if any
    pub fn cta_label(&self) -> ProbeResult<Option<String>> {
        let cta = self.table.locator(Target::ShowVenuesButton);
        for handle in self.driver.find_all(cta.selector())? {
            match self.driver.text(&handle) {
                Ok(text) => return Ok(Some(text.trim().to_string())),
                Err(e) if e.is_transient_interaction() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Venue count shown on the call-to-action
    pub fn cta_count(&self) -> ProbeResult<CtaCount> {
        Ok(self
            .cta_label()?
            .map_or(CtaCount::Unknown, |label| CtaCount::parse(&label)))
    }

    /// First venue-like text of at least three characters: a title
    /// candidate first, then the first card
    pub fn any_visible_venue_text(&self) -> ProbeResult<Option<String>> {
        let titles = self.table.locator(Target::VenueTitles);
        for handle in self.driver.find_all(titles.selector())? {
            if let Some(text) = self.displayed_text(&handle)? {
                if text.chars().count() >= MIN_VENUE_TEXT_LEN {
                    return Ok(Some(text));
                }
            }
        }

        let cards = self.table.locator(Target::VenueCards);
        if let Some(first) = self.driver.find_all(cards.selector())?.first() {
            if let Some(text) = self.displayed_text(first)? {
                if text.chars().count() >= MIN_VENUE_TEXT_LEN {
                    return Ok(Some(text));
                }
            }
        }
        Ok(None)
    }

    /// All observations at once
    pub fn snapshot(&self) -> ProbeResult<UiSnapshot> {
        let cta_label = self.cta_label()?;
        let cta_count = cta_label
            .as_deref()
            .map_or(CtaCount::Unknown, CtaCount::parse);
        let snapshot = UiSnapshot {
            filter_panel_visible: self.is_filter_panel_visible()?,
            loading: self.is_loading()?,
            error: self.is_error()?,
            no_results: self.is_no_results()?,
            clear_filters_visible: self.is_clear_filters_visible()?,
            venue_cards: self.venue_card_count()?,
            markers: self.marker_like_count()?,
            cta_label,
            cta_count,
        };
        tracing::debug!(%snapshot, "observed");
        Ok(snapshot)
    }

    // ---------- Helpers ----------

    fn click_and_settle(&mut self, element: &ElementHandle, target: &str) -> ProbeResult<ClickMode> {
        let mode = self.clicker.click(&mut self.driver, element, target)?;
        tracing::info!(%target, %mode, "clicked");
        settle(self.config.settle());
        Ok(mode)
    }

    fn first_interactable(&self, locator: &Locator) -> ProbeResult<Option<ElementHandle>> {
        for handle in self.driver.find_all(locator.selector())? {
            match self.is_interactable(&handle) {
                Ok(true) => return Ok(Some(handle)),
                Ok(false) => {}
                Err(e) if e.is_transient_interaction() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    fn is_interactable(&self, handle: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.driver.is_displayed(handle)? && self.driver.is_enabled(handle)?)
    }

    fn interactable_text(&self, handle: &ElementHandle) -> ProbeResult<Option<String>> {
        if !self.is_interactable(handle)? {
            return Ok(None);
        }
        Ok(Some(self.driver.text(handle)?.trim().to_string()))
    }

    fn displayed_text(&self, handle: &ElementHandle) -> ProbeResult<Option<String>> {
        let read = self
            .driver
            .is_displayed(handle)
            .and_then(|shown| shown.then(|| self.driver.text(handle)).transpose());
        match read {
            Ok(text) => Ok(text.map(|t| t.trim().to_string())),
            Err(e) if e.is_transient_interaction() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn any_displayed(&self, target: Target) -> ProbeResult<bool> {
        let locator = self.table.locator(target);
        for handle in self.driver.find_all(locator.selector())? {
            match self.driver.is_displayed(&handle) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) if e.is_transient_interaction() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(false)
    }

    fn count(&self, target: Target) -> ProbeResult<usize> {
        let locator = self.table.locator(target);
        Ok(self.driver.find_all(locator.selector())?.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeEffect, FakeMapApp, FakeNode};

    fn table() -> LocatorTable {
        LocatorTable::embedded().unwrap()
    }

    fn page(app: FakeMapApp) -> MapPage<FakeMapApp> {
        MapPage::new(app, ProbeConfig::instant(), table())
    }

    fn cards(app: &mut FakeMapApp, n: usize) {
        app.apply(&FakeEffect::SetCount {
            target: Target::VenueCards,
            count: n,
        });
    }

    mod open_tests {
        use super::*;

        #[test]
        fn test_open_waits_for_filter_header() {
            let app = FakeMapApp::new(table()).with(FakeNode::new(Target::FilterHeader, "Filters"));
            let mut page = page(app);
            let waited = page.open().unwrap();
            assert_eq!(waited.waited_for, LOAD_SIGNAL);
            assert!(page.driver().was_called("navigate:https://staging-website.privilee.ae/map"));
        }

        #[test]
        fn test_loading_indicator_counts_as_load_signal() {
            let app =
                FakeMapApp::new(table()).with(FakeNode::new(Target::LoadingMessage, "Loading..."));
            assert!(page(app).open().is_ok());
        }

        #[test]
        fn test_open_times_out_with_description() {
            let err = page(FakeMapApp::new(table())).open().unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("Timed out after 200ms"), "{msg}");
            assert!(msg.contains(LOAD_SIGNAL), "{msg}");
        }

        #[test]
        fn test_page_object_metadata() {
            let page = page(FakeMapApp::new(table()));
            assert_eq!(page.page_name(), "map");
            assert_eq!(page.load_timeout_ms(), 200);
            assert!(page.url_pattern().ends_with("/map"));
        }
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_perform_click_without_candidate_is_noop() {
            let mut page = page(FakeMapApp::new(table()));
            let clear = page.table().locator(Target::ClearFilters);
            assert_eq!(page.perform_click(&clear).unwrap(), ClickOutcome::NoTarget);
            assert!(page.driver().clicks().is_empty());
        }

        #[test]
        fn test_perform_click_skips_hidden_and_disabled() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterOptions, "Hidden").hidden())
                .with(FakeNode::new(Target::FilterOptions, "Disabled").disabled())
                .with(FakeNode::new(Target::FilterOptions, "Fitness"));
            let mut page = page(app);
            let options = page.table().locator(Target::FilterOptions);
            assert_eq!(
                page.perform_click(&options).unwrap(),
                ClickOutcome::Clicked(ClickMode::Direct)
            );
            assert_eq!(page.driver().clicked_labels(), vec!["Fitness".to_string()]);
        }

        #[test]
        fn test_perform_click_falls_back_to_script() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterOptions, "Fitness").rejects_direct_click());
            let mut page = page(app);
            let options = page.table().locator(Target::FilterOptions);
            assert_eq!(
                page.perform_click(&options).unwrap(),
                ClickOutcome::Clicked(ClickMode::Scripted)
            );
        }

        #[test]
        fn test_perform_click_escalates_when_both_fail() {
            let app = FakeMapApp::new(table()).with(
                FakeNode::new(Target::FilterOptions, "Fitness")
                    .rejects_direct_click()
                    .rejects_scripted_click(),
            );
            let mut page = page(app);
            let options = page.table().locator(Target::FilterOptions);
            assert!(matches!(
                page.perform_click(&options),
                Err(ProbeError::ClickFailed { .. })
            ));
        }

        #[test]
        fn test_open_filters_panel_skips_click_when_visible() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterHeader, "Filter your search"))
                .with(FakeNode::new(Target::FiltersButton, "Filters"));
            let mut page = page(app);
            assert!(!page.open_filters_panel().unwrap());
            assert!(page.driver().clicks().is_empty());
        }

        #[test]
        fn test_open_filters_panel_clicks_button() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterHeader, "Filter your search").absent())
                .with(
                    FakeNode::new(Target::FiltersButton, "Filters")
                        .on_click(FakeEffect::Reveal(Target::FilterHeader)),
                );
            let mut page = page(app);
            assert!(page.open_filters_panel().unwrap());
            assert!(page.is_filter_panel_visible().unwrap());
        }

        #[test]
        fn test_select_filter_chip_by_label() {
            let mut page = page(FakeMapApp::sample(table()));
            page.select_filter_chip("Dubai").unwrap();
            assert_eq!(page.driver().clicked_labels(), vec!["Dubai".to_string()]);
            assert_eq!(page.cta_count().unwrap(), CtaCount::Known(24));
        }

        #[test]
        fn test_select_missing_chip_is_filter_not_found() {
            let mut page = page(FakeMapApp::sample(table()));
            let err = page.select_filter_chip("Atlantis").unwrap_err();
            assert!(matches!(err, ProbeError::FilterNotFound { ref label } if label == "Atlantis"));
        }

        #[test]
        fn test_click_show_venues() {
            let mut page = page(FakeMapApp::sample(table()));
            page.click_show_venues().unwrap();
            assert_eq!(
                page.driver().clicked_labels(),
                vec!["Show 42 venues".to_string()]
            );
        }
    }

    mod observation_tests {
        use super::*;

        #[test]
        fn test_zero_state_requires_both_signals() {
            let header_only = FakeMapApp::new(table())
                .with(FakeNode::new(Target::ZeroVenuesHeader, "0 venues"));
            assert!(!page(header_only).is_zero_result_state().unwrap());

            let apology_only = FakeMapApp::new(table()).with(FakeNode::new(
                Target::ZeroVenuesApology,
                "Sorry, there are no venues matching your search and filters.",
            ));
            assert!(!page(apology_only).is_zero_result_state().unwrap());

            let both = FakeMapApp::new(table())
                .with(FakeNode::new(Target::ZeroVenuesHeader, "0 venues"))
                .with(FakeNode::new(
                    Target::ZeroVenuesApology,
                    "Sorry, there are no venues matching your search and filters.",
                ));
            assert!(page(both).is_zero_result_state().unwrap());
        }

        #[test]
        fn test_apology_alone_counts_as_no_results() {
            let app = FakeMapApp::new(table()).with(FakeNode::new(
                Target::ZeroVenuesApology,
                "Sorry, there are no venues matching your search and filters.",
            ));
            assert!(page(app).is_no_results().unwrap());
        }

        #[test]
        fn test_hidden_message_is_not_visible() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::ErrorMessage, "Something went wrong").hidden());
            assert!(!page(app).is_error().unwrap());
        }

        #[test]
        fn test_cta_without_digits_is_unknown() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::ShowVenuesButton, "Show venues"));
            let page = page(app);
            assert_eq!(page.cta_label().unwrap().as_deref(), Some("Show venues"));
            assert_eq!(page.cta_count().unwrap(), CtaCount::Unknown);
        }

        #[test]
        fn test_missing_cta_is_unknown() {
            assert_eq!(
                page(FakeMapApp::new(table())).cta_count().unwrap(),
                CtaCount::Unknown
            );
        }

        #[test]
        fn test_snapshot_of_sample() {
            let snapshot = page(FakeMapApp::sample(table())).snapshot().unwrap();
            assert!(snapshot.filter_panel_visible);
            assert_eq!(snapshot.venue_cards, 5);
            assert_eq!(snapshot.markers, 5);
            assert_eq!(snapshot.cta_count, CtaCount::Known(42));
            assert!(!snapshot.is_silently_empty());
        }

        #[test]
        fn test_any_visible_venue_text_prefers_titles() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::VenueTitles, "ab"))
                .with(FakeNode::new(Target::VenueTitles, "  Yas Fitness  "));
            assert_eq!(
                page(app).any_visible_venue_text().unwrap().as_deref(),
                Some("Yas Fitness")
            );
        }

        #[test]
        fn test_any_visible_venue_text_falls_back_to_card() {
            let mut app = FakeMapApp::new(table());
            cards(&mut app, 2);
            assert_eq!(
                page(app).any_visible_venue_text().unwrap().as_deref(),
                Some("venue_cards 1")
            );
        }

        #[test]
        fn test_any_visible_venue_text_none_when_blank() {
            let app = FakeMapApp::new(table()).with(FakeNode::new(Target::VenueTitles, " "));
            assert_eq!(page(app).any_visible_venue_text().unwrap(), None);
        }

        #[test]
        fn test_filter_options_exclude_controls() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterOptions, "Fitness"))
                .with(FakeNode::new(Target::FilterOptions, "Clear filters"))
                .with(FakeNode::new(Target::FilterOptions, "Show 4 venues"))
                .with(FakeNode::new(Target::FilterOptions, "Filters"))
                .with(FakeNode::new(Target::FilterOptions, "Pet filters"))
                .with(FakeNode::new(Target::FilterOptions, ""));
            let labels: Vec<String> = page(app)
                .filter_options()
                .unwrap()
                .into_iter()
                .map(|o| o.label)
                .collect();
            assert_eq!(labels, vec!["Fitness".to_string(), "Pet filters".to_string()]);
        }
    }

    mod change_detection_tests {
        use super::*;

        #[test]
        fn test_card_count_change_is_detected() {
            let mut app = FakeMapApp::new(table()).with(
                FakeNode::new(Target::FilterOptions, "Fitness").on_click(FakeEffect::SetCount {
                    target: Target::VenueCards,
                    count: 3,
                }),
            );
            cards(&mut app, 5);
            let mut page = page(app);
            let options = page.table().locator(Target::FilterOptions);
            assert!(page.detect_change_after_action(&options).unwrap());
        }

        #[test]
        fn test_error_appearing_is_detected() {
            let mut app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::ErrorMessage, "Unable to load venues").absent())
                .with(
                    FakeNode::new(Target::FilterOptions, "Fitness")
                        .on_click(FakeEffect::Reveal(Target::ErrorMessage)),
                );
            cards(&mut app, 5);
            let mut page = page(app);
            let options = page.table().locator(Target::FilterOptions);
            assert!(page.detect_change_after_action(&options).unwrap());
            assert_eq!(page.venue_card_count().unwrap(), 5);
        }

        #[test]
        fn test_no_op_click_is_not_a_change() {
            let mut app =
                FakeMapApp::new(table()).with(FakeNode::new(Target::FilterOptions, "Fitness"));
            cards(&mut app, 5);
            let mut page = page(app);
            let options = page.table().locator(Target::FilterOptions);
            assert!(!page.detect_change_after_action(&options).unwrap());
        }

        #[test]
        fn test_missing_target_is_not_a_change() {
            let mut page = page(FakeMapApp::new(table()));
            let options = page.table().locator(Target::FilterOptions);
            assert!(!page.detect_change_after_action(&options).unwrap());
        }

        #[test]
        fn test_first_effective_filter_skips_no_ops() {
            let mut app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterHeader, "Filters"))
                .with(FakeNode::new(Target::FilterOptions, "Beach"))
                .with(
                    FakeNode::new(Target::FilterOptions, "Fitness").on_click(FakeEffect::SetCount {
                        target: Target::Markers,
                        count: 1,
                    }),
                );
            cards(&mut app, 5);
            let mut page = page(app);
            assert_eq!(
                page.apply_first_effective_filter().unwrap().as_deref(),
                Some("Fitness")
            );
            assert_eq!(page.driver().clicks().len(), 2);
        }

        #[test]
        fn test_first_effective_filter_none_when_all_no_ops() {
            let app = FakeMapApp::new(table())
                .with(FakeNode::new(Target::FilterHeader, "Filters"))
                .with(FakeNode::new(Target::FilterOptions, "Beach"));
            assert_eq!(page(app).apply_first_effective_filter().unwrap(), None);
        }
    }
}
