//! Point-in-time UI state observations.
//!
//! A [`UiSnapshot`] is derived, never stored across actions: it is only
//! meaningful right after an action plus a settle delay, and even then it is
//! a best-effort read of an application that keeps rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Venue count parsed from the "Show N venues" call-to-action.
///
/// `Unknown` is never zero: a counter that could not be read must not be
/// mistaken for an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaCount {
    /// Digits were found in the label
    Known(u32),
    /// No legible digits
    Unknown,
}

impl CtaCount {
    /// Parse every digit of the label as one number ("Show 1,204 venues" is
    /// 1204).
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let digits: String = label.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self::Unknown;
        }
        digits.parse().map_or(Self::Unknown, Self::Known)
    }

    /// Exactly zero results
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        matches!(self, Self::Known(0))
    }

    /// Count, if legible
    #[must_use]
    pub const fn known(&self) -> Option<u32> {
        match self {
            Self::Known(n) => Some(*n),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for CtaCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Observations taken together at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSnapshot {
    /// Filter panel anchor visible
    pub filter_panel_visible: bool,
    /// Loading indicator visible
    pub loading: bool,
    /// Error message visible
    pub error: bool,
    /// No-results message visible
    pub no_results: bool,
    /// "Clear filters" control visible
    pub clear_filters_visible: bool,
    /// Venue card count
    pub venue_cards: usize,
    /// Marker-like element count
    pub markers: usize,
    /// Raw CTA text, if a CTA is visible
    pub cta_label: Option<String>,
    /// Parsed CTA count
    pub cta_count: CtaCount,
}

impl UiSnapshot {
    /// Cards or markers are rendered
    #[must_use]
    pub const fn shows_data(&self) -> bool {
        self.venue_cards > 0 || self.markers > 0
    }

    /// An explicit loading, error or no-results message is shown
    #[must_use]
    pub const fn shows_state_message(&self) -> bool {
        self.loading || self.error || self.no_results
    }

    /// Neither data nor any feedback (state message or "Clear filters"):
    /// the page went blank
    #[must_use]
    pub const fn is_silently_empty(&self) -> bool {
        !self.shows_data() && !self.shows_state_message() && !self.clear_filters_visible
    }

    /// Whether an action between `before` and `self` had a visible effect.
    ///
    /// True when card or marker counts differ, or when the clear-filters
    /// control, no-results, error or loading state became visible.
    #[must_use]
    pub const fn differs_from(&self, before: &Self) -> bool {
        let counts_changed =
            self.venue_cards != before.venue_cards || self.markers != before.markers;
        let newly_visible = (!before.clear_filters_visible && self.clear_filters_visible)
            || (!before.no_results && self.no_results)
            || (!before.error && self.error)
            || (!before.loading && self.loading);
        counts_changed || newly_visible
    }
}

impl fmt::Display for UiSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "panel={} loading={} error={} no_results={} clear={} cards={} markers={} cta={}",
            self.filter_panel_visible,
            self.loading,
            self.error,
            self.no_results,
            self.clear_filters_visible,
            self.venue_cards,
            self.markers,
            self.cta_count
        )
    }
}
