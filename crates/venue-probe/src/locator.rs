//! Locator table: semantic targets mapped to selector strategies.
//!
//! # Design Philosophy
//!
//! - **One table**: every call site names a [`Target`]; selectors live in a
//!   versioned YAML document, so markup drift is fixed in one place
//! - **Best effort**: selectors for a selector-unstable SPA are deliberately
//!   broad; the interaction core treats every match as a candidate, not a fact
//! - **Fluent API**: `table.locator(Target::FilterChip).with_text("Abu Dhabi")`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::result::{ProbeError, ProbeResult};

/// Schema version of the locator table understood by this crate
pub const LOCATOR_TABLE_VERSION: u32 = 1;

/// Locator table shipped with the crate
const EMBEDDED_TABLE: &str = include_str!("../locators/map_page.yaml");

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    #[serde(rename = "xpath")]
    XPath(String),
    /// Any element whose text content contains the string, ancestors included
    Text(String),
    /// Combined selector with text filter
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// JavaScript expression evaluating to an array of matching elements in
    /// document order
    #[must_use]
    pub fn to_collect_script(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({}))", js_string(s)),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()",
                js_string(s)
            ),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('body *')).filter(el => \
                 el.textContent.replace(/\\s+/g, ' ').includes({}))",
                js_string(t)
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({})).filter(el => el.textContent.includes({}))",
                js_string(css),
                js_string(text)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::CssWithText { css, text } => write!(f, "css={css} text={text}"),
        }
    }
}

/// Quote a string as a JavaScript literal
pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

/// Semantic targets on the map page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// "Filter your search" panel heading; also the page-load anchor
    FilterHeader,
    /// Button that opens the filter panel in compact layouts
    FiltersButton,
    /// "Clear filters" control
    ClearFilters,
    /// Loading indicator text
    LoadingMessage,
    /// Error text ("unable", "something went wrong")
    ErrorMessage,
    /// No-results text
    NoResultsMessage,
    /// Venue result cards
    VenueCards,
    /// Map marker-like elements
    Markers,
    /// "Show N venues" call-to-action
    ShowVenuesButton,
    /// "Show 0 venues" call-to-action
    ShowZeroVenuesButton,
    /// "0 ... venues" header of the empty state
    ZeroVenuesHeader,
    /// Apology sentence of the empty state
    ZeroVenuesApology,
    /// Headings and name-like nodes carrying venue text
    VenueTitles,
    /// Clickable filter options (cities, categories, tags)
    FilterOptions,
    /// Base selector for one filter chip, narrowed by label
    FilterChip,
}

impl Target {
    /// Every target a complete table must define
    pub const ALL: [Self; 15] = [
        Self::FilterHeader,
        Self::FiltersButton,
        Self::ClearFilters,
        Self::LoadingMessage,
        Self::ErrorMessage,
        Self::NoResultsMessage,
        Self::VenueCards,
        Self::Markers,
        Self::ShowVenuesButton,
        Self::ShowZeroVenuesButton,
        Self::ZeroVenuesHeader,
        Self::ZeroVenuesApology,
        Self::VenueTitles,
        Self::FilterOptions,
        Self::FilterChip,
    ];

    /// Table key for this target
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::FilterHeader => "filter_header",
            Self::FiltersButton => "filters_button",
            Self::ClearFilters => "clear_filters",
            Self::LoadingMessage => "loading_message",
            Self::ErrorMessage => "error_message",
            Self::NoResultsMessage => "no_results_message",
            Self::VenueCards => "venue_cards",
            Self::Markers => "markers",
            Self::ShowVenuesButton => "show_venues_button",
            Self::ShowZeroVenuesButton => "show_zero_venues_button",
            Self::ZeroVenuesHeader => "zero_venues_header",
            Self::ZeroVenuesApology => "zero_venues_apology",
            Self::VenueTitles => "venue_titles",
            Self::FilterOptions => "filter_options",
            Self::FilterChip => "filter_chip",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A resolved locator: what is being looked for and how to find it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    target: Target,
    selector: Selector,
    label: Option<String>,
}

impl Locator {
    /// Create a locator for a target
    #[must_use]
    pub const fn new(target: Target, selector: Selector) -> Self {
        Self {
            target,
            selector,
            label: None,
        }
    }

    /// Filter by text content
    ///
    /// Only CSS selectors can be narrowed; other strategies keep their
    /// original selector and only record the label.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        let selector = match self.selector {
            Selector::Css(css) => Selector::CssWithText {
                css,
                text: text.clone(),
            },
            other => other,
        };
        Self {
            target: self.target,
            selector,
            label: Some(text),
        }
    }

    /// Semantic target
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Underlying selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Label this locator was narrowed by, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} '{}'", self.target, label),
            None => write!(f, "{}", self.target),
        }
    }
}

/// Versioned mapping from semantic targets to selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorTable {
    /// Schema version
    pub version: u32,
    /// Selector per target, written as `strategy: pattern` maps
    #[serde(with = "serde_yaml_ng::with::singleton_map_recursive")]
    pub targets: BTreeMap<Target, Selector>,
    /// Labels never treated as filter options (substring match)
    #[serde(default)]
    pub option_exclusions: Vec<String>,
    /// Labels never treated as filter options (whole-label match)
    #[serde(default)]
    pub option_exact_exclusions: Vec<String>,
}

impl LocatorTable {
    /// Load the table shipped with the crate
    pub fn embedded() -> ProbeResult<Self> {
        Self::from_yaml_str(EMBEDDED_TABLE)
    }

    /// Parse and validate a table from YAML text
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let table: Self = serde_yaml_ng::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a YAML file
    pub fn from_file(path: &Path) -> ProbeResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check version and completeness
    pub fn validate(&self) -> ProbeResult<()> {
        if self.version != LOCATOR_TABLE_VERSION {
            return Err(ProbeError::LocatorTable {
                message: format!(
                    "unsupported version {} (expected {LOCATOR_TABLE_VERSION})",
                    self.version
                ),
            });
        }
        let missing: Vec<&str> = Target::ALL
            .iter()
            .filter(|t| !self.targets.contains_key(t))
            .map(Target::key)
            .collect();
        if !missing.is_empty() {
            return Err(ProbeError::LocatorTable {
                message: format!("missing targets: {}", missing.join(", ")),
            });
        }
        Ok(())
    }

    /// Locator for a target.
    ///
    /// Validated tables define every target; an unvalidated table missing the
    /// target falls back to a selector that matches nothing.
    #[must_use]
    pub fn locator(&self, target: Target) -> Locator {
        let selector = self
            .targets
            .get(&target)
            .cloned()
            .unwrap_or_else(|| Selector::css(":not(*)"));
        Locator::new(target, selector)
    }

    /// Locator for the filter chip carrying `label`
    #[must_use]
    pub fn filter_chip(&self, label: &str) -> Locator {
        self.locator(Target::FilterChip).with_text(label)
    }

    /// Whether a control label is excluded from filter options
    #[must_use]
    pub fn is_excluded_option(&self, label: &str) -> bool {
        let label = label.trim();
        self.option_exact_exclusions.iter().any(|excluded| excluded.as_str() == label)
            || self
                .option_exclusions
                .iter()
                .any(|excluded| label.contains(excluded.as_str()))
    }

    /// Replace the selector for one target
    pub fn set(&mut self, target: Target, selector: Selector) {
        let _ = self.targets.insert(target, selector);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_collect_script_quotes_selector() {
            let script = Selector::css("a[title=\"x\"]").to_collect_script();
            assert!(script.starts_with("Array.from(document.querySelectorAll("));
            assert!(script.contains(r#""a[title=\"x\"]""#));
        }

        #[test]
        fn test_xpath_collect_script_uses_snapshot() {
            let script = Selector::xpath("//button").to_collect_script();
            assert!(script.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
            assert!(script.contains("\"//button\""));
        }

        #[test]
        fn test_css_with_text_filters_text_content() {
            let sel = Selector::CssWithText {
                css: "button".into(),
                text: "Abu Dhabi".into(),
            };
            let script = sel.to_collect_script();
            assert!(script.contains("textContent.includes(\"Abu Dhabi\")"));
        }

        #[test]
        fn test_text_collect_script_matches_ancestors() {
            let script = Selector::text("Sorry, there are no venues").to_collect_script();
            assert!(!script.contains("childElementCount"));
            assert!(script.contains("includes(\"Sorry, there are no venues\")"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("div").to_string(), "css=div");
            assert_eq!(Selector::text("hi").to_string(), "text=hi");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_with_text_narrows_css() {
            let loc = Locator::new(Target::FilterChip, Selector::css("button")).with_text("Fitness");
            assert_eq!(
                loc.selector(),
                &Selector::CssWithText {
                    css: "button".into(),
                    text: "Fitness".into()
                }
            );
            assert_eq!(loc.label(), Some("Fitness"));
            assert_eq!(loc.to_string(), "filter_chip 'Fitness'");
        }

        #[test]
        fn test_with_text_keeps_xpath() {
            let loc = Locator::new(Target::FilterChip, Selector::xpath("//button")).with_text("x");
            assert_eq!(loc.selector(), &Selector::xpath("//button"));
            assert_eq!(loc.label(), Some("x"));
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_embedded_table_is_complete() {
            let table = LocatorTable::embedded().unwrap();
            assert_eq!(table.version, LOCATOR_TABLE_VERSION);
            for target in Target::ALL {
                assert!(table.targets.contains_key(&target), "missing {target}");
            }
        }

        #[test]
        fn test_embedded_table_exclusions() {
            let table = LocatorTable::embedded().unwrap();
            assert!(table.is_excluded_option("Clear filters"));
            assert!(table.is_excluded_option("Show 12 venues"));
            assert!(!table.is_excluded_option("Fitness"));
        }

        #[test]
        fn test_filters_toggle_excluded_by_whole_label() {
            let table = LocatorTable::embedded().unwrap();
            assert!(table.is_excluded_option("Filters"));
            assert!(table.is_excluded_option(" Filters "));
            assert!(!table.is_excluded_option("Filters for families"));
            assert!(!table.is_excluded_option("Pet filters"));
        }

        #[test]
        fn test_embedded_table_parses() {
            assert!(LocatorTable::embedded().is_ok());
        }

        #[test]
        fn test_strategy_maps_parse() {
            let mut yaml = String::from("version: 1\ntargets:\n");
            for target in Target::ALL {
                let entry = match target {
                    Target::ZeroVenuesApology => "    text: Sorry\n".to_string(),
                    Target::FilterOptions => "    xpath: //button\n".to_string(),
                    Target::VenueCards => {
                        "    css_with_text:\n      css: div\n      text: Spa\n".to_string()
                    }
                    other => format!("    css: \"#{}\"\n", other.key()),
                };
                yaml.push_str(&format!("  {}:\n{entry}", target.key()));
            }
            let table = LocatorTable::from_yaml_str(&yaml).unwrap();
            assert_eq!(table.locator(Target::ZeroVenuesApology).selector(), &Selector::text("Sorry"));
            assert_eq!(table.locator(Target::FilterOptions).selector(), &Selector::xpath("//button"));
            assert_eq!(
                table.locator(Target::VenueCards).selector(),
                &Selector::CssWithText {
                    css: "div".into(),
                    text: "Spa".into()
                }
            );
            assert_eq!(table.locator(Target::Markers).selector(), &Selector::css("#markers"));
        }

        #[test]
        fn test_filter_chip_locator() {
            let table = LocatorTable::embedded().unwrap();
            let chip = table.filter_chip("Abu Dhabi");
            assert_eq!(chip.target(), Target::FilterChip);
            assert_eq!(
                chip.selector(),
                &Selector::CssWithText {
                    css: "button".into(),
                    text: "Abu Dhabi".into()
                }
            );
        }

        #[test]
        fn test_wrong_version_rejected() {
            let yaml = "version: 99\ntargets: {}\n";
            let err = LocatorTable::from_yaml_str(yaml).unwrap_err();
            assert!(err.to_string().contains("unsupported version 99"));
        }

        #[test]
        fn test_missing_targets_reported() {
            let yaml = "version: 1\ntargets:\n  filter_header:\n    css: h2\n";
            let err = LocatorTable::from_yaml_str(yaml).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("missing targets"));
            assert!(msg.contains("venue_cards"));
            assert!(!msg.contains("filter_header,"));
        }

        #[test]
        fn test_yaml_roundtrip_preserves_table() {
            let table = LocatorTable::embedded().unwrap();
            let yaml = table.to_yaml().unwrap();
            assert_eq!(LocatorTable::from_yaml_str(&yaml).unwrap(), table);
        }

        #[test]
        fn test_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("table.yaml");
            let mut table = LocatorTable::embedded().unwrap();
            table.set(Target::VenueCards, Selector::css("[data-testid='venue']"));
            std::fs::write(&path, table.to_yaml().unwrap()).unwrap();

            let loaded = LocatorTable::from_file(&path).unwrap();
            assert_eq!(
                loaded.locator(Target::VenueCards).selector(),
                &Selector::css("[data-testid='venue']")
            );
        }
    }
}
