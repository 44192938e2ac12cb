//! In-memory map application for exercising the interaction core without a
//! browser.
//!
//! Nodes are tagged with the semantic [`Target`]s they would match in the
//! real page. Selectors are resolved through the same [`LocatorTable`] the
//! page object uses, so a test drives exactly the lookups production code
//! performs. Clicks can be rejected per strategy and can trigger scripted
//! effects (CTA text changes, state messages appearing, cards re-rendering).

use crate::click::{ClickMode, SCRIPTED_CLICK};
use crate::driver::{ElementHandle, UiDriver};
use crate::locator::{LocatorTable, Selector, Target};
use crate::result::{ProbeError, ProbeResult};
use std::cell::RefCell;
use std::time::Duration;

/// Minimal PNG signature returned as the fake screenshot
const FAKE_PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Scripted consequence of clicking a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeEffect {
    /// Replace the text of the first live node matching the target
    SetText {
        /// Node to update
        target: Target,
        /// New text
        text: String,
    },
    /// Make every node matching the target present
    Reveal(Target),
    /// Remove every node matching the target; existing handles go stale
    Remove(Target),
    /// Re-render the target as `count` fresh nodes; old handles go stale
    SetCount {
        /// Target to re-render
        target: Target,
        /// Number of nodes after re-render
        count: usize,
    },
    /// Let the first live node of `target` also match `extra`
    Tag {
        /// Node to tag
        target: Target,
        /// Additional target it now matches
        extra: Target,
    },
}

/// One scripted DOM node
#[derive(Debug, Clone)]
pub struct FakeNode {
    targets: Vec<Target>,
    text: String,
    displayed: bool,
    enabled: bool,
    present: bool,
    detached: bool,
    rejects_direct: bool,
    rejects_scripted: bool,
    on_click: Vec<FakeEffect>,
}

impl FakeNode {
    /// Visible, enabled node matching `target`
    #[must_use]
    pub fn new(target: Target, text: impl Into<String>) -> Self {
        Self {
            targets: vec![target],
            text: text.into(),
            displayed: true,
            enabled: true,
            present: true,
            detached: false,
            rejects_direct: false,
            rejects_scripted: false,
            on_click: Vec::new(),
        }
    }

    /// Also match another target
    #[must_use]
    pub fn also(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Rendered but not visible
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Visible but disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Not in the DOM until revealed
    #[must_use]
    pub fn absent(mut self) -> Self {
        self.present = false;
        self
    }

    /// Native clicks fail (overlay, not interactable)
    #[must_use]
    pub fn rejects_direct_click(mut self) -> Self {
        self.rejects_direct = true;
        self
    }

    /// Scripted clicks fail
    #[must_use]
    pub fn rejects_scripted_click(mut self) -> Self {
        self.rejects_scripted = true;
        self
    }

    /// Effect applied after a successful click
    #[must_use]
    pub fn on_click(mut self, effect: FakeEffect) -> Self {
        self.on_click.push(effect);
        self
    }

    fn matches(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    fn is_live(&self) -> bool {
        self.present && !self.detached
    }
}

/// A delivered click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    /// Handle id
    pub id: String,
    /// Node text at click time
    pub label: String,
    /// Delivery mode
    pub mode: ClickMode,
}

/// Scriptable in-memory driver
#[derive(Debug)]
pub struct FakeMapApp {
    table: LocatorTable,
    nodes: Vec<FakeNode>,
    url: String,
    navigation_delay: Duration,
    screenshot_data: Option<Vec<u8>>,
    clicks: Vec<ClickRecord>,
    call_history: RefCell<Vec<String>>,
}

impl FakeMapApp {
    /// Empty page resolved through `table`
    #[must_use]
    pub fn new(table: LocatorTable) -> Self {
        Self {
            table,
            nodes: Vec::new(),
            url: String::from("about:blank"),
            navigation_delay: Duration::ZERO,
            screenshot_data: Some(FAKE_PNG.to_vec()),
            clicks: Vec::new(),
            call_history: RefCell::new(Vec::new()),
        }
    }

    /// A populated map page: filter panel, five filter options, a CTA,
    /// five venue cards and markers.
    ///
    /// Selecting "Abu Dhabi", then "Fitness", then "Recovery" drives the CTA
    /// to "Show 0 venues"; clicking the CTA at zero reveals the empty state.
    #[must_use]
    pub fn sample(table: LocatorTable) -> Self {
        let cta_to = |n: u32| FakeEffect::SetText {
            target: Target::ShowVenuesButton,
            text: format!("Show {n} venues"),
        };
        let mut app = Self::new(table)
            .with(FakeNode::new(Target::FilterHeader, "Filter your search"))
            .with(
                FakeNode::new(Target::FilterOptions, "Abu Dhabi")
                    .on_click(cta_to(18))
                    .on_click(FakeEffect::SetCount {
                        target: Target::VenueCards,
                        count: 3,
                    }),
            )
            .with(FakeNode::new(Target::FilterOptions, "Dubai").on_click(cta_to(24)))
            .with(FakeNode::new(Target::FilterOptions, "Fitness").on_click(cta_to(6)))
            .with(
                FakeNode::new(Target::FilterOptions, "Recovery")
                    .on_click(cta_to(0))
                    .on_click(FakeEffect::Tag {
                        target: Target::ShowVenuesButton,
                        extra: Target::ShowZeroVenuesButton,
                    }),
            )
            .with(FakeNode::new(Target::FilterOptions, "Beach").on_click(cta_to(2)))
            .with(FakeNode::new(Target::ClearFilters, "Clear filters").absent())
            .with(
                FakeNode::new(Target::ShowVenuesButton, "Show 42 venues")
                    .on_click(FakeEffect::Reveal(Target::ZeroVenuesHeader))
                    .on_click(FakeEffect::Reveal(Target::ZeroVenuesApology)),
            )
            .with(FakeNode::new(Target::ZeroVenuesHeader, "0 venues").absent())
            .with(
                FakeNode::new(
                    Target::ZeroVenuesApology,
                    "Sorry, there are no venues matching your search and filters.",
                )
                .absent(),
            );
        app.set_count(Target::VenueCards, 5);
        app.set_count(Target::Markers, 5);
        for name in ["Saadiyat Beach Club", "Yas Fitness", "Marina Spa"] {
            app.push(FakeNode::new(Target::VenueTitles, name));
        }
        app
    }

    /// Add a node (builder form)
    #[must_use]
    pub fn with(mut self, node: FakeNode) -> Self {
        self.push(node);
        self
    }

    /// Add a node
    pub fn push(&mut self, node: FakeNode) {
        self.nodes.push(node);
    }

    /// Delay every navigation by `delay`
    #[must_use]
    pub const fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Make screenshots fail
    #[must_use]
    pub fn without_screenshots(mut self) -> Self {
        self.screenshot_data = None;
        self
    }

    /// Locator table used to resolve selectors
    #[must_use]
    pub const fn table(&self) -> &LocatorTable {
        &self.table
    }

    /// Clicks delivered so far
    #[must_use]
    pub fn clicks(&self) -> &[ClickRecord] {
        &self.clicks
    }

    /// Labels of delivered clicks, in order
    #[must_use]
    pub fn clicked_labels(&self) -> Vec<String> {
        self.clicks.iter().map(|c| c.label.clone()).collect()
    }

    /// Call history for verification
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history.borrow().clone()
    }

    /// Check if a method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history
            .borrow()
            .iter()
            .any(|c| c.starts_with(method))
    }

    /// Whether `find_all` was ever asked for this selector
    #[must_use]
    pub fn was_queried(&self, selector: &Selector) -> bool {
        let entry = format!("find_all:{selector}");
        self.call_history.borrow().iter().any(|c| *c == entry)
    }

    /// Number of live nodes matching `target`
    #[must_use]
    pub fn count(&self, target: Target) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.is_live() && n.matches(target))
            .count()
    }

    /// Apply an effect directly, as if the application re-rendered on its own
    pub fn apply(&mut self, effect: &FakeEffect) {
        match effect {
            FakeEffect::SetText { target, text } => {
                if let Some(node) = self
                    .nodes
                    .iter_mut()
                    .find(|n| n.is_live() && n.matches(*target))
                {
                    node.text.clone_from(text);
                }
            }
            FakeEffect::Reveal(target) => {
                for node in self
                    .nodes
                    .iter_mut()
                    .filter(|n| !n.detached && n.matches(*target))
                {
                    node.present = true;
                }
            }
            FakeEffect::Remove(target) => {
                for node in self.nodes.iter_mut().filter(|n| n.matches(*target)) {
                    node.present = false;
                }
            }
            FakeEffect::SetCount { target, count } => self.set_count(*target, *count),
            FakeEffect::Tag { target, extra } => {
                if let Some(node) = self
                    .nodes
                    .iter_mut()
                    .find(|n| n.is_live() && n.matches(*target))
                {
                    if !node.matches(*extra) {
                        node.targets.push(*extra);
                    }
                }
            }
        }
    }

    fn set_count(&mut self, target: Target, count: usize) {
        for node in self.nodes.iter_mut().filter(|n| n.matches(target)) {
            node.detached = true;
        }
        for i in 0..count {
            self.nodes
                .push(FakeNode::new(target, format!("{target} {}", i + 1)));
        }
    }

    fn record(&self, entry: String) {
        self.call_history.borrow_mut().push(entry);
    }

    fn index_of(handle: &ElementHandle) -> Option<usize> {
        handle.id.strip_prefix('n')?.parse().ok()
    }

    fn node(&self, handle: &ElementHandle) -> ProbeResult<&FakeNode> {
        Self::index_of(handle)
            .and_then(|i| self.nodes.get(i))
            .filter(|n| n.is_live())
            .ok_or_else(|| ProbeError::StaleElement {
                id: handle.id.clone(),
            })
    }

    fn targets_for(&self, selector: &Selector) -> Vec<Target> {
        self.table
            .targets
            .iter()
            .filter(|(_, s)| *s == selector)
            .map(|(t, _)| *t)
            .collect()
    }

    fn deliver_click(&mut self, handle: &ElementHandle, mode: ClickMode) -> ProbeResult<()> {
        let node = self.node(handle)?;
        let rejected = match mode {
            ClickMode::Direct => node.rejects_direct || !node.displayed || !node.enabled,
            ClickMode::Scripted => node.rejects_scripted,
        };
        if rejected {
            return Err(ProbeError::NotInteractable {
                id: handle.id.clone(),
                message: format!("{mode} click rejected"),
            });
        }
        let label = node.text.clone();
        let effects = node.on_click.clone();
        self.clicks.push(ClickRecord {
            id: handle.id.clone(),
            label,
            mode,
        });
        for effect in &effects {
            self.apply(effect);
        }
        Ok(())
    }
}

impl UiDriver for FakeMapApp {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.record(format!("navigate:{url}"));
        if !self.navigation_delay.is_zero() {
            std::thread::sleep(self.navigation_delay);
        }
        self.url = url.to_string();
        Ok(())
    }

    fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        self.record(format!("find_all:{selector}"));

        let chip_base = self.table.targets.get(&Target::FilterChip);
        let handles = match selector {
            Selector::CssWithText { css, text }
                if chip_base == Some(&Selector::Css(css.clone())) =>
            {
                self.nodes
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| {
                        n.is_live()
                            && n.matches(Target::FilterOptions)
                            && n.text.contains(text.as_str())
                    })
                    .map(|(i, _)| ElementHandle::new(format!("n{i}")))
                    .collect()
            }
            _ => {
                let targets = self.targets_for(selector);
                self.nodes
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| n.is_live() && targets.iter().any(|t| n.matches(*t)))
                    .map(|(i, _)| ElementHandle::new(format!("n{i}")))
                    .collect()
            }
        };
        Ok(handles)
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.node(element)?.displayed)
    }

    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.node(element)?.enabled)
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        Ok(self.node(element)?.text.clone())
    }

    fn click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.record(format!("click:{}", element.id));
        self.deliver_click(element, ClickMode::Direct)
    }

    fn execute_script(
        &mut self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value> {
        self.record(format!("execute_script:{script}"));
        match args {
            [element] if script == SCRIPTED_CLICK => {
                self.deliver_click(element, ClickMode::Scripted)?;
                Ok(serde_json::Value::Null)
            }
            _ => Ok(serde_json::Value::Null),
        }
    }

    fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        self.record("screenshot".to_string());
        self.screenshot_data
            .clone()
            .ok_or_else(|| ProbeError::ScreenshotError {
                message: "no screenshot available".to_string(),
            })
    }

    fn current_url(&self) -> ProbeResult<String> {
        Ok(self.url.clone())
    }
}
