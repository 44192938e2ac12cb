//! UiDriver - Abstract Browser Automation Trait
//!
//! The interaction core never talks to a concrete browser. It depends on the
//! synchronous contract below, which the CDP adapter (`browser` feature) and
//! the in-memory [`FakeMapApp`](crate::FakeMapApp) both implement.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  UiDriver (object-safe, blocking)                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  navigate · find_all · is_displayed · is_enabled · text      │
//! │  click · execute_script · screenshot · current_url           │
//! ├──────────────────────┬───────────────────────────────────────┤
//! │  CdpDriver           │  FakeMapApp                           │
//! │  chromiumoxide on an │  scripted nodes, click effects,       │
//! │  owned tokio runtime │  failure injection, call history      │
//! └──────────────────────┴───────────────────────────────────────┘
//! ```

use crate::locator::Selector;
use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to one DOM node found by [`UiDriver::find_all`].
///
/// Handles can go stale at any time because the application re-renders
/// asynchronously; every query through a handle may fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-specific identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.id)
    }
}

/// Abstract driver trait for browser automation.
///
/// Execution is strictly sequential: one session drives one scenario, so
/// the trait is synchronous and takes `&mut self` only for operations that
/// mutate the page.
pub trait UiDriver {
    /// Navigate to URL
    fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// All nodes matching the selector, in document order
    fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>>;

    /// Whether the node is rendered and visible
    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Whether the node accepts input
    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Visible text of the node
    fn text(&self, element: &ElementHandle) -> ProbeResult<String>;

    /// Native (pointer-level) click
    fn click(&mut self, element: &ElementHandle) -> ProbeResult<()>;

    /// Execute a script in page context; elements are bound to `arguments[i]`
    fn execute_script(
        &mut self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value>;

    /// PNG screenshot of the viewport
    fn screenshot(&self) -> ProbeResult<Vec<u8>>;

    /// Current URL
    fn current_url(&self) -> ProbeResult<String>;
}

impl<D: UiDriver + ?Sized> UiDriver for Box<D> {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        (**self).navigate(url)
    }

    fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        (**self).find_all(selector)
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        (**self).is_displayed(element)
    }

    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        (**self).is_enabled(element)
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        (**self).text(element)
    }

    fn click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        (**self).click(element)
    }

    fn execute_script(
        &mut self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value> {
        (**self).execute_script(script, args)
    }

    fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        (**self).screenshot()
    }

    fn current_url(&self) -> ProbeResult<String> {
        (**self).current_url()
    }
}

/// Browser configuration for driver adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Executable path override
    pub executable_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1400,
            viewport_height: 900,
            executable_path: None,
            sandbox: true,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set executable path
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}
