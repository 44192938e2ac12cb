//! Result and error types for Venue Probe.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while probing the application
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Driver-level failure (protocol, session, script evaluation)
    #[error("Driver error: {message}")]
    DriverError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element detached from the DOM since it was located
    #[error("Element {id} is stale (detached from the page)")]
    StaleElement {
        /// Element handle id
        id: String,
    },

    /// Element exists but refused the interaction
    #[error("Element {id} is not interactable: {message}")]
    NotInteractable {
        /// Element handle id
        id: String,
        /// Error message
        message: String,
    },

    /// Every click strategy failed on the same element
    #[error("Click on {target} failed with every strategy: {attempts}")]
    ClickFailed {
        /// Human-readable target description
        target: String,
        /// Per-strategy failure summary
        attempts: String,
    },

    /// Bounded wait expired
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was being awaited
        waited_for: String,
    },

    /// Neither the requested nor the fallback city is offered
    #[error("No viable city: neither requested '{requested}' nor fallback '{fallback}' is available")]
    NoViableCity {
        /// City asked for (may be empty)
        requested: String,
        /// Fallback city
        fallback: String,
    },

    /// A filter chip could not be found
    #[error("Filter option '{label}' not found")]
    FilterNotFound {
        /// Chip label
        label: String,
    },

    /// Locator table could not be loaded or validated
    #[error("Locator table error: {message}")]
    LocatorTable {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::DriverError {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether the error is a setup precondition that retrying cannot fix
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoViableCity { .. } | Self::LocatorTable { .. } | Self::BrowserLaunchError { .. }
        )
    }

    /// Whether the error came from the element going away or refusing input
    #[must_use]
    pub const fn is_transient_interaction(&self) -> bool {
        matches!(self, Self::StaleElement { .. } | Self::NotInteractable { .. })
    }
}
