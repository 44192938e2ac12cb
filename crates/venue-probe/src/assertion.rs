//! Assertions for scenario checks.
//!
//! Every failure message names what was expected and what was observed.

use std::fmt::Debug;
use std::time::Duration;

use crate::result::{ProbeError, ProbeResult};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Turn a failure into [`ProbeError::AssertionFailed`]
    pub fn into_result(self) -> ProbeResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(ProbeError::assertion(self.message))
        }
    }
}

/// Assertion helpers for scenarios
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug>(what: &str, expected: &T, actual: &T) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{what}: expected {expected:?}, observed {actual:?}"))
        }
    }

    /// Assert a condition holds
    #[must_use]
    pub fn is_true(condition: bool, expected: &str, observed: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {expected}, observed {observed}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(what: &str, haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "{what}: expected text containing '{needle}', observed '{haystack}'"
            ))
        }
    }

    /// Assert an Option holds non-blank text
    #[must_use]
    pub fn not_blank(what: &str, text: Option<&str>) -> AssertionResult {
        match text {
            Some(t) if !t.trim().is_empty() => AssertionResult::pass(),
            Some(t) => AssertionResult::fail(format!("{what}: expected text, observed '{t}'")),
            None => AssertionResult::fail(format!("{what}: expected text, observed nothing")),
        }
    }

    /// Assert a duration stays under a ceiling
    #[must_use]
    pub fn within(what: &str, elapsed: Duration, ceiling: Duration) -> AssertionResult {
        if elapsed <= ceiling {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "{what}: expected at most {}ms, observed {}ms",
                ceiling.as_millis(),
                elapsed.as_millis()
            ))
        }
    }
}
