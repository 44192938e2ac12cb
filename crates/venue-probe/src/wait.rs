//! Wait Mechanisms
//!
//! Bounded polling against a condition with a hard ceiling, plus the fixed
//! settle delay paired with every action.
//!
//! The target application exposes no idle signal, so there is no
//! "network idle" or "load event" state here: a wait either observes its
//! condition before the deadline or fails with a description of what it was
//! waiting for.

use crate::result::{ProbeError, ProbeResult};
use std::time::{Duration, Instant};

/// Default timeout for wait operations (20 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 20_000;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the condition was evaluated
    pub polls: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Waiter for synchronization operations
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with custom options
    #[must_use]
    pub const fn new(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `predicate` until it holds or the timeout expires.
    ///
    /// The predicate is evaluated at least once, even with a zero timeout.
    /// Stale or non-interactable element errors count as "not yet"; any
    /// other error aborts the wait.
    pub fn until<F>(&self, waited_for: &str, mut predicate: F) -> ProbeResult<WaitResult>
    where
        F: FnMut() -> ProbeResult<bool>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let mut polls = 0u32;

        loop {
            polls += 1;
            match predicate() {
                Ok(true) => {
                    return Ok(WaitResult {
                        elapsed: start.elapsed(),
                        polls,
                        waited_for: waited_for.to_string(),
                    });
                }
                Ok(false) => {}
                Err(e) if e.is_transient_interaction() => {
                    tracing::debug!(error = %e, "transient error while waiting for {waited_for}");
                }
                Err(e) => return Err(e),
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(ProbeError::Timeout {
                    ms: self.options.timeout_ms,
                    waited_for: waited_for.to_string(),
                });
            }
            std::thread::sleep(self.options.poll_interval().min(timeout - elapsed));
        }
    }
}

/// Wait for a condition with a given timeout and default polling
pub fn wait_until<F>(waited_for: &str, timeout_ms: u64, predicate: F) -> ProbeResult<WaitResult>
where
    F: FnMut() -> ProbeResult<bool>,
{
    Waiter::new(WaitOptions::new().with_timeout(timeout_ms)).until(waited_for, predicate)
}

/// Fixed settle delay after an action.
///
/// Not an idle detector: the application offers none, so this is a bounded
/// trade-off between flakiness and run time.
pub fn settle(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
