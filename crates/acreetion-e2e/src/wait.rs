//! Retry-until-timeout polling for page conditions.
//!
//! Every assertion auto-waits: the page is re-probed on an interval until
//! the expectation holds or the budget runs out. Synchronization with
//! client-side rendering lives here, never in the case tables - cases hold
//! no sleeps.

use crate::dom::ElementSnapshot;
use crate::driver::PageDriver;
use crate::expect::Expectation;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use regex::Regex;
use std::time::Duration;
use tokio::time::Instant;

/// Default per-assertion wait budget (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total budget for one assertion
    pub timeout: Duration,
    /// Interval between probes
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Budget in whole milliseconds, for error messages
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Evaluates expectations against a page with auto-retry
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with the given options
    #[must_use]
    pub const fn new(options: WaitOptions) -> Self {
        Self { options }
    }

    /// The options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait until `expectation` holds for `locator`, or classify the failure.
    ///
    /// Transport and evaluation errors propagate immediately; only the
    /// assertion outcome is retried.
    pub async fn expect_element<P>(
        &self,
        page: &mut P,
        locator: &Locator,
        expectation: &Expectation,
    ) -> E2eResult<()>
    where
        P: PageDriver + ?Sized,
    {
        let start = Instant::now();
        let mut outcome;
        loop {
            let snapshot: ElementSnapshot = page.probe(locator).await?;
            outcome = expectation.check(&snapshot);
            if outcome.is_pass() {
                return Ok(());
            }
            if start.elapsed() >= self.options.timeout {
                break;
            }
            tracing::trace!(
                selector = %locator.describe(),
                expectation = %expectation.describe(),
                ?outcome,
                "assertion not satisfied yet, retrying"
            );
            tokio::time::sleep(self.options.poll_interval).await;
        }
        match outcome.into_failure(&locator.describe(), self.options.timeout_ms()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Wait until the element exists and is visible, then click it.
    pub async fn click<P>(&self, page: &mut P, locator: &Locator) -> E2eResult<()>
    where
        P: PageDriver + ?Sized,
    {
        self.expect_element(page, locator, &Expectation::Visible)
            .await?;
        page.click(locator).await
    }

    /// Wait until the document title matches the regex `pattern`.
    pub async fn expect_title<P>(&self, page: &mut P, pattern: &str) -> E2eResult<()>
    where
        P: PageDriver + ?Sized,
    {
        let regex = Regex::new(pattern).map_err(|e| E2eError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let start = Instant::now();
        let mut title;
        loop {
            title = page.title().await?;
            if regex.is_match(&title) {
                return Ok(());
            }
            if start.elapsed() >= self.options.timeout {
                break;
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
        Err(E2eError::Mismatch {
            expected: format!("title matching /{pattern}/"),
            actual: format!("title {title:?}"),
        })
    }
}
