//! Suite configuration.
//!
//! The configuration surface mirrors what the external harness owns per the
//! site's test setup: base URL, default viewport, parallelism, and the
//! per-assertion wait budget. Values come from the builder or from the
//! `E2E_BASE_URL` / `E2E_CHROMIUM_PATH` / `E2E_HEADFUL` environment
//! variables.

use crate::driver::Viewport;
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default number of cases running concurrently
pub const DEFAULT_WORKERS: usize = 4;

/// Default per-assertion wait budget (5 seconds)
pub const DEFAULT_ASSERTION_TIMEOUT_MS: u64 = 5_000;

/// Default whole-case budget (30 seconds)
pub const DEFAULT_CASE_TIMEOUT_MS: u64 = 30_000;

/// Configuration for a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base URL of the running site (paths are joined onto this)
    pub base_url: String,
    /// Run the browser headless
    pub headless: bool,
    /// Chromium sandbox (disable in containers/CI)
    pub sandbox: bool,
    /// Path to a chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Viewport applied when a case does not request one
    pub viewport: Viewport,
    /// Maximum number of cases in flight at once
    pub workers: usize,
    /// Per-assertion wait budget
    pub assertion_timeout: Duration,
    /// Polling interval while waiting on an assertion
    pub poll_interval: Duration,
    /// Budget for a whole case, navigation included
    pub case_timeout: Duration,
    /// Stop the run at the first failing case
    pub fail_fast: bool,
    /// Directory for failure screenshots (None = don't capture)
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            sandbox: true,
            chromium_path: None,
            viewport: Viewport::DESKTOP,
            workers: DEFAULT_WORKERS,
            assertion_timeout: Duration::from_millis(DEFAULT_ASSERTION_TIMEOUT_MS),
            poll_interval: Duration::from_millis(crate::wait::DEFAULT_POLL_INTERVAL_MS),
            case_timeout: Duration::from_millis(DEFAULT_CASE_TIMEOUT_MS),
            fail_fast: false,
            screenshot_dir: None,
        }
    }
}

impl SuiteConfig {
    /// Create a new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config from defaults plus environment overrides.
    ///
    /// Reads `E2E_BASE_URL`, `E2E_CHROMIUM_PATH` and `E2E_HEADFUL`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("E2E_BASE_URL") {
            config.base_url = base;
        }
        if let Ok(path) = std::env::var("E2E_CHROMIUM_PATH") {
            config.chromium_path = Some(path);
        }
        if std::env::var("E2E_HEADFUL").is_ok_and(|v| v != "0") {
            config.headless = false;
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable the chromium sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set the default viewport
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set worker parallelism (clamped to at least one)
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the per-assertion wait budget
    #[must_use]
    pub const fn with_assertion_timeout(mut self, timeout: Duration) -> Self {
        self.assertion_timeout = timeout;
        self
    }

    /// Set the whole-case budget
    #[must_use]
    pub const fn with_case_timeout(mut self, timeout: Duration) -> Self {
        self.case_timeout = timeout;
        self
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Capture a screenshot into `dir` when a case fails
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    /// Join a page path onto the base URL.
    ///
    /// Tolerates a trailing slash on the base and a missing leading slash on
    /// the path.
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }

    /// The wait options every assertion runs under
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: self.assertion_timeout,
            poll_interval: self.poll_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert!(!config.fail_fast);
        assert!(config.screenshot_dir.is_none());
    }

    #[test]
    fn test_builder() {
        let config = SuiteConfig::new()
            .with_base_url("https://acreetionos.org")
            .with_headless(false)
            .with_no_sandbox()
            .with_workers(8)
            .with_fail_fast()
            .with_assertion_timeout(Duration::from_secs(2));

        assert_eq!(config.base_url, "https://acreetionos.org");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.workers, 8);
        assert!(config.fail_fast);
        assert_eq!(config.assertion_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_workers_clamped_to_one() {
        let config = SuiteConfig::new().with_workers(0);
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_page_url_joining() {
        let config = SuiteConfig::new().with_base_url("http://localhost:8080/");
        assert_eq!(config.page_url("/"), "http://localhost:8080/");
        assert_eq!(
            config.page_url("/contact.html"),
            "http://localhost:8080/contact.html"
        );
        assert_eq!(
            config.page_url("install.html"),
            "http://localhost:8080/install.html"
        );
    }

    #[test]
    fn test_wait_options_reflect_config() {
        let config = SuiteConfig::new().with_assertion_timeout(Duration::from_millis(750));
        let options = config.wait_options();
        assert_eq!(options.timeout, Duration::from_millis(750));
        assert_eq!(options.poll_interval, config.poll_interval);
    }
}
