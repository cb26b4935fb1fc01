//! Result and error types for the suite.
//!
//! The failure taxonomy keeps the three assertion outcomes distinct so a
//! report can tell a missing element from a slow page from a wrong value:
//!
//! - [`E2eError::LocatorNotFound`] - selector matched nothing
//! - [`E2eError::Timeout`] - condition never reached within the wait budget
//! - [`E2eError::Mismatch`] - element found, value wrong (actual vs expected)
//!
//! Everything else is infrastructure: those errors abort the whole run
//! instead of failing a single case.

use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving the browser or evaluating checks
#[derive(Debug, Error)]
pub enum E2eError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set E2E_CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page creation error
    #[error("Failed to open page: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// Viewport emulation error
    #[error("Viewport emulation failed: {message}")]
    Viewport {
        /// Error message
        message: String,
    },

    /// Screenshot capture error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Selector resolved to zero elements when at least one was expected
    #[error("No element matched selector {selector}")]
    LocatorNotFound {
        /// The selector that matched nothing
        selector: String,
    },

    /// Expected condition not reached within the allotted wait
    #[error("Timed out after {ms}ms waiting for {condition}")]
    Timeout {
        /// Wait budget in milliseconds
        ms: u64,
        /// Human-readable condition description
        condition: String,
    },

    /// Element found but its value does not satisfy the expectation
    #[error("Expected {expected}, got {actual}")]
    Mismatch {
        /// What the check wanted
        expected: String,
        /// What the page actually had
        actual: String,
    },

    /// Invalid title pattern
    #[error("Invalid pattern {pattern:?}: {message}")]
    Pattern {
        /// The regex pattern that failed to compile
        pattern: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl E2eError {
    /// Short machine-readable kind, used in reports to classify failures.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BrowserNotFound => "browser-not-found",
            Self::BrowserLaunch { .. } => "browser-launch",
            Self::Page { .. } => "page",
            Self::Navigation { .. } => "navigation",
            Self::Eval { .. } => "eval",
            Self::Viewport { .. } => "viewport",
            Self::Screenshot { .. } => "screenshot",
            Self::LocatorNotFound { .. } => "locator-not-found",
            Self::Timeout { .. } => "timeout",
            Self::Mismatch { .. } => "mismatch",
            Self::Pattern { .. } => "pattern",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }

    /// Whether this error should abort the whole run rather than fail one case.
    ///
    /// Only a failure to launch the browser is fatal; everything else is
    /// local to the case that observed it.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::BrowserNotFound | Self::BrowserLaunch { .. })
    }
}
