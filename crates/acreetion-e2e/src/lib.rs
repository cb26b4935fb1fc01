//! End-to-end browser checks for the AcreetionOS website.
//!
//! The suite is a flat, data-driven table of independent cases - see
//! [`suite::cases`] - each of which navigates a fresh page context to a
//! path, optionally emulates a fixed viewport, and asserts properties of
//! the rendered DOM (visibility, text, classes, attributes, match counts).
//! Assertions auto-wait: pages are re-probed until the expectation holds or
//! the budget runs out, so no case carries explicit sleeps.
//!
//! # Example
//!
//! ```ignore
//! use acreetion_e2e::{run_site_suite, suite, SuiteConfig};
//!
//! let config = SuiteConfig::from_env().with_workers(4);
//! let report = run_site_suite(config, suite::cases()).await?;
//! println!("{}", report.summary());
//! ```
//!
//! Cases run with bounded parallelism and share no state; a failing case
//! never affects another's execution. The only fatal error is a failure to
//! launch the browser.

mod browser;
mod config;
mod dom;
mod driver;
mod expect;
mod locator;
mod reporter;
mod result;
mod runner;
pub mod suite;
mod wait;

#[cfg(feature = "browser")]
pub use browser::{Browser, CdpPage};
pub use config::{SuiteConfig, DEFAULT_BASE_URL, DEFAULT_WORKERS};
pub use dom::{ElementSnapshot, ElementState};
pub use driver::{BrowserSession, MockPage, MockRoute, MockSession, PageDriver, Viewport};
pub use expect::{CheckOutcome, Expectation};
pub use locator::{Locator, Selector};
pub use reporter::{CaseResult, SuiteReport, TestStatus};
pub use result::{E2eError, E2eResult};
#[cfg(feature = "browser")]
pub use runner::run_site_suite;
pub use runner::SuiteRunner;
pub use suite::{CaseSpec, Step};
pub use wait::{WaitOptions, Waiter, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
