//! Suite execution.
//!
//! Each case gets a fresh page context, runs under its own whole-case
//! timeout, and is torn down on every exit path. Cases execute with bounded
//! parallelism; one case's failure never affects another's execution unless
//! fail-fast mode is on, in which case unexecuted cases are reported as
//! skipped.

use crate::config::SuiteConfig;
use crate::driver::{BrowserSession, PageDriver};
use crate::reporter::{CaseResult, SuiteReport};
use crate::result::{E2eError, E2eResult};
use crate::suite::{CaseSpec, Step};
use crate::wait::Waiter;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Executes a list of cases against a browser session
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    config: SuiteConfig,
}

impl SuiteRunner {
    /// Create a runner
    #[must_use]
    pub const fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    /// The configuration in effect
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every case and collect a report.
    ///
    /// The session outlives all cases; each case still gets its own page
    /// context from it. In fail-fast mode the first failure stops new cases
    /// from starting, but cases already in flight run to completion so their
    /// pages are torn down; only never-started cases are reported as skipped.
    pub async fn run<S: BrowserSession>(&self, session: &S, cases: Vec<CaseSpec>) -> SuiteReport {
        let start = Instant::now();
        let all_names: Vec<&'static str> = cases.iter().map(|c| c.name).collect();
        let mut completed: HashSet<String> = HashSet::new();
        let mut report = SuiteReport::new();

        let mut queue = cases.into_iter();
        let mut in_flight: FuturesUnordered<_> = queue
            .by_ref()
            .take(self.config.workers)
            .map(|case| self.execute(session, case))
            .collect();

        let mut halted = false;
        while let Some(result) = in_flight.next().await {
            completed.insert(result.name.clone());
            let failed = result.status.is_failed();
            report.record(result);
            if failed && self.config.fail_fast && !halted {
                halted = true;
                tracing::warn!("first failure observed, draining in-flight cases");
            }
            if !halted {
                if let Some(case) = queue.next() {
                    in_flight.push(self.execute(session, case));
                }
            }
        }

        for name in all_names {
            if !completed.contains(name) {
                report.record(CaseResult::skipped(name));
            }
        }

        report.duration = start.elapsed();
        tracing::info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "suite finished"
        );
        report
    }

    /// Run one case in a fresh page context, guaranteeing teardown.
    async fn execute<S: BrowserSession>(&self, session: &S, case: CaseSpec) -> CaseResult {
        let start = Instant::now();
        tracing::info!(case = case.name, path = case.path, "running case");

        let mut page = match session.new_page().await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(case = case.name, error = %e, "could not open page context");
                return CaseResult::failed(case.name, start.elapsed(), &e);
            }
        };

        let outcome =
            match tokio::time::timeout(self.config.case_timeout, self.run_case(&mut page, &case))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(E2eError::Timeout {
                    ms: self.config.case_timeout.as_millis() as u64,
                    condition: "case to finish".to_string(),
                }),
            };

        let result = match outcome {
            Ok(()) => CaseResult::passed(case.name, start.elapsed()),
            Err(e) => {
                tracing::warn!(case = case.name, error = %e, kind = e.kind(), "case failed");
                let mut result = CaseResult::failed(case.name, start.elapsed(), &e);
                if let Some(dir) = self.config.screenshot_dir.clone() {
                    if let Some(path) = capture_failure(&page, &dir, case.name).await {
                        result = result.with_screenshot(path);
                    }
                }
                result
            }
        };

        if let Err(e) = page.close().await {
            tracing::warn!(case = case.name, error = %e, "page teardown failed");
        }
        result
    }

    async fn run_case<P: PageDriver>(&self, page: &mut P, case: &CaseSpec) -> E2eResult<()> {
        page.set_viewport(case.viewport.unwrap_or(self.config.viewport))
            .await?;
        let url = self.config.page_url(case.path);
        page.goto(&url).await?;

        let waiter = Waiter::new(self.config.wait_options());
        for step in &case.steps {
            match step {
                Step::AssertTitle(pattern) => waiter.expect_title(page, pattern).await?,
                Step::Assert(locator, expectation) => {
                    waiter.expect_element(page, locator, expectation).await?;
                }
                Step::Click(locator) => waiter.click(page, locator).await?,
            }
        }
        Ok(())
    }
}

/// Best-effort failure screenshot; never turns a failed case into an error.
async fn capture_failure<P: PageDriver>(page: &P, dir: &Path, name: &str) -> Option<PathBuf> {
    let data = page.screenshot().await.ok()?;
    if data.is_empty() {
        return None;
    }
    let file = dir.join(format!("{}.png", slug(name)));
    tokio::fs::create_dir_all(dir).await.ok()?;
    tokio::fs::write(&file, &data).await.ok()?;
    Some(file)
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Launch a browser, run the cases, and close the browser.
///
/// A launch failure is the one fatal error of a run: it surfaces here
/// instead of failing individual cases.
#[cfg(feature = "browser")]
pub async fn run_site_suite(
    config: SuiteConfig,
    cases: Vec<CaseSpec>,
) -> E2eResult<SuiteReport> {
    let browser = crate::browser::Browser::launch(&config).await?;
    let runner = SuiteRunner::new(config);
    let report = runner.run(&browser, cases).await;
    browser.close().await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSnapshot, ElementState};
    use crate::driver::{MockPage, MockRoute, MockSession, Viewport};
    use crate::expect::Expectation;
    use crate::locator::Locator;
    use crate::wait::WaitOptions;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn fast_config() -> SuiteConfig {
        SuiteConfig::new()
            .with_base_url("http://localhost:8080")
            .with_assertion_timeout(Duration::from_millis(100))
            .with_case_timeout(Duration::from_millis(2_000))
    }

    fn mock_site() -> MockPage {
        MockPage::new()
            .with_route(
                "/",
                MockRoute::new("AcreetionOS - Linux for Everyone")
                    .with_element(".logo-img", ElementSnapshot::of(1, ElementState::visible()))
                    .with_element(
                        ".logo-text",
                        ElementSnapshot::of(1, ElementState::visible().with_text("AcreetionOS")),
                    )
                    .with_element(
                        "[data-modal-target=\"#donate-modal\"]",
                        ElementSnapshot::of(1, ElementState::visible()),
                    )
                    .with_element(
                        "#donate-modal",
                        ElementSnapshot::of(1, ElementState::new().with_attr("class", "modal")),
                    )
                    .with_element(
                        "#donate-modal .modal-close-btn",
                        ElementSnapshot::of(1, ElementState::visible()),
                    )
                    .with_click_effect(
                        "[data-modal-target=\"#donate-modal\"]",
                        "#donate-modal",
                        ElementSnapshot::of(
                            1,
                            ElementState::visible().with_attr("class", "modal visible"),
                        ),
                    )
                    .with_click_effect(
                        "#donate-modal .modal-close-btn",
                        "#donate-modal",
                        ElementSnapshot::of(
                            1,
                            ElementState::visible().with_attr("class", "modal"),
                        ),
                    ),
            )
            .with_route(
                "/contact.html",
                MockRoute::new("Contact - AcreetionOS").with_element(
                    ".contact-form",
                    ElementSnapshot::of(1, ElementState::visible()),
                ),
            )
    }

    fn homepage_case() -> CaseSpec {
        CaseSpec::new(
            "homepage loads successfully",
            "/",
            vec![Step::AssertTitle("AcreetionOS"), Step::visible(".logo-img")],
        )
    }

    fn failing_case() -> CaseSpec {
        CaseSpec::new(
            "sidebar column is present",
            "/",
            vec![Step::visible(".sidebar-column")],
        )
    }

    #[tokio::test]
    async fn test_passing_suite() {
        let session = MockSession::new(mock_site);
        let runner = SuiteRunner::new(fast_config());
        let cases = vec![
            homepage_case(),
            CaseSpec::new(
                "contact page loads",
                "/contact.html",
                vec![Step::AssertTitle("Contact"), Step::visible(".contact-form")],
            ),
        ];
        let report = runner.run(&session, cases).await;
        assert!(report.all_passed(), "report: {}", report.summary());
        assert_eq!(report.total(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_local_to_its_case() {
        let session = MockSession::new(mock_site);
        let runner = SuiteRunner::new(fast_config());
        let report = runner
            .run(&session, vec![failing_case(), homepage_case()])
            .await;

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.passed_count(), 1);
        let failure = report.failures()[0];
        assert_eq!(failure.error_kind.as_deref(), Some("locator-not-found"));
    }

    #[tokio::test]
    async fn test_fail_fast_skips_remaining_cases() {
        let session = MockSession::new(mock_site);
        let runner = SuiteRunner::new(fast_config().with_workers(1).with_fail_fast());
        let report = runner
            .run(&session, vec![failing_case(), homepage_case()])
            .await;

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
    }

    /// Page that counts teardowns; the first page a session hands out fails
    /// its navigation immediately, every later one stalls in `goto` so it is
    /// still in flight when the failure lands.
    struct CountingPage {
        slow: bool,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageDriver for CountingPage {
        async fn goto(&mut self, url: &str) -> E2eResult<()> {
            if self.slow {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            } else {
                Err(E2eError::Navigation {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                })
            }
        }

        async fn set_viewport(&mut self, _viewport: Viewport) -> E2eResult<()> {
            Ok(())
        }

        async fn title(&self) -> E2eResult<String> {
            Ok("AcreetionOS".to_string())
        }

        async fn probe(&self, _locator: &Locator) -> E2eResult<ElementSnapshot> {
            Ok(ElementSnapshot::of(1, ElementState::visible()))
        }

        async fn click(&mut self, _locator: &Locator) -> E2eResult<()> {
            Ok(())
        }

        async fn screenshot(&self) -> E2eResult<Vec<u8>> {
            Ok(Vec::new())
        }

        async fn close(&mut self) -> E2eResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CountingSession {
        opened: AtomicUsize,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BrowserSession for CountingSession {
        type Page = CountingPage;

        async fn new_page(&self) -> E2eResult<Self::Page> {
            let n = self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(CountingPage {
                slow: n != 0,
                closes: Arc::clone(&self.closes),
            })
        }
    }

    #[tokio::test]
    async fn test_fail_fast_drains_in_flight_cases_with_teardown() {
        let closes = Arc::new(AtomicUsize::new(0));
        let session = CountingSession {
            opened: AtomicUsize::new(0),
            closes: Arc::clone(&closes),
        };
        let runner = SuiteRunner::new(fast_config().with_workers(2).with_fail_fast());
        let cases = vec![
            CaseSpec::new(
                "homepage loads successfully",
                "/",
                vec![Step::visible(".logo-img")],
            ),
            CaseSpec::new(
                "contact page loads",
                "/contact.html",
                vec![Step::visible(".contact-form")],
            ),
            CaseSpec::new(
                "download buttons render",
                "/",
                vec![Step::visible(".btn-cinnamon")],
            ),
        ];
        let report = runner.run(&session, cases).await;

        // One case fails its navigation; the other case already in flight
        // must run to completion with its page torn down, and only the
        // never-started third case is skipped.
        assert_eq!(session.opened.load(Ordering::SeqCst), 2);
        assert_eq!(closes.load(Ordering::SeqCst), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
    }

    #[tokio::test]
    async fn test_modal_cycles_stay_consistent() {
        let mut page = mock_site();
        page.goto("http://localhost:8080/").await.unwrap();
        let waiter = Waiter::new(
            WaitOptions::new()
                .with_timeout(Duration::from_millis(100))
                .with_poll_interval(Duration::from_millis(10)),
        );
        let opener = Locator::new("[data-modal-target=\"#donate-modal\"]");
        let closer = Locator::new("#donate-modal .modal-close-btn");
        let modal = Locator::new("#donate-modal");

        for _ in 0..3 {
            waiter.click(&mut page, &opener).await.unwrap();
            waiter
                .expect_element(
                    &mut page,
                    &modal,
                    &Expectation::HasClass("visible".to_string()),
                )
                .await
                .unwrap();
            waiter.click(&mut page, &closer).await.unwrap();
            waiter
                .expect_element(
                    &mut page,
                    &modal,
                    &Expectation::LacksClass("visible".to_string()),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_modal_toggle_case_via_runner() {
        let session = MockSession::new(mock_site);
        let runner = SuiteRunner::new(fast_config());
        let case = CaseSpec::new(
            "donate modal opens and closes",
            "/",
            vec![
                Step::click("[data-modal-target=\"#donate-modal\"]"),
                Step::has_class("#donate-modal", "visible"),
                Step::click("#donate-modal .modal-close-btn"),
                Step::lacks_class("#donate-modal", "visible"),
            ],
        );
        let report = runner.run(&session, vec![case]).await;
        assert!(report.all_passed(), "report: {}", report.summary());
    }

    #[tokio::test]
    async fn test_default_viewport_applied_when_case_has_none() {
        let config = fast_config().with_viewport(Viewport::new(1440, 900));
        let runner = SuiteRunner::new(config);
        // Single page driven directly so the applied viewport is observable
        let mut page = mock_site();
        runner.run_case(&mut page, &homepage_case()).await.unwrap();
        assert_eq!(page.viewport, Some(Viewport::new(1440, 900)));
    }

    #[tokio::test]
    async fn test_case_viewport_overrides_default() {
        let runner = SuiteRunner::new(fast_config());
        let mut page = mock_site();
        let case = CaseSpec::at(
            "homepage renders on mobile viewport",
            "/",
            Viewport::MOBILE,
            vec![Step::visible(".logo-img")],
        );
        runner.run_case(&mut page, &case).await.unwrap();
        assert_eq!(page.viewport, Some(Viewport::MOBILE));
    }

    #[tokio::test]
    async fn test_failure_screenshot_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config().with_screenshot_dir(dir.path());
        let session = MockSession::new(|| {
            let mut page = mock_site();
            page.screenshot_data = vec![0x89, 0x50, 0x4E, 0x47];
            page
        });
        let runner = SuiteRunner::new(config);
        let report = runner.run(&session, vec![failing_case()]).await;

        let failure = &report.results[0];
        let path = failure.screenshot.as_ref().expect("screenshot recorded");
        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "sidebar-column-is-present.png"
        );
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let session = MockSession::new(mock_site);
        let runner = SuiteRunner::new(fast_config());
        let first = runner.run(&session, vec![homepage_case()]).await;
        let second = runner.run(&session, vec![homepage_case()]).await;
        assert_eq!(first.passed_count(), second.passed_count());
        assert_eq!(first.failed_count(), second.failed_count());
    }

    #[test]
    fn test_slug_sanitizes_names() {
        assert_eq!(slug("donate modal opens/closes"), "donate-modal-opens-closes");
        assert_eq!(slug("  spaced  "), "spaced");
    }
}
