//! The page driver seam.
//!
//! [`PageDriver`] is the narrow surface the runner needs from a browser
//! page: navigate, emulate a viewport, read the title, probe a locator,
//! click, screenshot, close. The real implementation lives in
//! [`crate::browser`] behind the `browser` feature; [`MockPage`] provides a
//! scriptable in-memory site so the runner and wait logic are unit-testable
//! without a chromium binary.

use crate::dom::ElementSnapshot;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Simulated browser window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// iPhone 5/SE class devices
    pub const EXTRA_SMALL: Self = Self::new(320, 568);

    /// iPhone SE class devices
    pub const MOBILE: Self = Self::new(375, 667);

    /// iPad class devices
    pub const TABLET: Self = Self::new(768, 1024);

    /// Default desktop window
    pub const DESKTOP: Self = Self::new(1280, 800);

    /// Whether mobile device emulation should be enabled at this size
    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        self.width < 800
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Abstract driver for a single page context
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate to a URL and wait for the load event
    async fn goto(&mut self, url: &str) -> E2eResult<()>;

    /// Override the viewport dimensions
    async fn set_viewport(&mut self, viewport: Viewport) -> E2eResult<()>;

    /// Get the document title
    async fn title(&self) -> E2eResult<String>;

    /// Resolve a locator against the live DOM
    async fn probe(&self, locator: &Locator) -> E2eResult<ElementSnapshot>;

    /// Click the first element the locator resolves to
    async fn click(&mut self, locator: &Locator) -> E2eResult<()>;

    /// Capture a PNG screenshot of the page
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;

    /// Tear down the page context
    async fn close(&mut self) -> E2eResult<()>;
}

/// A source of fresh page contexts, one per test case
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// The page type this session produces
    type Page: PageDriver;

    /// Open a fresh page context
    async fn new_page(&self) -> E2eResult<Self::Page>;
}

// ============================================================================
// Mock implementation
// ============================================================================

/// One routable page of a [`MockPage`] site
#[derive(Debug, Clone, Default)]
pub struct MockRoute {
    /// Document title served for this route
    pub title: String,
    elements: HashMap<String, ElementSnapshot>,
    click_effects: HashMap<String, Vec<(String, ElementSnapshot)>>,
}

impl MockRoute {
    /// Create a route with a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add an element snapshot, keyed by the locator's `describe()` string
    #[must_use]
    pub fn with_element(mut self, locator: impl Into<String>, snapshot: ElementSnapshot) -> Self {
        self.elements.insert(locator.into(), snapshot);
        self
    }

    /// When `clicked` is clicked, replace `target`'s snapshot
    #[must_use]
    pub fn with_click_effect(
        mut self,
        clicked: impl Into<String>,
        target: impl Into<String>,
        snapshot: ElementSnapshot,
    ) -> Self {
        self.click_effects
            .entry(clicked.into())
            .or_default()
            .push((target.into(), snapshot));
        self
    }
}

/// Scriptable page for unit testing the runner and wait logic.
///
/// Routes are keyed by path; a `goto` selects the route whose path the URL
/// ends with. Probes look up snapshots by the locator's `describe()` string,
/// and clicks apply any registered effects, which is enough to model the
/// donate-modal class toggle.
#[derive(Debug, Default)]
pub struct MockPage {
    routes: HashMap<String, MockRoute>,
    current: Option<String>,
    /// Last viewport override applied
    pub viewport: Option<Viewport>,
    /// Ordered record of driver calls, for verification
    pub call_history: Vec<String>,
    /// PNG bytes returned by `screenshot`
    pub screenshot_data: Vec<u8>,
    closed: bool,
}

impl MockPage {
    /// Create an empty mock page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route under a path like `/contact.html`
    #[must_use]
    pub fn with_route(mut self, path: impl Into<String>, route: MockRoute) -> Self {
        self.routes.insert(path.into(), route);
        self
    }

    /// Whether `close` was called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether a driver method was called (prefix match on history entries)
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    fn current_route(&self) -> E2eResult<&MockRoute> {
        self.current
            .as_ref()
            .and_then(|path| self.routes.get(path))
            .ok_or_else(|| E2eError::Page {
                message: "no route loaded".to_string(),
            })
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn goto(&mut self, url: &str) -> E2eResult<()> {
        self.call_history.push(format!("goto:{url}"));
        let path = self
            .routes
            .keys()
            .find(|path| url.ends_with(path.as_str()))
            .cloned();
        match path {
            Some(path) => {
                self.current = Some(path);
                Ok(())
            }
            None => Err(E2eError::Navigation {
                url: url.to_string(),
                message: "no mock route".to_string(),
            }),
        }
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> E2eResult<()> {
        self.call_history.push(format!("viewport:{viewport}"));
        self.viewport = Some(viewport);
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.current_route()?.title.clone())
    }

    async fn probe(&self, locator: &Locator) -> E2eResult<ElementSnapshot> {
        let route = self.current_route()?;
        Ok(route
            .elements
            .get(&locator.describe())
            .cloned()
            .unwrap_or_else(ElementSnapshot::empty))
    }

    async fn click(&mut self, locator: &Locator) -> E2eResult<()> {
        let key = locator.describe();
        self.call_history.push(format!("click:{key}"));
        let current = self.current.clone().ok_or_else(|| E2eError::Page {
            message: "no route loaded".to_string(),
        })?;
        let route = self.routes.get_mut(&current).ok_or_else(|| E2eError::Page {
            message: "no route loaded".to_string(),
        })?;
        if !route.elements.contains_key(&key) {
            return Err(E2eError::LocatorNotFound { selector: key });
        }
        if let Some(effects) = route.click_effects.get(&key).cloned() {
            for (target, snapshot) in effects {
                route.elements.insert(target, snapshot);
            }
        }
        Ok(())
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        Ok(self.screenshot_data.clone())
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.call_history.push("close".to_string());
        self.closed = true;
        Ok(())
    }
}

/// Session producing [`MockPage`]s from a builder closure
pub struct MockSession<F>
where
    F: Fn() -> MockPage + Send + Sync,
{
    build: F,
}

impl<F> MockSession<F>
where
    F: Fn() -> MockPage + Send + Sync,
{
    /// Create a session; `build` is invoked once per case
    pub const fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F> std::fmt::Debug for MockSession<F>
where
    F: Fn() -> MockPage + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSession").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> BrowserSession for MockSession<F>
where
    F: Fn() -> MockPage + Send + Sync,
{
    type Page = MockPage;

    async fn new_page(&self) -> E2eResult<Self::Page> {
        Ok((self.build)())
    }
}
