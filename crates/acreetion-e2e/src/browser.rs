//! Real browser control over the Chrome DevTools Protocol.
//!
//! Only compiled with the `browser` feature (on by default). The runner and
//! all assertion logic are exercised against [`crate::driver::MockPage`] in
//! unit tests; this module is the thin CDP binding used for live runs.

#![cfg(feature = "browser")]

use crate::config::SuiteConfig;
use crate::dom::ElementSnapshot;
use crate::driver::{BrowserSession, PageDriver, Viewport};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as RawPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A launched browser instance
#[derive(Debug)]
pub struct Browser {
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a browser for the given suite configuration.
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::BrowserLaunch`]; this is fatal to the whole run.
    pub async fn launch(config: &SuiteConfig) -> E2eResult<Self> {
        let mut builder = CdpConfig::builder();

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| E2eError::BrowserLaunch {
            message: e.to_string(),
        })?;

        tracing::debug!(headless = config.headless, "launching browser");
        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| E2eError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP event loop until the connection drops
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Close the browser process
    pub async fn close(self) -> E2eResult<()> {
        let mut browser = self.inner.lock().await;
        browser.close().await.map_err(|e| E2eError::BrowserLaunch {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for Browser {
    type Page = CdpPage;

    async fn new_page(&self) -> E2eResult<Self::Page> {
        let browser = self.inner.lock().await;
        let raw = browser
            .new_page("about:blank")
            .await
            .map_err(|e| E2eError::Page {
                message: e.to_string(),
            })?;
        Ok(CdpPage { inner: raw })
    }
}

/// One page context on a CDP connection
#[derive(Debug)]
pub struct CdpPage {
    inner: RawPage,
}

impl CdpPage {
    async fn eval<T: serde::de::DeserializeOwned>(&self, script: &str) -> E2eResult<T> {
        let result = self
            .inner
            .evaluate(script)
            .await
            .map_err(|e| E2eError::Eval {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| E2eError::Eval {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&mut self, url: &str) -> E2eResult<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| E2eError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        // Assertions only run once the load event has fired
        self.inner
            .wait_for_navigation()
            .await
            .map_err(|e| E2eError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> E2eResult<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(viewport.width))
            .height(i64::from(viewport.height))
            .device_scale_factor(1.0)
            .mobile(viewport.is_mobile())
            .build()
            .map_err(|e| E2eError::Viewport {
                message: e.to_string(),
            })?;
        self.inner
            .execute(params)
            .await
            .map_err(|e| E2eError::Viewport {
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        self.eval("document.title").await
    }

    async fn probe(&self, locator: &Locator) -> E2eResult<ElementSnapshot> {
        self.eval(&locator.probe_js()).await
    }

    async fn click(&mut self, locator: &Locator) -> E2eResult<()> {
        let clicked: bool = self.eval(&locator.click_js()).await?;
        if clicked {
            Ok(())
        } else {
            Err(E2eError::LocatorNotFound {
                selector: locator.describe(),
            })
        }
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let response = self
            .inner
            .execute(params)
            .await
            .map_err(|e| E2eError::Screenshot {
                message: e.to_string(),
            })?;
        base64::engine::general_purpose::STANDARD
            .decode(&response.data)
            .map_err(|e| E2eError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.inner
            .clone()
            .close()
            .await
            .map_err(|e| E2eError::Page {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
