//! Browser-automation port and its Chromium implementation.
//!
//! The scraping core talks to the browser through three narrow traits
//! ([`SessionManager`], [`BrowserSession`], and [`BrowserPage`]) so
//! extraction strategies and the orchestrator can be exercised against
//! scripted fakes. The production implementation drives a headless
//! Chromium over CDP via `chromiumoxide`.
//!
//! # Session lifecycle
//!
//! One Chromium process is shared per scrape cycle: `acquire()` launches it
//! lazily and returns the same session on subsequent calls, `release()`
//! closes it unconditionally and tolerates a session that never started.
//! The orchestrator pairs every `acquire()` with exactly one `release()`
//! on every exit path.

use crate::error::FeedError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Interval between selector existence probes.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// An independent navigable context within the shared session.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate to `url` and wait for the load to settle.
    async fn goto(&self, url: &str) -> Result<(), FeedError>;

    /// Wait up to `timeout` for `selector` to appear in the DOM.
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), FeedError>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), FeedError>;

    /// Evaluate a JavaScript expression in the page and return its value.
    async fn evaluate(&self, expression: &str) -> Result<Value, FeedError>;
}

/// A live browser capable of opening independent pages.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a fresh page. Pages share no navigation state.
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, FeedError>;
}

/// Owner of the shared session lifecycle.
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Return the shared session, starting it on first use. Idempotent:
    /// a call while a session is live returns the same session.
    async fn acquire(&self) -> Result<Arc<dyn BrowserSession>, FeedError>;

    /// Close the session and discard the reference. No-op when no
    /// session is live.
    async fn release(&self);
}

/// [`BrowserPage`] backed by a chromiumoxide [`Page`].
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), FeedError> {
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), FeedError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(FeedError::SelectorTimeout(selector.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<(), FeedError> {
        self.page.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, FeedError> {
        let result = self.page.evaluate(expression).await?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}

/// [`BrowserSession`] backed by a chromiumoxide [`Browser`].
///
/// The CDP event loop runs on a background task owned by the session and
/// is aborted on shutdown.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    event_loop: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, FeedError> {
        let page = self.browser.lock().await.new_page("about:blank").await?;
        Ok(Box::new(ChromiumPage { page }))
    }
}

impl ChromiumSession {
    async fn shutdown(&self) {
        if let Err(e) = self.browser.lock().await.close().await {
            warn!(error = %e, "Failed to close browser cleanly");
        }
        self.event_loop.abort();
    }
}

/// Launches and tears down the shared headless Chromium session.
pub struct ChromiumSessionManager {
    executable: Option<String>,
    live: Mutex<Option<Arc<ChromiumSession>>>,
}

impl ChromiumSessionManager {
    /// `executable` overrides the Chromium binary chromiumoxide would
    /// otherwise discover; used on hosts with a pinned browser install.
    pub fn new(executable: Option<String>) -> Self {
        Self {
            executable,
            live: Mutex::new(None),
        }
    }

    fn launch_config(&self) -> Result<BrowserConfig, FeedError> {
        // Sandboxing is unavailable inside the restricted container the
        // service runs in; Chromium refuses to start without these flags.
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox");
        if let Some(ref path) = self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(FeedError::Session)
    }
}

#[async_trait]
impl SessionManager for ChromiumSessionManager {
    async fn acquire(&self) -> Result<Arc<dyn BrowserSession>, FeedError> {
        let mut live = self.live.lock().await;
        if let Some(ref session) = *live {
            debug!("Reusing live browser session");
            return Ok(Arc::clone(session) as Arc<dyn BrowserSession>);
        }

        info!("Launching headless browser session");
        let (browser, mut handler) = Browser::launch(self.launch_config()?).await?;
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let session = Arc::new(ChromiumSession {
            browser: Mutex::new(browser),
            event_loop,
        });
        *live = Some(Arc::clone(&session));
        Ok(session as Arc<dyn BrowserSession>)
    }

    async fn release(&self) {
        match self.live.lock().await.take() {
            Some(session) => {
                info!("Closing browser session");
                session.shutdown().await;
            }
            None => debug!("No live browser session to release"),
        }
    }
}
