//! Scrape cycle orchestration.
//!
//! [`ScrapeOrchestrator::run`] drives one full cycle: acquire the shared
//! browser session, open one page per configured target, run every
//! extraction strategy concurrently, merge the results in source order,
//! and hand any non-empty batch to persistence. The session is released
//! on every exit path, including a failed launch.
//!
//! Failure isolation is layered: each strategy already converts its own
//! failures into an empty result, the fan-out maps an unexpected task
//! error to an empty result for that source, and the whole
//! acquire/open/extract phase sits behind a boundary that degrades the
//! run to an empty batch instead of surfacing browser trouble to the
//! caller. Storage errors during the batch write are the one thing that
//! does propagate.

use crate::browser::SessionManager;
use crate::error::FeedError;
use crate::models::FeedItem;
use crate::repository::{FeedRepository, StoredFeed};
use crate::scrapers::ExtractionTarget;
use futures::future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Runs scrape cycles over a fixed target table.
pub struct ScrapeOrchestrator {
    sessions: Arc<dyn SessionManager>,
    repository: Arc<dyn FeedRepository>,
}

impl ScrapeOrchestrator {
    pub fn new(sessions: Arc<dyn SessionManager>, repository: Arc<dyn FeedRepository>) -> Self {
        Self {
            sessions,
            repository,
        }
    }

    /// Run one scrape cycle over `targets`.
    ///
    /// Returns the feeds persistence reports as saved, or an empty vector
    /// when nothing was extracted (persistence is not called in that
    /// case). Browser failures degrade to an empty result; storage
    /// failures propagate.
    #[instrument(level = "info", skip_all, fields(targets = targets.len()))]
    pub async fn run(&self, targets: &[ExtractionTarget]) -> Result<Vec<StoredFeed>, FeedError> {
        let scraped = match self.scrape_all(targets).await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Scrape cycle failed; degrading to an empty result");
                Vec::new()
            }
        };

        // The session is finished with either way; it comes down before
        // the batch write, so a storage error cannot leak the browser.
        self.sessions.release().await;

        if scraped.is_empty() {
            info!("No feeds extracted; skipping batch save");
            return Ok(Vec::new());
        }

        let saved = self.repository.save_batch(&scraped).await?;
        info!(count = saved.len(), "Persisted scraped feeds");
        Ok(saved)
    }

    /// Acquire the session, open one page per target in order, and join
    /// all extractions.
    ///
    /// Each extraction task owns its page; the only shared state is the
    /// read-only target list. Join-all semantics: every task runs to
    /// completion and contributes its items (or nothing) in source order.
    async fn scrape_all(&self, targets: &[ExtractionTarget]) -> Result<Vec<FeedItem>, FeedError> {
        let session = self.sessions.acquire().await?;

        let mut strategies = Vec::with_capacity(targets.len());
        for target in targets {
            let page = session.new_page().await?;
            strategies.push((target.url, (target.build)(page, target.url.to_string())));
        }

        let extractions = strategies.iter().map(|(url, strategy)| {
            let url: &str = url;
            async move {
                match strategy.extract().await {
                    Ok(items) => {
                        debug!(source = url, count = items.len(), "Source extraction finished");
                        items
                    }
                    Err(e) => {
                        error!(source = url, error = %e, "Source extraction failed; dropping its items");
                        Vec::new()
                    }
                }
            }
        });

        let results = future::join_all(extractions).await;
        Ok(results.into_iter().flatten().collect())
    }
}
