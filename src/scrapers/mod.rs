//! Front-page scrapers for the configured news sources.
//!
//! Each source has one extraction strategy bound to a browser page and a
//! target URL. All strategies follow the same skeleton:
//!
//! 1. **Navigate** to the front page and let the load settle
//! 2. **Dismiss** the consent overlay, best-effort
//! 3. **Wait** a bounded time for the source's content marker
//! 4. **Evaluate** a source-specific script extracting up to five entries
//! 5. **Assemble** validated [`FeedItem`]s, falling back to sentinels
//!
//! # Supported Sources
//!
//! | Source | Module | Content marker | Notes |
//! |--------|--------|----------------|-------|
//! | El País | [`el_pais`] | lead section grid | byline may lead with the masthead |
//! | El Mundo | [`el_mundo`] | `article` | byline may carry a `Redacción:` label |
//!
//! Failures during navigation, waiting, or extraction are caught inside the
//! strategy and converted to an empty result for that source; a failing
//! source never aborts the others.

use crate::browser::BrowserPage;
use crate::error::FeedError;
use crate::models::{FeedItem, NO_LINK, NO_TITLE};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

pub mod el_mundo;
pub mod el_pais;

/// Front page of El País.
pub const EL_PAIS_URL: &str = "https://elpais.com/";
/// Front page of El Mundo.
pub const EL_MUNDO_URL: &str = "https://www.elmundo.es/";

/// Bounded wait for a consent overlay to show up.
pub const CONSENT_TIMEOUT: Duration = Duration::from_secs(5);
/// Bounded wait for a source's content marker.
pub const MARKER_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on entries extracted per source.
pub const MAX_ENTRIES: usize = 5;

/// A per-source extraction strategy bound to its page and URL.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Extract up to [`MAX_ENTRIES`] feed items from the source.
    ///
    /// Implementations isolate their own failures: a navigation timeout or
    /// missing marker yields `Ok(vec![])` for that source, never an error
    /// that would abort the other sources.
    async fn extract(&self) -> Result<Vec<FeedItem>, FeedError>;
}

/// Pairing of a source URL and the strategy constructor responsible for it.
///
/// The process-wide table lives in [`targets`]; it is fixed configuration,
/// not user input.
#[derive(Clone, Copy)]
pub struct ExtractionTarget {
    pub url: &'static str,
    pub build: fn(Box<dyn BrowserPage>, String) -> Box<dyn ExtractionStrategy>,
}

/// The fixed (url, constructor) table the orchestrator scrapes.
pub fn targets() -> Vec<ExtractionTarget> {
    vec![
        ExtractionTarget {
            url: EL_PAIS_URL,
            build: |page, url| Box::new(el_pais::ElPaisScraper::new(page, url)),
        },
        ExtractionTarget {
            url: EL_MUNDO_URL,
            build: |page, url| Box::new(el_mundo::ElMundoScraper::new(page, url)),
        },
    ]
}

/// Consent overlay selector and the control that dismisses it.
pub(crate) struct ConsentRule {
    pub overlay: &'static str,
    pub dismiss: &'static str,
}

/// One entry as returned by a source's extraction script.
///
/// All fields are optional; absence is resolved to sentinels (or a dropped
/// entry, for the link) during assembly.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Navigate to the source and wait until its content marker is present.
///
/// The consent overlay is dismissed best-effort in between: when the
/// overlay never shows up, or the dismiss click fails, this logs a warning
/// and moves on. A marker that never appears is a hard failure for the
/// source.
pub(crate) async fn settle_on(
    page: &dyn BrowserPage,
    url: &str,
    consent: &ConsentRule,
    marker: &str,
) -> Result<(), FeedError> {
    page.goto(url).await?;

    if let Err(e) = dismiss_consent(page, consent).await {
        warn!(url, error = %e, "Consent overlay not found or failed to close");
    }

    page.wait_for_selector(marker, MARKER_TIMEOUT).await
}

async fn dismiss_consent(
    page: &dyn BrowserPage,
    consent: &ConsentRule,
) -> Result<(), FeedError> {
    page.wait_for_selector(consent.overlay, CONSENT_TIMEOUT).await?;
    page.click(consent.dismiss).await
}

/// Turn raw entries into validated feed items for `journal`.
///
/// Missing titles and links fall back to their sentinels; entries that then
/// fail validation (notably a `"No link"` link) are dropped with a warning.
/// Markup drift degrades to fewer items, never a crash.
pub(crate) fn assemble(raw: Vec<RawEntry>, journal: &str) -> Vec<FeedItem> {
    raw.into_iter()
        .take(MAX_ENTRIES)
        .filter_map(|entry| {
            let title = entry.title.filter(|t| !t.is_empty());
            let link = entry.link.filter(|l| !l.is_empty());
            let built = FeedItem::builder()
                .title(title.unwrap_or_else(|| NO_TITLE.to_string()))
                .link(link.unwrap_or_else(|| NO_LINK.to_string()))
                .description(entry.description.unwrap_or_default())
                .author(entry.author.unwrap_or_default())
                .journal(journal)
                .build();
            match built {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(journal, error = %e, "Dropping entry that failed validation");
                    None
                }
            }
        })
        .collect()
}
