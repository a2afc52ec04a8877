//! El Mundo front-page extraction strategy.
//!
//! Extracts the first five cover articles at
//! [elmundo.es](https://www.elmundo.es). Bylines sometimes carry a leading
//! `Redacción: ` label which is stripped before assembly.

use super::{assemble, settle_on, ConsentRule, ExtractionStrategy, RawEntry};
use crate::browser::BrowserPage;
use crate::error::FeedError;
use crate::models::FeedItem;
use async_trait::async_trait;
use tracing::{error, info};

/// Journal label stamped on every item from this source.
pub const JOURNAL: &str = "El Mundo";

const CONSENT: ConsentRule = ConsentRule {
    overlay: ".didomi-popup-container",
    dismiss: "#ue-accept-notice-button",
};

/// Cover articles render as `article` elements.
const NEWS_MARKER: &str = "article";

/// Byline label prepended to staff-written pieces.
const BYLINE_LABEL: &str = "Redacción: ";

const EXTRACT_JS: &str = r#"(() => {
  return Array.from(document.querySelectorAll('article')).slice(0, 5).map((article) => {
    const anchor = article.querySelector('a');
    const byline = article.querySelector('.ue-c-cover-content__byline-name');
    const standfirst = article.querySelector('.ue-c-cover-content__standfirst');
    return {
      title: anchor && anchor.textContent ? anchor.textContent.trim() : null,
      link: anchor ? anchor.href : null,
      description: standfirst && standfirst.textContent ? standfirst.textContent.trim() : null,
      author: byline && byline.textContent ? byline.textContent.trim() : null,
    };
  });
})()"#;

/// Drop the staff byline label, keeping the name behind it.
fn strip_byline_label(author: &str) -> String {
    let author = author.trim();
    author.strip_prefix(BYLINE_LABEL).unwrap_or(author).to_string()
}

/// Extraction strategy for the El Mundo front page.
pub struct ElMundoScraper {
    page: Box<dyn BrowserPage>,
    url: String,
}

impl ElMundoScraper {
    pub fn new(page: Box<dyn BrowserPage>, url: String) -> Self {
        Self { page, url }
    }

    async fn collect(&self) -> Result<Vec<FeedItem>, FeedError> {
        settle_on(self.page.as_ref(), &self.url, &CONSENT, NEWS_MARKER).await?;
        let payload = self.page.evaluate(EXTRACT_JS).await?;
        let raw: Vec<RawEntry> = serde_json::from_value(payload)?;
        let raw = raw
            .into_iter()
            .map(|mut entry| {
                if let Some(author) = entry.author.take() {
                    entry.author = Some(strip_byline_label(&author));
                }
                entry
            })
            .collect();
        Ok(assemble(raw, JOURNAL))
    }
}

#[async_trait]
impl ExtractionStrategy for ElMundoScraper {
    async fn extract(&self) -> Result<Vec<FeedItem>, FeedError> {
        info!(url = %self.url, "Scraping El Mundo front page");
        match self.collect().await {
            Ok(items) => {
                info!(count = items.len(), "Extracted El Mundo feeds");
                Ok(items)
            }
            Err(e) => {
                error!(url = %self.url, error = %e, "El Mundo extraction failed; dropping source");
                Ok(Vec::new())
            }
        }
    }
}
