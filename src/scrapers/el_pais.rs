//! El País front-page extraction strategy.
//!
//! Extracts the headlines of the lead section grid at
//! [elpais.com](https://elpais.com). The byline block often leads with a
//! link to the masthead itself; when it does and a second link exists, the
//! second link is the actual author.

use super::{assemble, settle_on, ConsentRule, ExtractionStrategy, RawEntry};
use crate::browser::BrowserPage;
use crate::error::FeedError;
use crate::models::FeedItem;
use async_trait::async_trait;
use tracing::{error, info};

/// Journal label stamped on every item from this source.
pub const JOURNAL: &str = "El País";

const CONSENT: ConsentRule = ConsentRule {
    overlay: ".pmConsentWall-content",
    dismiss: ".pmConsentWall-button",
};

/// Lead section grid; present once the front page has rendered its items.
const NEWS_SECTION: &str = "section._g._g-md._g-o.b.b-d";

/// Collects the first five headlines of the lead section, together with
/// their link, standfirst, and byline. Returns entries with `null` holes
/// for whatever a headline is missing.
const EXTRACT_JS: &str = r#"(() => {
  const sections = document.querySelectorAll('section._g._g-md._g-o.b.b-d');
  if (!sections.length) {
    return [];
  }
  return Array.from(sections[0].querySelectorAll('h2')).slice(0, 5).map((headline) => {
    const anchor = headline.querySelector('a');
    const article = headline.closest('article');
    let author = null;
    const byline = article ? article.querySelector('div.c_a') : null;
    if (byline) {
      const links = Array.from(byline.querySelectorAll('a'));
      if (links.length) {
        const leadsWithMasthead = links[0].textContent.trim() === 'El País';
        const chosen = leadsWithMasthead && links.length > 1 ? links[1] : links[0];
        author = chosen.textContent.trim();
      }
    }
    const standfirst = article ? article.querySelector('p.c_d') : null;
    return {
      title: anchor && anchor.textContent ? anchor.textContent.trim() : null,
      link: anchor ? anchor.href : null,
      description: standfirst && standfirst.textContent ? standfirst.textContent.trim() : null,
      author: author,
    };
  });
})()"#;

/// Extraction strategy for the El País front page.
pub struct ElPaisScraper {
    page: Box<dyn BrowserPage>,
    url: String,
}

impl ElPaisScraper {
    pub fn new(page: Box<dyn BrowserPage>, url: String) -> Self {
        Self { page, url }
    }

    async fn collect(&self) -> Result<Vec<FeedItem>, FeedError> {
        settle_on(self.page.as_ref(), &self.url, &CONSENT, NEWS_SECTION).await?;
        let payload = self.page.evaluate(EXTRACT_JS).await?;
        let raw: Vec<RawEntry> = serde_json::from_value(payload)?;
        Ok(assemble(raw, JOURNAL))
    }
}

#[async_trait]
impl ExtractionStrategy for ElPaisScraper {
    async fn extract(&self) -> Result<Vec<FeedItem>, FeedError> {
        info!(url = %self.url, "Scraping El País front page");
        match self.collect().await {
            Ok(items) => {
                info!(count = items.len(), "Extracted El País feeds");
                Ok(items)
            }
            Err(e) => {
                error!(url = %self.url, error = %e, "El País extraction failed; dropping source");
                Ok(Vec::new())
            }
        }
    }
}
