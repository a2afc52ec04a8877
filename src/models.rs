//! Domain model for news feed items.
//!
//! This module defines [`FeedItem`], the immutable value extracted from a
//! source front page or submitted through the API, and [`FeedItemBuilder`],
//! the only way to construct one.
//!
//! # Validity
//!
//! A `FeedItem` with an empty `title`, `journal`, or `link` is never
//! constructible, and `link` must be an absolute `http(s)://` URL:
//! construction fails closed. Optional fields fall back to fixed sentinel
//! strings (`"No description"`, `"No author"`) so that source markup drift
//! degrades to defaults instead of crashes. Downstream consumers match on
//! these exact strings, so they are part of the model.

use crate::error::FeedError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel title for entries whose primary link carried no text.
pub const NO_TITLE: &str = "No title";
/// Sentinel link for entries whose primary link carried no href.
///
/// Never survives validation: an item built with this link is rejected.
pub const NO_LINK: &str = "No link";
/// Sentinel description for entries without a standfirst.
pub const NO_DESCRIPTION: &str = "No description";
/// Sentinel author for entries without a byline.
pub const NO_AUTHOR: &str = "No author";

/// Absolute `http(s)://host.tld` pattern a feed link must match.
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://.+\..+").unwrap());

/// A single news item extracted from a source front page.
///
/// # Fields
///
/// * `title` - The headline text (required, non-empty)
/// * `journal` - The source publication name (required, non-empty)
/// * `link` - Absolute URL of the story (required, validated)
/// * `description` - Standfirst text, or [`NO_DESCRIPTION`]
/// * `author` - Byline, or [`NO_AUTHOR`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub author: String,
    pub journal: String,
    pub link: String,
}

impl FeedItem {
    /// Start building a feed item.
    pub fn builder() -> FeedItemBuilder {
        FeedItemBuilder::default()
    }
}

/// Builder enforcing the [`FeedItem`] validity invariant.
///
/// Empty optional fields are replaced with their sentinels at `build()`
/// time; empty required fields (or a malformed link) abort construction.
#[derive(Debug, Default)]
pub struct FeedItemBuilder {
    title: String,
    description: String,
    author: String,
    journal: String,
    link: String,
}

impl FeedItemBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = journal.into();
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Validate and construct the [`FeedItem`].
    ///
    /// # Errors
    ///
    /// * [`FeedError::MissingRequiredFields`] if `title`, `journal`, or
    ///   `link` is empty
    /// * [`FeedError::InvalidLink`] if `link` is not an absolute
    ///   `http(s)://` URL
    pub fn build(self) -> Result<FeedItem, FeedError> {
        if self.title.is_empty() || self.journal.is_empty() || self.link.is_empty() {
            return Err(FeedError::MissingRequiredFields);
        }
        if !LINK_RE.is_match(&self.link) {
            return Err(FeedError::InvalidLink(self.link));
        }

        let description = if self.description.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            self.description
        };
        let author = if self.author.is_empty() {
            NO_AUTHOR.to_string()
        } else {
            self.author
        };

        Ok(FeedItem {
            title: self.title,
            description,
            author,
            journal: self.journal,
            link: self.link,
        })
    }
}
