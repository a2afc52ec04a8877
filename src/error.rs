//! Crate-wide error type.
//!
//! Every fallible seam (feed construction, browser automation, persistence)
//! funnels into [`FeedError`] so callers can propagate with `?` and map the
//! failure to a transport status in one place.

use thiserror::Error;

/// Errors produced by feed construction, scraping, and persistence.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A feed was built with an empty title, journal, or link.
    #[error("missing required fields: title, journal, or link")]
    MissingRequiredFields,

    /// The link is not an absolute `http(s)://` URL.
    #[error("feed link is not an absolute http(s) URL: {0}")]
    InvalidLink(String),

    /// The supplied feed id is not a valid storage id.
    #[error("invalid feed id: {0}")]
    InvalidId(String),

    /// No feed exists under the supplied id.
    #[error("feed not found: {0}")]
    NotFound(String),

    /// A CDP command against the shared Chromium session failed.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// The browser session could not be started or configured.
    #[error("browser session: {0}")]
    Session(String),

    /// A selector never appeared within its bounded wait.
    #[error("timed out waiting for selector: {0}")]
    SelectorTimeout(String),

    /// A page evaluation returned a payload we could not decode.
    #[error("could not decode extraction payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The feed store rejected an operation.
    #[error("storage error: {0}")]
    Storage(#[from] mongodb::error::Error),
}
