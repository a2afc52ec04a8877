//! Test doubles shared by the unit test suites.
//!
//! Scripted implementations of the browser port, stub extraction
//! strategies, and counting repository wrappers. Compiled only for tests.

use crate::browser::{BrowserPage, BrowserSession, SessionManager};
use crate::error::FeedError;
use crate::models::FeedItem;
use crate::repository::{FeedRepository, InMemoryFeedRepository, StoredFeed};
use crate::scrapers::ExtractionStrategy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A valid feed item for tests.
pub fn feed(title: &str, journal: &str) -> FeedItem {
    FeedItem::builder()
        .title(title)
        .journal(journal)
        .link("https://example.com/story")
        .build()
        .unwrap()
}

/// A [`BrowserPage`] that reports the configured selectors as present,
/// records clicks, and answers every evaluation with a fixed payload.
///
/// Absent selectors fail immediately instead of honoring the caller's
/// timeout, so tests stay fast.
pub struct ScriptedPage {
    present: Vec<String>,
    payload: Value,
    clicks: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPage {
    pub fn new(present: &[&str], payload: Value) -> Self {
        Self {
            present: present.iter().map(|s| s.to_string()).collect(),
            payload,
            clicks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the click log, usable after the page is boxed.
    pub fn clicks_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.clicks)
    }
}

#[async_trait]
impl BrowserPage for ScriptedPage {
    async fn goto(&self, _url: &str) -> Result<(), FeedError> {
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), FeedError> {
        if self.present.iter().any(|s| s == selector) {
            Ok(())
        } else {
            Err(FeedError::SelectorTimeout(selector.to_string()))
        }
    }

    async fn click(&self, selector: &str) -> Result<(), FeedError> {
        if self.present.iter().any(|s| s == selector) {
            self.clicks.lock().unwrap().push(selector.to_string());
            Ok(())
        } else {
            Err(FeedError::SelectorTimeout(selector.to_string()))
        }
    }

    async fn evaluate(&self, _expression: &str) -> Result<Value, FeedError> {
        Ok(self.payload.clone())
    }
}

/// Session whose pages render nothing.
pub struct StubSession;

#[async_trait]
impl BrowserSession for StubSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, FeedError> {
        Ok(Box::new(ScriptedPage::new(&[], Value::Null)))
    }
}

/// A [`SessionManager`] that counts lifecycle calls and can be told to
/// fail acquisition.
pub struct StubSessionManager {
    fail_acquire: bool,
    acquires: AtomicUsize,
    releases: AtomicUsize,
}

impl StubSessionManager {
    pub fn new() -> Self {
        Self {
            fail_acquire: false,
            acquires: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    /// A manager whose `acquire` always fails, as a crashed launch would.
    pub fn failing() -> Self {
        Self {
            fail_acquire: true,
            ..Self::new()
        }
    }

    pub fn acquire_calls(&self) -> usize {
        self.acquires.load(Ordering::Relaxed)
    }

    pub fn release_calls(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SessionManager for StubSessionManager {
    async fn acquire(&self) -> Result<Arc<dyn BrowserSession>, FeedError> {
        self.acquires.fetch_add(1, Ordering::Relaxed);
        if self.fail_acquire {
            return Err(FeedError::Session("browser failed to launch".to_string()));
        }
        Ok(Arc::new(StubSession))
    }

    async fn release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }
}

/// Strategy returning a fixed item list.
pub struct StaticStrategy {
    items: Vec<FeedItem>,
}

impl StaticStrategy {
    pub fn returning(items: Vec<FeedItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ExtractionStrategy for StaticStrategy {
    async fn extract(&self) -> Result<Vec<FeedItem>, FeedError> {
        Ok(self.items.clone())
    }
}

/// Strategy that fails outright, unlike the well-behaved production ones.
pub struct FailingStrategy;

#[async_trait]
impl ExtractionStrategy for FailingStrategy {
    async fn extract(&self) -> Result<Vec<FeedItem>, FeedError> {
        Err(FeedError::Session("extraction exploded".to_string()))
    }
}

/// [`InMemoryFeedRepository`] wrapper that counts batch saves.
pub struct CountingRepository {
    inner: InMemoryFeedRepository,
    batch_calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryFeedRepository::new(),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FeedRepository for CountingRepository {
    async fn save(&self, item: &FeedItem) -> Result<StoredFeed, FeedError> {
        self.inner.save(item).await
    }

    async fn save_batch(&self, items: &[FeedItem]) -> Result<Vec<StoredFeed>, FeedError> {
        self.batch_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.save_batch(items).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFeed>, FeedError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StoredFeed>, FeedError> {
        self.inner.find_by_date_range(start, end).await
    }

    async fn update_by_id(
        &self,
        id: &str,
        item: &FeedItem,
    ) -> Result<Option<StoredFeed>, FeedError> {
        self.inner.update_by_id(id, item).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, FeedError> {
        self.inner.delete_by_id(id).await
    }
}

/// Repository whose batch save always fails.
pub struct FailingBatchRepository;

#[async_trait]
impl FeedRepository for FailingBatchRepository {
    async fn save(&self, _item: &FeedItem) -> Result<StoredFeed, FeedError> {
        Err(storage_down())
    }

    async fn save_batch(&self, _items: &[FeedItem]) -> Result<Vec<StoredFeed>, FeedError> {
        Err(storage_down())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<StoredFeed>, FeedError> {
        Ok(None)
    }

    async fn find_by_date_range(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<StoredFeed>, FeedError> {
        Ok(Vec::new())
    }

    async fn update_by_id(
        &self,
        _id: &str,
        _item: &FeedItem,
    ) -> Result<Option<StoredFeed>, FeedError> {
        Ok(None)
    }

    async fn delete_by_id(&self, _id: &str) -> Result<bool, FeedError> {
        Ok(false)
    }
}

fn storage_down() -> FeedError {
    FeedError::Storage(mongodb::error::Error::custom("feed store offline"))
}
