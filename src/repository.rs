//! Persistence port for feed items.
//!
//! The scraping core and the HTTP surface only ever see [`FeedRepository`];
//! the production adapter lives in [`crate::mongo`], and
//! [`InMemoryFeedRepository`] backs the test suites.

use crate::error::FeedError;
use crate::models::FeedItem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// A persisted [`FeedItem`] as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeed {
    pub id: String,
    #[serde(flatten)]
    pub item: FeedItem,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage operations the rest of the crate depends on.
///
/// `find_by_date_range` is half-open over the stored `updated_at`
/// timestamp: `[start, end)`.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    async fn save(&self, item: &FeedItem) -> Result<StoredFeed, FeedError>;

    /// Persist a scraped batch in one operation, returning the stored
    /// feeds in input order.
    async fn save_batch(&self, items: &[FeedItem]) -> Result<Vec<StoredFeed>, FeedError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFeed>, FeedError>;

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StoredFeed>, FeedError>;

    async fn update_by_id(
        &self,
        id: &str,
        item: &FeedItem,
    ) -> Result<Option<StoredFeed>, FeedError>;

    /// Delete a feed, reporting whether it existed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, FeedError>;
}

/// In-memory [`FeedRepository`] used by the unit and API test suites.
#[derive(Default)]
pub struct InMemoryFeedRepository {
    feeds: Mutex<Vec<StoredFeed>>,
    next_id: AtomicU64,
}

impl InMemoryFeedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&self) -> String {
        format!("feed-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl FeedRepository for InMemoryFeedRepository {
    async fn save(&self, item: &FeedItem) -> Result<StoredFeed, FeedError> {
        let now = Utc::now();
        let stored = StoredFeed {
            id: self.mint_id(),
            item: item.clone(),
            created_at: now,
            updated_at: now,
        };
        self.feeds.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn save_batch(&self, items: &[FeedItem]) -> Result<Vec<StoredFeed>, FeedError> {
        let now = Utc::now();
        let mut feeds = self.feeds.lock().await;
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            let stored = StoredFeed {
                id: self.mint_id(),
                item: item.clone(),
                created_at: now,
                updated_at: now,
            };
            feeds.push(stored.clone());
            saved.push(stored);
        }
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFeed>, FeedError> {
        let feeds = self.feeds.lock().await;
        Ok(feeds.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StoredFeed>, FeedError> {
        let feeds = self.feeds.lock().await;
        Ok(feeds
            .iter()
            .filter(|f| f.updated_at >= start && f.updated_at < end)
            .cloned()
            .collect())
    }

    async fn update_by_id(
        &self,
        id: &str,
        item: &FeedItem,
    ) -> Result<Option<StoredFeed>, FeedError> {
        let mut feeds = self.feeds.lock().await;
        match feeds.iter_mut().find(|f| f.id == id) {
            Some(stored) => {
                stored.item = item.clone();
                stored.updated_at = Utc::now();
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, FeedError> {
        let mut feeds = self.feeds.lock().await;
        let before = feeds.len();
        feeds.retain(|f| f.id != id);
        Ok(feeds.len() < before)
    }
}
