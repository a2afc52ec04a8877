//! MongoDB adapter for the persistence port.
//!
//! Feeds live in a single `feeds` collection. Documents carry
//! `createdAt` / `updatedAt` timestamps maintained on every write; the
//! day-window range query filters on `updatedAt`. Reads go back through
//! the domain builder, so a document that drifted out of shape fails
//! loudly instead of leaking an invalid item.

use crate::error::FeedError;
use crate::models::FeedItem;
use crate::repository::{FeedRepository, StoredFeed};
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, DateTime as BsonDateTime};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Collection holding all feed documents.
pub const FEEDS_COLLECTION: &str = "feeds";

#[derive(Debug, Serialize, Deserialize)]
struct FeedDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: String,
    author: String,
    journal: String,
    link: String,
    #[serde(
        rename = "createdAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    created_at: DateTime<Utc>,
    #[serde(
        rename = "updatedAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    updated_at: DateTime<Utc>,
}

impl FeedDocument {
    /// New document for `item`, with a client-minted id and both
    /// timestamps set to `now`.
    fn from_item(item: &FeedItem, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            title: item.title.clone(),
            description: item.description.clone(),
            author: item.author.clone(),
            journal: item.journal.clone(),
            link: item.link.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Map back to the domain through the validating builder.
    fn into_stored(self) -> Result<StoredFeed, FeedError> {
        let item = FeedItem::builder()
            .title(self.title)
            .description(self.description)
            .author(self.author)
            .journal(self.journal)
            .link(self.link)
            .build()?;
        Ok(StoredFeed {
            id: self.id.to_hex(),
            item,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_id(id: &str) -> Result<ObjectId, FeedError> {
    ObjectId::parse_str(id).map_err(|_| FeedError::InvalidId(id.to_string()))
}

/// [`FeedRepository`] backed by a MongoDB collection.
pub struct MongoFeedRepository {
    collection: Collection<FeedDocument>,
}

impl MongoFeedRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(FEEDS_COLLECTION),
        }
    }
}

#[async_trait]
impl FeedRepository for MongoFeedRepository {
    async fn save(&self, item: &FeedItem) -> Result<StoredFeed, FeedError> {
        let document = FeedDocument::from_item(item, Utc::now());
        self.collection.insert_one(&document).await?;
        document.into_stored()
    }

    #[instrument(level = "info", skip_all, fields(count = items.len()))]
    async fn save_batch(&self, items: &[FeedItem]) -> Result<Vec<StoredFeed>, FeedError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let documents: Vec<FeedDocument> = items
            .iter()
            .map(|item| FeedDocument::from_item(item, now))
            .collect();
        self.collection.insert_many(&documents).await?;
        info!(count = documents.len(), "Saved feed batch");
        documents
            .into_iter()
            .map(FeedDocument::into_stored)
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredFeed>, FeedError> {
        let oid = parse_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(FeedDocument::into_stored)
            .transpose()
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StoredFeed>, FeedError> {
        let filter = doc! {
            "updatedAt": {
                "$gte": BsonDateTime::from_chrono(start),
                "$lt": BsonDateTime::from_chrono(end),
            }
        };
        let documents: Vec<FeedDocument> =
            self.collection.find(filter).await?.try_collect().await?;
        documents
            .into_iter()
            .map(FeedDocument::into_stored)
            .collect()
    }

    async fn update_by_id(
        &self,
        id: &str,
        item: &FeedItem,
    ) -> Result<Option<StoredFeed>, FeedError> {
        let oid = parse_id(id)?;
        let update = doc! {
            "$set": {
                "title": &item.title,
                "description": &item.description,
                "author": &item.author,
                "journal": &item.journal,
                "link": &item.link,
                "updatedAt": BsonDateTime::from_chrono(Utc::now()),
            }
        };
        self.collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?
            .map(FeedDocument::into_stored)
            .transpose()
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, FeedError> {
        let oid = parse_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}
