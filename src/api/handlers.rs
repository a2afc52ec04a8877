//! Feeds CRUD handlers.

use super::ApiState;
use crate::error::FeedError;
use crate::models::FeedItem;
use crate::repository::StoredFeed;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Response envelope consumed by the legacy feeds clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct LegacyResponse<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> LegacyResponse<T> {
    fn ok(description: &str, data: T) -> Self {
        Self {
            status: 200,
            description: Some(description.to_string()),
            data: Some(data),
        }
    }
}

/// Transport wrapper around [`FeedError`].
///
/// Validation problems surface as 400 with their message, unknown ids as
/// 404; everything else is logged server-side and sanitized to a generic
/// 500 so internals never leak to clients.
pub struct ApiError(FeedError);

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, description) = match &self.0 {
            FeedError::MissingRequiredFields
            | FeedError::InvalidLink(_)
            | FeedError::InvalidId(_) => {
                warn!(error = %self.0, "Rejected feed request");
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            FeedError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            _ => {
                error!(error = %self.0, "Feed request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred".to_string(),
                )
            }
        };
        let body = LegacyResponse::<()> {
            status: status.as_u16(),
            description: Some(description),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Incoming feed payload. Missing fields default to empty strings and are
/// rejected by the builder, mirroring the validation the scrapers get.
#[derive(Debug, Deserialize)]
pub struct FeedInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub link: String,
}

impl FeedInput {
    fn into_item(self) -> Result<FeedItem, FeedError> {
        FeedItem::builder()
            .title(self.title)
            .description(self.description)
            .author(self.author)
            .journal(self.journal)
            .link(self.link)
            .build()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_feeds(
    State(state): State<ApiState>,
) -> Result<Json<LegacyResponse<Vec<StoredFeed>>>, ApiError> {
    let feeds = state.catalog.get_feeds().await?;
    Ok(Json(LegacyResponse::ok("Feeds delivered successfully", feeds)))
}

pub async fn new_feed(
    State(state): State<ApiState>,
    Json(input): Json<FeedInput>,
) -> Result<Json<LegacyResponse<StoredFeed>>, ApiError> {
    let item = input.into_item()?;
    let saved = state.repository.save(&item).await?;
    Ok(Json(LegacyResponse::ok("Feed was created successfully", saved)))
}

pub async fn get_feed_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<LegacyResponse<StoredFeed>>, ApiError> {
    match state.repository.find_by_id(&id).await? {
        Some(feed) => Ok(Json(LegacyResponse::ok("Feed delivered successfully", feed))),
        None => Err(FeedError::NotFound(id).into()),
    }
}

pub async fn update_feed(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(input): Json<FeedInput>,
) -> Result<Json<LegacyResponse<StoredFeed>>, ApiError> {
    let item = input.into_item()?;
    match state.repository.update_by_id(&id, &item).await? {
        Some(feed) => Ok(Json(LegacyResponse::ok("Feed was updated successfully", feed))),
        None => Err(FeedError::NotFound(id).into()),
    }
}

pub async fn delete_feed(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<LegacyResponse<()>>, ApiError> {
    if state.repository.delete_by_id(&id).await? {
        Ok(Json(LegacyResponse {
            status: 200,
            description: Some("Feed was deleted successfully".to_string()),
            data: None,
        }))
    } else {
        Err(FeedError::NotFound(id).into())
    }
}
