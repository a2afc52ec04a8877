//! HTTP surface.
//!
//! Versioned feeds CRUD under `/api/v1`, plus a liveness probe. The
//! handlers speak the legacy response envelope
//! `{ "status", "description", "data" }` that existing consumers of the
//! feeds API expect.

pub mod handlers;

use crate::catalog::FeedCatalog;
use crate::repository::FeedRepository;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<FeedCatalog>,
    pub repository: Arc<dyn FeedRepository>,
}

/// Build the application router.
pub fn create_router(state: ApiState) -> Router {
    let api = Router::new()
        .route("/feeds", get(handlers::get_feeds))
        .route("/feeds", post(handlers::new_feed))
        .route("/feeds/{id}", get(handlers::get_feed_by_id))
        .route("/feeds/{id}", put(handlers::update_feed))
        .route("/feeds/{id}", delete(handlers::delete_feed));

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
