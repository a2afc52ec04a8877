//! # Prensa Feeds
//!
//! A feeds service for Spanish front-page news. Requests for the day's
//! feeds are served from MongoDB when today's batch already exists;
//! otherwise a shared headless Chromium session is started, the
//! configured front pages (El País and El Mundo) are scraped
//! concurrently, and the merged batch is persisted and returned.
//!
//! ## Architecture
//!
//! - [`models`]: the validated [`models::FeedItem`] domain value
//! - [`browser`]: browser-automation port and the Chromium session manager
//! - [`scrapers`]: the per-source extraction strategies
//! - [`orchestrator`]: the scrape cycle (fan-out, merge, batch save)
//! - [`catalog`]: the day-window read-through decision
//! - [`repository`] / [`mongo`]: persistence port and MongoDB adapter
//! - [`api`]: axum CRUD surface under `/api/v1`

pub mod api;
pub mod browser;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod models;
pub mod mongo;
pub mod orchestrator;
pub mod repository;
pub mod scrapers;

#[cfg(test)]
pub mod testing;
