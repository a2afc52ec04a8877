//! Service entry point: configuration, storage connection, HTTP serving.

use clap::Parser;
use mongodb::bson::doc;
use mongodb::Client;
use prensa_feeds::api::{self, ApiState};
use prensa_feeds::browser::ChromiumSessionManager;
use prensa_feeds::catalog::FeedCatalog;
use prensa_feeds::cli::Cli;
use prensa_feeds::mongo::MongoFeedRepository;
use prensa_feeds::orchestrator::ScrapeOrchestrator;
use prensa_feeds::repository::FeedRepository;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    info!(bind = %args.bind, db = %args.mongo_db, "prensa_feeds starting up");

    // --- Storage connection (fail fast) ---
    let client = Client::with_uri_str(&args.mongo_uri).await?;
    let database = client.database(&args.mongo_db);
    if let Err(e) = database.run_command(doc! { "ping": 1 }).await {
        error!(error = %e, "Database connection failed");
        return Err(e.into());
    }
    info!("Database connection was successful");

    // --- Wiring ---
    let repository: Arc<dyn FeedRepository> = Arc::new(MongoFeedRepository::new(&database));
    let sessions = Arc::new(ChromiumSessionManager::new(args.chromium_path.clone()));
    let orchestrator = ScrapeOrchestrator::new(sessions, repository.clone());
    let catalog = Arc::new(FeedCatalog::new(repository.clone(), orchestrator));

    let app = api::create_router(ApiState {
        catalog,
        repository,
    });

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!(addr = %args.bind, "Server is running");
    axum::serve(listener, app).await?;

    Ok(())
}
