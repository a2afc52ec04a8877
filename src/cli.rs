//! Command-line interface definitions for the feeds service.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment
//! variables.

use clap::Parser;

/// Command-line arguments for the feeds service.
///
/// # Examples
///
/// ```sh
/// # Local development against a default MongoDB
/// prensa_feeds
///
/// # Production-style invocation
/// prensa_feeds --bind 0.0.0.0:8080 \
///     --mongo-uri mongodb://feeds-db:27017 \
///     --chromium-path /usr/bin/chromium-browser
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(short, long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URI", default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGO_DB", default_value = "prensa")]
    pub mongo_db: String,

    /// Explicit Chromium executable path (auto-discovered when omitted)
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,
}
