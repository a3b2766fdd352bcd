//! Footballower API
//!
//! REST API and CLI for Premier League standings, recent results and
//! fixtures, and per-user favourite teams.

mod auth;
mod cli;
mod config;
mod routes;
mod scraper;
mod storage;
mod teams;
mod types;

use axum::http::header::{self, HeaderValue};
use axum::http::Method;
use axum::{
    routing::{delete, get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::routes::AppState;
use crate::scraper::PageClient;
use crate::storage::UserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => run_server(Some(host), Some(port)).await,
        Commands::Standings { url } => cli::run_standings(url).await,
        Commands::Matches { url } => cli::run_matches(url).await,
    }
}

/// Run the API server.
async fn run_server(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footballower_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("Database path: {}", config.database.path);

    let repo = UserRepository::new(Path::new(&config.database.path))?;
    let client = PageClient::new(&config.scraper)?;

    // The frontend sends credentialed requests from its own origin
    let cors = CorsLayer::new()
        .allow_origin(config.cors.allowed_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    // Create application state
    let state = Arc::new(AppState {
        repo: Mutex::new(repo),
        client,
        profiles: teams::profile_index(),
        config: config.clone(),
    });

    // Build router
    let app = Router::new()
        .route("/", get(routes::standings))
        .route("/latestMatch", get(routes::latest_match))
        .route("/health", get(routes::health))
        .route("/register", post(routes::register))
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/getFav", get(routes::get_favorites))
        .route("/addFavorite", post(routes::add_favorite))
        .route("/deleteFavorite", delete(routes::delete_favorite))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
