//! Wayfarer - travel-planning agent dispatch service
//!
//! A Rust backend that routes chat messages to specialist travel
//! agents and mirrors the conversation log to clients in realtime.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer::api::{create_router, AppState};
use wayfarer::config::AppConfig;
use wayfarer::db::Database;
use wayfarer::dispatch::Dispatcher;
use wayfarer::flights::AmadeusGateway;
use wayfarer::llm::{GatewayAdvisor, TracedAdvisor};
use wayfarer::store::MessageStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&config.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;

    if config.advisory.api_key.is_none() {
        tracing::warn!("No advisory API key configured. Set ADVISORY_API_KEY.");
    }
    if config.flights.client_id.is_none() || config.flights.client_secret.is_none() {
        tracing::warn!(
            "No flight provider credentials configured. Flight turns will degrade to \
             general guidance. Set AMADEUS_API_KEY and AMADEUS_API_SECRET."
        );
    }

    let store = Arc::new(MessageStore::new(db));
    let advisor = Arc::new(TracedAdvisor::new(Arc::new(GatewayAdvisor::new(
        &config.advisory,
    ))));
    let flights = Arc::new(AmadeusGateway::new(&config.flights));
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), advisor, flights));

    let state = AppState::new(dispatcher, store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Wayfarer server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
