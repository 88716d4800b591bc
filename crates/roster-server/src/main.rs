//! Roster Server
//!
//! HTTP front for the users resource and the profiles and posts that hang
//! off it. All records live in process memory.

mod handlers;
mod settings;

use anyhow::{anyhow, Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use roster_core::{Database, RelationshipMaintainer, UnsubscribeGuard};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use settings::{LogFormat, ServerConfig};

const DEFAULT_LOG_FILTER: &str = "roster_server=info,roster_core=info,tower_http=info";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub maintainer: Arc<RelationshipMaintainer>,
}

impl AppState {
    pub fn new(db: Database, guard: UnsubscribeGuard) -> Self {
        let maintainer = Arc::new(RelationshipMaintainer::new(db.clone(), guard));
        Self { db, maintainer }
    }
}

#[tokio::main]
async fn main() {
    install_panic_hook();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(config.log_format) {
        eprintln!("[FATAL] Failed to initialize logging: {:#}", e);
        std::process::exit(1);
    }

    info!("Starting Roster Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Report panics on stderr and through `tracing`, which may not be up yet
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        eprintln!("[PANIC] {} ({})", payload, location);
        error!(%location, "panic: {}", payload);
    }));
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
    }
    .map_err(|e| anyhow!(e))
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: bind={}, unsubscribe_guard={}, log_format={:?}",
        config.bind_address, config.unsubscribe_guard, config.log_format
    );

    let state = AppState::new(Database::in_memory(), config.unsubscribe_guard);
    info!("In-memory collections initialized");

    let app = app(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub(crate) fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/users/:id",
            get(handlers::users::get)
                .delete(handlers::users::delete)
                .patch(handlers::users::patch),
        )
        .route(
            "/users/:id/subscribeTo",
            post(handlers::users::subscribe_to),
        )
        .route(
            "/users/:id/unsubscribeFrom",
            post(handlers::users::unsubscribe_from),
        )
        .route(
            "/profiles",
            get(handlers::profiles::list).post(handlers::profiles::create),
        )
        .route(
            "/profiles/:id",
            get(handlers::profiles::get)
                .delete(handlers::profiles::delete)
                .patch(handlers::profiles::patch),
        )
        .route(
            "/posts",
            get(handlers::posts::list).post(handlers::posts::create),
        )
        .route(
            "/posts/:id",
            get(handlers::posts::get)
                .delete(handlers::posts::delete)
                .patch(handlers::posts::patch),
        )
}
