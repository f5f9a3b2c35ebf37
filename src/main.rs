//! Chata Booking Backend
//!
//! REST backend for a vacation rental website: calendar availability from
//! external ICS feeds, seasonal pricing, booking and contact inquiries, and a
//! small password-protected CMS with image uploads.

mod api;
mod auth;
mod calendar;
mod config;
mod content;
mod db;
mod errors;
mod intake;
mod models;
mod notify;
mod uploads;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use calendar::{AvailabilityService, HttpFeedFetcher, PricingRules};
use config::{Config, ContentBackend};
use content::{ContentService, ContentStore, FileContentStore};
use db::SqliteContentStore;
use notify::Notifier;
use uploads::UploadStore;

/// Multipart framing allowance on top of the upload size ceiling.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub availability: Arc<AvailabilityService>,
    pub pricing: Arc<PricingRules>,
    pub content: Arc<ContentService>,
    pub uploads: Arc<UploadStore>,
    pub sessions: Arc<SessionStore>,
    pub notifier: Arc<dyn Notifier>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Chata Booking Backend");
    tracing::info!("Content backend: {:?}", config.content_backend);
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Content persistence
    let store: Arc<dyn ContentStore> = match config.content_backend {
        ContentBackend::File => {
            tracing::info!("Content file: {:?}", config.content_path);
            Arc::new(FileContentStore::new(&config.content_path))
        }
        ContentBackend::Sqlite => {
            tracing::info!("Database path: {:?}", config.db_path);
            let pool = db::init_database(&config.db_path).await?;
            Arc::new(SqliteContentStore::new(pool))
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let fetcher = Arc::new(HttpFeedFetcher::new(config.fetch_timeout)?);
    let notifier = notify::from_config(&config)?;

    // Create application state
    let state = AppState {
        availability: Arc::new(AvailabilityService::new(
            fetcher,
            &config.ics_urls,
            config.availability_ttl,
        )),
        pricing: Arc::new(PricingRules::from_config(&config)),
        content: Arc::new(ContentService::new(store)),
        uploads: Arc::new(UploadStore::new(
            &config.upload_dir,
            config.max_upload_bytes,
        )),
        sessions: Arc::new(SessionStore::new(
            config.admin_password.as_deref(),
            config.session_ttl,
        )),
        notifier,
        config: Arc::new(config.clone()),
    };

    if !state.sessions.is_enabled() {
        tracing::warn!("No admin password configured (CHATA_ADMIN_PASSWORD). Content editing is disabled!");
    }

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the session store for the auth layer
    let sessions = state.sessions.clone();
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    // Admin routes
    let admin_routes = Router::new()
        .route("/admin/logout", post(api::logout))
        .route("/content", put(api::update_content))
        .route("/content/backups", get(api::list_backups))
        .route("/uploads", get(api::list_uploads).post(api::upload_file))
        .route("/uploads/{name}", delete(api::delete_upload))
        .layer(DefaultBodyLimit::max(upload_limit))
        // Apply session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(sessions.clone(), req, next)
        }));

    // Public routes
    let public_routes = Router::new()
        .route("/availability", get(api::get_availability))
        .route("/calendar", get(api::get_calendar))
        .route("/pricing/quote", get(api::get_quote))
        .route("/booking", post(api::submit_booking))
        .route("/contact", post(api::submit_contact))
        .route("/content", get(api::get_content))
        .route("/admin/login", post(api::login));

    // Health check and stored images (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));
    let upload_files = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .nest_service(uploads::PUBLIC_PREFIX, upload_files)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
