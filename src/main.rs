//! DongneLink Backend
//!
//! Neighborhood community platform: local posts, business listings with an
//! admin approval workflow, reviews, and local/Kakao login.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod kakao;
mod locations;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::UserRepository;
use kakao::KakaoClient;
use locations::LocationDirectory;
use store::ListingStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<UserRepository>,
    pub store: Arc<ListingStore>,
    pub locations: Arc<LocationDirectory>,
    pub kakao: Option<Arc<KakaoClient>>,
    pub config: Arc<Config>,
    cookie_key: Key,
}

impl axum::extract::FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DongneLink Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Static directory: {:?}", config.static_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.kakao_client_id.is_none() {
        tracing::warn!("No KAKAO_CLIENT_ID configured. Kakao login is disabled!");
    }
    if config.session_secret.is_none() {
        tracing::warn!(
            "No DONGNE_SESSION_SECRET configured. Sessions will not survive a restart!"
        );
    }

    // Initialize the user database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(UserRepository::new(pool));

    // Load the region directory
    let directory = LocationDirectory::load()?;

    // Kakao federation client
    let kakao = match &config.kakao_client_id {
        Some(client_id) => Some(Arc::new(KakaoClient::new(
            client_id.clone(),
            config.kakao_redirect_uri.clone(),
        )?)),
        None => None,
    };

    // Upload directories
    tokio::fs::create_dir_all(config.upload_dir()).await?;
    tokio::fs::create_dir_all(config.lifestyle_dir()).await?;

    let cookie_key = config.cookie_key();

    let state = AppState {
        repo,
        store: Arc::new(ListingStore::new()),
        locations: Arc::new(directory),
        kakao,
        config: Arc::new(config.clone()),
        cookie_key,
    };

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
    // CORS configuration (the location APIs get consumed cross-origin)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Home and selectors
        .route("/", get(api::home))
        .route("/select-location", get(api::select_location))
        // Region lookups
        .route("/api/locations/sido", get(api::api_sido))
        .route("/api/locations/sigungu", get(api::api_sigungu))
        .route("/api/locations/dong", get(api::api_dong))
        // Community posts
        .route("/lifestyle", get(api::lifestyle_page))
        .route(
            "/lifestyle/new",
            get(api::lifestyle_new_page).post(api::lifestyle_new),
        )
        // Business listings
        .route("/food", get(api::food_list))
        .route("/repair", get(api::repair_list))
        .route("/business/register", get(api::business_register_page))
        .route("/business/new", post(api::business_new))
        .route("/business/{id}", get(api::business_detail))
        .route("/business/{id}/review", post(api::add_review))
        .route(
            "/business/{id}/edit",
            get(api::business_edit_page).post(api::business_edit),
        )
        .route("/business/{id}/delete", post(api::business_delete))
        .route("/business/{id}/pay-entry", post(api::pay_entry))
        .route("/my/businesses", get(api::my_businesses))
        // Admin
        .route("/admin", get(api::admin_home))
        .route("/admin/businesses/pending", get(api::pending_businesses))
        .route("/admin/businesses/{id}/approve", post(api::approve_business))
        .route("/admin/businesses/{id}/reject", post(api::reject_business))
        // Accounts
        .route(
            "/auth/register",
            get(api::register_page).post(api::register),
        )
        .route("/auth/login", get(api::login_page).post(api::login))
        .route("/auth/logout", get(api::logout))
        .route("/auth/kakao/login", get(api::kakao_login))
        .route("/auth/kakao/callback", get(api::kakao_callback))
        // Uploaded images
        .nest_service("/static", ServeDir::new(static_dir))
        // Health check
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
