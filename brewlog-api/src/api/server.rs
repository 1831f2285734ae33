//! HTTP server setup and routing
//!
//! Sets up the Axum HTTP server with routes for the bean collection, the
//! wishlist, settings, enrichment, and the backup webhook.

use crate::services::{BackupNotifier, EnrichmentClient};
use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application context passed to all handlers
///
/// **Note:** AppContext implements Clone, which gives us `FromRef<AppContext>`
/// for free via Axum's blanket implementation.
#[derive(Clone)]
pub struct AppContext {
    pub db_pool: Pool<Sqlite>,
    pub enrichment: Arc<EnrichmentClient>,
    pub notifier: Arc<BackupNotifier>,
}

/// Create the API router
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Bean collection
        .route("/api/coffee-beans", get(super::beans::list_beans))
        .route("/api/coffee-beans", post(super::beans::create_bean))
        .route("/api/coffee-beans/:id", get(super::beans::get_bean))
        .route("/api/coffee-beans/:id", put(super::beans::update_bean))
        .route("/api/coffee-beans/:id", delete(super::beans::delete_bean))
        .route("/api/coffee-beans/:id/costs", get(super::beans::get_bean_costs))
        .route(
            "/api/coffee-beans/:id/repurchase",
            post(super::beans::record_repurchase),
        )
        // Wishlist
        .route("/api/wishlist", get(super::wishlist::list_wishlist))
        .route("/api/wishlist", post(super::wishlist::create_wishlist_bean))
        .route("/api/wishlist/:id", put(super::wishlist::update_wishlist_bean))
        .route("/api/wishlist/:id", delete(super::wishlist::delete_wishlist_bean))
        // Settings
        .route("/api/settings/costs", get(super::settings::get_cost_settings))
        .route("/api/settings/costs", put(super::settings::put_cost_settings))
        .route("/api/settings/enrichment", get(super::settings::get_enrichment_settings))
        .route("/api/settings/enrichment", put(super::settings::put_enrichment_settings))
        .route("/api/settings/webhook", get(super::settings::get_webhook_settings))
        .route("/api/settings/webhook", put(super::settings::put_webhook_settings))
        // Enrichment
        .route("/api/enrichment/lookup", post(super::enrichment::lookup))
        .route(
            "/api/enrichment/recommendations",
            post(super::enrichment::recommendations),
        )
        // Backup webhook
        .route("/api/backup", post(super::backup::trigger_backup))
        // Attach application context
        .with_state(ctx)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// GET /health - Health check endpoint
async fn health(State(_ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "module": "brewlog-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
