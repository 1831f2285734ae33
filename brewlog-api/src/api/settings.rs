//! Settings handlers
//!
//! Cost settings round-trip as a whole document. The enrichment API key is
//! write-only: GET reports whether one is configured, never the key itself.

use super::{server::AppContext, ApiError};
use axum::{extract::State, Json};
use brewlog_common::db;
use brewlog_common::models::CostSettings;
use serde::{Deserialize, Serialize};
use tracing::info;

/// GET /api/settings/costs
pub async fn get_cost_settings(
    State(ctx): State<AppContext>,
) -> Result<Json<CostSettings>, ApiError> {
    let settings = db::settings::get_cost_settings(&ctx.db_pool).await?;
    Ok(Json(settings))
}

/// PUT /api/settings/costs - Replace cost settings wholesale
pub async fn put_cost_settings(
    State(ctx): State<AppContext>,
    Json(settings): Json<CostSettings>,
) -> Result<Json<CostSettings>, ApiError> {
    db::settings::set_cost_settings(&ctx.db_pool, &settings).await?;
    info!("Updated cost settings");

    Ok(Json(settings))
}

#[derive(Debug, Serialize)]
pub struct EnrichmentStatus {
    pub configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct EnrichmentUpdate {
    pub api_key: String,
}

/// GET /api/settings/enrichment - Report whether an API key is configured
pub async fn get_enrichment_settings(
    State(ctx): State<AppContext>,
) -> Result<Json<EnrichmentStatus>, ApiError> {
    let key = db::settings::get_api_key(&ctx.db_pool).await?;
    Ok(Json(EnrichmentStatus {
        configured: key.is_some(),
    }))
}

/// PUT /api/settings/enrichment - Store the enrichment API key
pub async fn put_enrichment_settings(
    State(ctx): State<AppContext>,
    Json(update): Json<EnrichmentUpdate>,
) -> Result<Json<EnrichmentStatus>, ApiError> {
    db::settings::set_api_key(&ctx.db_pool, update.api_key.trim()).await?;
    info!("Updated enrichment API key");

    Ok(Json(EnrichmentStatus {
        configured: !update.api_key.trim().is_empty(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookSettings {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookUpdate {
    pub url: String,
}

/// GET /api/settings/webhook
pub async fn get_webhook_settings(
    State(ctx): State<AppContext>,
) -> Result<Json<WebhookSettings>, ApiError> {
    let url = db::settings::get_webhook_url(&ctx.db_pool).await?;
    Ok(Json(WebhookSettings { url }))
}

/// PUT /api/settings/webhook - Store the backup webhook URL
///
/// An empty string clears the URL; anything else must parse as http(s).
pub async fn put_webhook_settings(
    State(ctx): State<AppContext>,
    Json(update): Json<WebhookUpdate>,
) -> Result<Json<WebhookSettings>, ApiError> {
    let trimmed = update.url.trim();

    if !trimmed.is_empty() {
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| ApiError::BadRequest(format!("Invalid webhook URL: {}", e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::BadRequest(format!(
                "Invalid webhook URL scheme: {}",
                parsed.scheme()
            )));
        }
    }

    db::settings::set_webhook_url(&ctx.db_pool, trimmed).await?;
    info!("Updated backup webhook URL");

    Ok(Json(WebhookSettings {
        url: if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        },
    }))
}
