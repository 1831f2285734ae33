//! Enrichment handlers
//!
//! Both endpoints require a stored API key and fail with 400 before any
//! network traffic when none is configured.

use super::{server::AppContext, ApiError};
use axum::{extract::State, Json};
use brewlog_common::citation::{extract_citations, Citation};
use brewlog_common::db;
use brewlog_common::normalize::{normalize_external, NormalizedBean};
use crate::services::{EnrichmentError, Recommendation};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub name: String,
    pub roaster: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub bean: NormalizedBean,
    pub citations: Vec<Citation>,
}

/// POST /api/enrichment/lookup - Auto-fill bean details by name and roaster
pub async fn lookup(
    State(ctx): State<AppContext>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let api_key = db::settings::get_api_key(&ctx.db_pool)
        .await?
        .ok_or(EnrichmentError::MissingApiKey)?;

    info!(name = %request.name, roaster = %request.roaster, "Enrichment lookup");

    let record = ctx
        .enrichment
        .lookup_details(&api_key, &request.name, &request.roaster)
        .await?;

    let citations = match &record.sources {
        Some(sources) => extract_citations(sources),
        None => Vec::new(),
    };

    Ok(Json(LookupResponse {
        bean: normalize_external(&record),
        citations,
    }))
}

/// POST /api/enrichment/recommendations - Suggest new beans from the collection
pub async fn recommendations(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let api_key = db::settings::get_api_key(&ctx.db_pool)
        .await?
        .ok_or(EnrichmentError::MissingApiKey)?;

    let beans = db::beans::list_beans(&ctx.db_pool).await?;
    info!(bean_count = beans.len(), "Generating recommendations");

    let suggestions = ctx.enrichment.recommend(&api_key, &beans).await?;

    Ok(Json(suggestions))
}
