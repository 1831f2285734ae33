//! Backup trigger handler

use super::{server::AppContext, ApiError};
use axum::{extract::State, http::StatusCode, Json};
use brewlog_common::db;
use serde_json::json;
use tracing::info;

/// POST /api/backup - Push the full collection to the configured webhook
///
/// Returns 202 as soon as the send is spawned. Delivery is fire-and-forget;
/// the caller learns nothing about the webhook's response.
pub async fn trigger_backup(
    State(ctx): State<AppContext>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let url = db::settings::get_webhook_url(&ctx.db_pool)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No backup webhook URL configured".to_string()))?;

    let beans = db::beans::list_beans(&ctx.db_pool).await?;
    let bean_count = beans.len();
    info!(bean_count, "Backup requested");

    let notifier = ctx.notifier.clone();
    tokio::spawn(async move {
        notifier.send_backup(&url, beans).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "sending", "bean_count": bean_count })),
    ))
}
