//! Settings database access
//!
//! Read/write settings from the settings table (key-value store). Holds the
//! cost settings (one JSON object, overwritten wholesale on any edit), the
//! enrichment API key, and the backup webhook URL.

use crate::error::{Error, Result};
use crate::models::CostSettings;
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Settings-store key for the cost settings JSON object
pub const COST_SETTINGS_KEY: &str = "cost_settings";

/// Settings-store key for the enrichment service API key
pub const API_KEY_KEY: &str = "enrichment_api_key";

/// Settings-store key for the backup webhook URL
pub const WEBHOOK_URL_KEY: &str = "backup_webhook_url";

/// Get cost settings, falling back to (and persisting) defaults when unset
pub async fn get_cost_settings(db: &Pool<Sqlite>) -> Result<CostSettings> {
    match get_setting::<String>(db, COST_SETTINGS_KEY).await? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => {
            let defaults = CostSettings::default();
            set_cost_settings(db, &defaults).await?;
            Ok(defaults)
        }
    }
}

/// Overwrite cost settings wholesale
pub async fn set_cost_settings(db: &Pool<Sqlite>, settings: &CostSettings) -> Result<()> {
    set_setting(db, COST_SETTINGS_KEY, serde_json::to_string(settings)?).await
}

/// Get the enrichment API key, if one has been saved
pub async fn get_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    let key = get_setting::<String>(db, API_KEY_KEY).await?;
    Ok(key.filter(|k| !k.is_empty()))
}

/// Save the enrichment API key
pub async fn set_api_key(db: &Pool<Sqlite>, api_key: &str) -> Result<()> {
    set_setting(db, API_KEY_KEY, api_key.to_string()).await
}

/// Get the backup webhook URL, if one has been saved
pub async fn get_webhook_url(db: &Pool<Sqlite>) -> Result<Option<String>> {
    let url = get_setting::<String>(db, WEBHOOK_URL_KEY).await?;
    Ok(url.filter(|u| !u.is_empty()))
}

/// Save the backup webhook URL
pub async fn set_webhook_url(db: &Pool<Sqlite>, url: &str) -> Result<()> {
    set_setting(db, WEBHOOK_URL_KEY, url.to_string()).await
}

/// Generic setting getter
///
/// Returns None if key doesn't exist in database.
/// Parses value from string using FromStr trait.
pub async fn get_setting<T: FromStr>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match value {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    let value_str = value.to_string();

    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}
