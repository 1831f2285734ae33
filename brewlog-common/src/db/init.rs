//! Database initialization
//!
//! Creates the database file on first run, applies the schema idempotently,
//! and seeds default settings. Safe to call on every startup.

use crate::models::CostSettings;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Set busy timeout so concurrent handlers wait instead of erroring
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_coffee_beans_table(&pool).await?;
    create_wishlist_beans_table(&pool).await?;
    create_settings_table(&pool).await?;

    // Seed default settings
    init_default_settings(&pool).await?;

    Ok(pool)
}

async fn create_coffee_beans_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coffee_beans (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            roaster TEXT NOT NULL,
            origin TEXT NOT NULL DEFAULT '',
            roast_level TEXT NOT NULL DEFAULT 'Medium',
            notes TEXT NOT NULL DEFAULT '[]',
            general_notes TEXT NOT NULL DEFAULT '',
            rank INTEGER NOT NULL DEFAULT 0,
            grams_in REAL NOT NULL,
            ml_out REAL NOT NULL,
            brew_time INTEGER NOT NULL,
            temperature REAL NOT NULL,
            grind_size REAL NOT NULL,
            price REAL NOT NULL DEFAULT 0,
            weight REAL NOT NULL DEFAULT 0,
            order_again INTEGER NOT NULL DEFAULT 0,
            purchase_count INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_wishlist_beans_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wishlist_beans (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            roaster TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores configuration key-value pairs: cost settings (one JSON object),
/// the enrichment API key, and the backup webhook URL.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed settings that must exist with defaults; never overwrites user values
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    let defaults = serde_json::to_string(&CostSettings::default())?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO settings (key, value)
        VALUES (?, ?)
        "#,
    )
    .bind(super::settings::COST_SETTINGS_KEY)
    .bind(defaults)
    .execute(pool)
    .await?;

    Ok(())
}
