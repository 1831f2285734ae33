//! Database layer for Brewlog
//!
//! SQLite access through sqlx: pool initialization, idempotent schema
//! creation, and CRUD queries for beans, wishlist entries, and the
//! key-value settings store.

pub mod beans;
pub mod init;
pub mod settings;
pub mod wishlist;

pub use init::init_database;
