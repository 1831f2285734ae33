//! # Brewlog Common Library
//!
//! Shared code for the Brewlog coffee journal including:
//! - Data model (beans, wishlist, cost settings)
//! - Unit conversion and cost derivation
//! - External-record normalization
//! - Collection filtering and sorting
//! - Source-citation extraction
//! - SQLite persistence layer
//! - Configuration loading

pub mod citation;
pub mod config;
pub mod cost;
pub mod db;
pub mod error;
pub mod models;
pub mod normalize;
pub mod query;
pub mod units;

pub use error::{Error, Result};
pub use models::{CoffeeBean, CostSettings, WishlistBean};
