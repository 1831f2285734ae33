//! Data model for Brewlog records
//!
//! Canonical types shared by the persistence layer and the HTTP API.
//! Weight is always stored in grams; ounce inputs are converted before
//! persisting. Tasting note lists never contain duplicates within one bean.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed roast-level vocabulary, ordered light to dark.
///
/// Roast level is stored as a free string and is not validated against this
/// list on write; the list exists for form population and for the normalizer
/// fallback. Unknown values read back exactly as written.
pub const ROAST_LEVELS: [&str; 5] = ["Light", "Medium-Light", "Medium", "Medium-Dark", "Dark"];

/// Roast level applied when an external record carries none.
pub const DEFAULT_ROAST_LEVEL: &str = "Medium";

/// Valid rank range (0 = not yet rated / recommendation placeholder)
pub const MIN_RANK: i64 = 0;
pub const MAX_RANK: i64 = 5;

/// A logged coffee bean with brew and commerce metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoffeeBean {
    /// Store-assigned identity; immutable after creation
    pub id: Uuid,
    pub name: String,
    pub roaster: String,
    pub origin: String,
    /// One of ROAST_LEVELS by convention; stored as written
    pub roast_level: String,
    /// Ordered tasting notes, no duplicates within one bean
    pub notes: Vec<String>,
    pub general_notes: String,
    /// Integer rating 0-5; 0 means not yet rated
    pub rank: i64,
    /// Dose in grams per brew
    pub grams_in: f64,
    /// Yield in milliliters
    pub ml_out: f64,
    /// Brew time in seconds
    pub brew_time: i64,
    /// Brew temperature in degrees Celsius
    pub temperature: f64,
    /// Grinder-specific scale value
    pub grind_size: f64,
    /// Purchase price in currency units
    pub price: f64,
    /// Bag weight in grams (canonical unit regardless of input unit)
    pub weight: f64,
    pub order_again: bool,
    /// Times this bean has been purchased (incremented on repurchase)
    pub purchase_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a bean
///
/// The store assigns the id (unless the client supplies one, as the local
/// JSON API allows) and both timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCoffeeBean {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub roaster: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default = "default_roast_level")]
    pub roast_level: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub general_notes: String,
    #[serde(default)]
    pub rank: i64,
    pub grams_in: f64,
    pub ml_out: f64,
    pub brew_time: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    pub grind_size: f64,
    pub price: f64,
    pub weight: f64,
    #[serde(default)]
    pub order_again: bool,
    #[serde(default = "default_purchase_count")]
    pub purchase_count: i64,
}

fn default_roast_level() -> String {
    DEFAULT_ROAST_LEVEL.to_string()
}

fn default_temperature() -> f64 {
    93.0
}

fn default_purchase_count() -> i64 {
    1
}

/// Partial update of a bean: any subset of non-id fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoffeeBeanPatch {
    pub name: Option<String>,
    pub roaster: Option<String>,
    pub origin: Option<String>,
    pub roast_level: Option<String>,
    pub notes: Option<Vec<String>>,
    pub general_notes: Option<String>,
    pub rank: Option<i64>,
    pub grams_in: Option<f64>,
    pub ml_out: Option<f64>,
    pub brew_time: Option<i64>,
    pub temperature: Option<f64>,
    pub grind_size: Option<f64>,
    pub price: Option<f64>,
    pub weight: Option<f64>,
    pub order_again: Option<bool>,
    pub purchase_count: Option<i64>,
}

/// A bean the user intends to buy; independent lifecycle from the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistBean {
    pub id: Uuid,
    pub name: String,
    pub roaster: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a wishlist entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWishlistBean {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub roaster: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a wishlist entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WishlistBeanPatch {
    pub name: Option<String>,
    pub roaster: Option<String>,
    pub notes: Option<String>,
}

/// User-scoped latte ingredient pricing
///
/// Persisted wholesale as one settings-store object; any field edit
/// overwrites the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSettings {
    /// Price of one milk container
    pub milk_price: f64,
    /// Milk container size in milliliters
    pub milk_size_ml: f64,
    /// Milk used per latte in milliliters
    pub milk_per_latte_ml: f64,
    /// Price of one syrup bottle
    pub syrup_price: f64,
    /// Syrup bottle size in milliliters
    pub syrup_size_ml: f64,
    /// Syrup used per latte in milliliters
    pub syrup_per_latte_ml: f64,
}

impl Default for CostSettings {
    /// Safe defaults applied when no settings have been saved.
    /// The syrup figures work out to 0.50 per latte.
    fn default() -> Self {
        Self {
            milk_price: 4.99,
            milk_size_ml: 1000.0,
            milk_per_latte_ml: 200.0,
            syrup_price: 12.50,
            syrup_size_ml: 750.0,
            syrup_per_latte_ml: 30.0,
        }
    }
}

/// Remove duplicate tasting notes, preserving first-occurrence order
pub fn dedupe_notes(notes: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    notes
        .into_iter()
        .filter(|note| seen.insert(note.clone()))
        .collect()
}

/// Clamp a rank into the valid 0-5 range
pub fn clamp_rank(rank: i64) -> i64 {
    rank.clamp(MIN_RANK, MAX_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_notes_preserves_order() {
        let notes = vec![
            "Chocolate".to_string(),
            "Cherry".to_string(),
            "Chocolate".to_string(),
            "Floral".to_string(),
        ];
        assert_eq!(dedupe_notes(notes), vec!["Chocolate", "Cherry", "Floral"]);
    }

    #[test]
    fn test_dedupe_notes_empty() {
        assert!(dedupe_notes(vec![]).is_empty());
    }

    #[test]
    fn test_clamp_rank() {
        assert_eq!(clamp_rank(-3), 0);
        assert_eq!(clamp_rank(0), 0);
        assert_eq!(clamp_rank(4), 4);
        assert_eq!(clamp_rank(9), 5);
    }

    #[test]
    fn test_cost_settings_defaults() {
        let s = CostSettings::default();
        assert_eq!(s.milk_price, 4.99);
        assert_eq!(s.milk_size_ml, 1000.0);
        assert_eq!(s.milk_per_latte_ml, 200.0);
        // Syrup defaults must come out to 0.50 per latte
        let per_latte = s.syrup_price / s.syrup_size_ml * s.syrup_per_latte_ml;
        assert!((per_latte - 0.50).abs() < 1e-9);
    }

    #[test]
    fn test_new_bean_deserializes_with_defaults() {
        let json = r#"{
            "name": "Geometry",
            "roaster": "Onyx Coffee Lab",
            "grams_in": 18.0,
            "ml_out": 36.0,
            "brew_time": 28,
            "grind_size": 15.0,
            "price": 18.0,
            "weight": 283.0
        }"#;
        let bean: NewCoffeeBean = serde_json::from_str(json).unwrap();
        assert_eq!(bean.roast_level, "Medium");
        assert_eq!(bean.purchase_count, 1);
        assert!(bean.id.is_none());
        assert!(!bean.order_again);
    }
}
