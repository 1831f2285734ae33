//! Cost derivation engine
//!
//! Computes per-gram, per-shot, per-ounce and per-latte figures from a bean
//! record plus the user's milk/syrup pricing. Division guards clamp the
//! denominators rather than erroring: a zero-weight bag produces figures that
//! render as "0.00" instead of failing the page.

use crate::models::{CoffeeBean, CostSettings};
use serde::Serialize;

/// Grams-per-ounce figure used for the per-ounce price display.
/// Deliberately the coarser 28.35 rather than units::GRAMS_PER_OZ; the
/// journal has always displayed per-ounce prices against round ounces.
const DISPLAY_GRAMS_PER_OZ: f64 = 28.35;

/// Raw derived cost figures, before money formatting
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub cost_per_gram: f64,
    pub cost_per_shot: f64,
    /// Whole shots obtainable from one bag; never negative
    pub shots_per_bag: i64,
    pub cost_per_oz: f64,
    pub cost_per_latte: f64,
}

/// Display-ready cost figures; monetary values carry exactly two decimals
/// and anything non-positive is masked to "0.00"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostDisplay {
    pub cost_per_gram: String,
    pub cost_per_shot: String,
    pub shots_per_bag: i64,
    pub cost_per_oz: String,
    pub cost_per_latte: String,
}

/// Derive cost figures for one bean under the given settings
pub fn derive_costs(bean: &CoffeeBean, settings: &CostSettings) -> CostBreakdown {
    let cost_per_gram = bean.price / bean.weight.max(1.0);
    let cost_per_shot = cost_per_gram * bean.grams_in;

    let shots = (bean.weight / bean.grams_in.max(1.0)).floor() as i64;
    let shots_per_bag = shots.max(0);

    let cost_per_oz = bean.price / (bean.weight / DISPLAY_GRAMS_PER_OZ);

    let milk_cost_per_ml = settings.milk_price / settings.milk_size_ml.max(1.0);
    let syrup_price_per_latte =
        settings.syrup_price / settings.syrup_size_ml.max(1.0) * settings.syrup_per_latte_ml;
    let cost_per_latte =
        cost_per_shot + milk_cost_per_ml * settings.milk_per_latte_ml + syrup_price_per_latte;

    CostBreakdown {
        cost_per_gram,
        cost_per_shot,
        shots_per_bag,
        cost_per_oz,
        cost_per_latte,
    }
}

impl CostBreakdown {
    /// Render for display, masking non-positive or non-finite money as "0.00"
    pub fn display(&self) -> CostDisplay {
        CostDisplay {
            cost_per_gram: format_money(self.cost_per_gram),
            cost_per_shot: format_money(self.cost_per_shot),
            shots_per_bag: self.shots_per_bag,
            cost_per_oz: format_money(self.cost_per_oz),
            cost_per_latte: format_money(self.cost_per_latte),
        }
    }
}

/// Format a monetary value with exactly two decimal digits.
///
/// Values that are non-positive or non-finite (zero-weight bags divide to
/// infinity or NaN upstream) render as "0.00" rather than surfacing an error.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", value)
    }
}
