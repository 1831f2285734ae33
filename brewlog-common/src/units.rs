//! Weight and volume unit conversion
//!
//! Leaf dependency for the cost engine and the external-record normalizer.
//! No rounding happens here; rounding and formatting belong to the storage
//! and presentation boundaries. Negative inputs pass through unvalidated,
//! matching the persisted behavior of the journal.

/// Grams per avoirdupois ounce
pub const GRAMS_PER_OZ: f64 = 28.3495;

/// Milliliters per US fluid ounce
pub const ML_PER_OZ: f64 = 29.5735;

/// Convert ounces to grams
pub fn oz_to_grams(oz: f64) -> f64 {
    oz * GRAMS_PER_OZ
}

/// Convert grams to ounces
pub fn grams_to_oz(grams: f64) -> f64 {
    grams / GRAMS_PER_OZ
}

/// Convert milliliters to fluid ounces
pub fn ml_to_oz(ml: f64) -> f64 {
    ml / ML_PER_OZ
}

/// Convert fluid ounces to milliliters
pub fn oz_to_ml(oz: f64) -> f64 {
    oz * ML_PER_OZ
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_oz_to_grams_factor() {
        assert!((oz_to_grams(1.0) - 28.3495).abs() < EPSILON);
        assert!((oz_to_grams(10.0) - 283.495).abs() < EPSILON);
        assert_eq!(oz_to_grams(0.0), 0.0);
    }

    #[test]
    fn test_ml_to_oz_factor() {
        assert!((ml_to_oz(29.5735) - 1.0).abs() < EPSILON);
        assert!((oz_to_ml(1.0) - 29.5735).abs() < EPSILON);
    }

    #[test]
    fn test_weight_round_trip() {
        for w in [0.0, 0.5, 12.0, 283.5, 1000.0, 12345.678] {
            let back = grams_to_oz(oz_to_grams(w));
            assert!((back - w).abs() < 1e-9 * w.max(1.0), "round trip failed for {}", w);
        }
    }

    #[test]
    fn test_volume_round_trip() {
        for v in [0.0, 36.0, 250.0, 946.353] {
            let back = oz_to_ml(ml_to_oz(v));
            assert!((back - v).abs() < 1e-9 * v.max(1.0), "round trip failed for {}", v);
        }
    }

    #[test]
    fn test_negative_values_pass_through() {
        // No validation layer at this level; negatives convert symmetrically
        assert!((oz_to_grams(-1.0) + 28.3495).abs() < EPSILON);
        assert!((ml_to_oz(-29.5735) + 1.0).abs() < EPSILON);
    }
}
