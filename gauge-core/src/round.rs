//! Decimal rounding for conversion results
//!
//! Rounds half away from zero on the shortest decimal representation of the
//! value (the one `Display` prints), not on its binary expansion. This keeps
//! results like `2.675` rounding to `2.68` even though the nearest f64 is
//! slightly below it.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` to `places` decimal places, half away from zero.
///
/// Non-finite values are returned untouched; callers reject them earlier.
/// Magnitudes beyond `Decimal`'s range have no fractional digits left to
/// round and are returned as they are.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let Some(decimal) = to_decimal(value) else {
        return value;
    };

    let rounded = decimal.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    // Parse the decimal text so the result is the f64 nearest to it
    let out = rounded
        .to_string()
        .parse::<f64>()
        .ok()
        .or_else(|| rounded.to_f64())
        .unwrap_or(value);

    // -0.004 rounds to zero, not negative zero
    if out == 0.0 {
        0.0
    } else {
        out
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(-2.5, 0), -3.0);
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(-0.125, 2), -0.13);
    }

    #[test]
    fn test_decimal_ties_not_binary() {
        // 2.675 is stored as 2.67499999... in binary
        assert_eq!(round_half_up(2.675, 2), 2.68);
        assert_eq!(round_half_up(1.005, 2), 1.01);
    }

    #[test]
    fn test_float_noise_is_removed() {
        assert_eq!(round_half_up(2.5400000000000005, 2), 2.54);
        assert_eq!(round_half_up(99.99999999999999, 1), 100.0);
    }

    #[test]
    fn test_carry_into_integer_part() {
        assert_eq!(round_half_up(9.996, 2), 10.0);
        assert_eq!(round_half_up(999.95, 1), 1000.0);
    }

    #[test]
    fn test_short_values_unchanged() {
        assert_eq!(round_half_up(32.0, 1), 32.0);
        assert_eq!(round_half_up(1.5, 3), 1.5);
        assert_eq!(round_half_up(0.0, 2), 0.0);
    }

    #[test]
    fn test_small_values_round_to_zero() {
        assert_eq!(round_half_up(0.0000001, 2), 0.0);
        assert_eq!(round_half_up(0.004, 2), 0.0);
    }

    #[test]
    fn test_negative_values_rounding_to_zero_are_positive_zero() {
        let out = round_half_up(-0.004, 2);
        assert_eq!(out, 0.0);
        assert!(out.is_sign_positive());
        // 273.14 K is -0.01 °C, shown at one place
        let celsius = round_half_up(273.14 - 273.15, 1);
        assert!(celsius.is_sign_positive());
        assert_eq!(celsius.to_string(), "0");
        assert!(round_half_up(-0.0, 2).is_sign_positive());
    }

    #[test]
    fn test_out_of_range_magnitudes() {
        assert_eq!(round_half_up(1e30, 2), 1e30);
        assert_eq!(round_half_up(-1e300, 0), -1e300);
    }

    #[test]
    fn test_zero_places() {
        assert_eq!(round_half_up(1234.4999, 0), 1234.0);
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_half_up(f64::NAN, 2).is_nan());
        assert_eq!(round_half_up(f64::INFINITY, 2), f64::INFINITY);
    }
}
