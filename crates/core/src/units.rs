//! Fixed-point amount formatting for on-chain integers.
//!
//! Token amounts carry 18 decimals and the stable asset (USDT) carries 6.
//! All arithmetic stays in `U256` so large supplies never lose precision.

use alloy_primitives::U256;

/// Decimals of the traded token.
pub const TOKEN_DECIMALS: u8 = 18;
/// Decimals of the stable asset.
pub const STABLE_DECIMALS: u8 = 6;

/// Places shown for token amounts.
pub const TOKEN_PLACES: u8 = 4;
/// Places shown for stable amounts.
pub const STABLE_PLACES: u8 = 2;

/// `10^exp` as `U256`.
#[inline]
pub fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Format a raw integer amount with `decimals` decimals to exactly `places`
/// fractional digits, rounding half up. A missing value formats as zero.
pub fn format_units(value: Option<U256>, decimals: u8, places: u8) -> String {
    let value = value.unwrap_or(U256::ZERO);
    let places = places.min(decimals);

    let drop = pow10(decimals - places);
    let scaled = if drop > U256::from(1u64) {
        value.saturating_add(drop / U256::from(2u64)) / drop
    } else {
        value
    };

    if places == 0 {
        return scaled.to_string();
    }

    let unit = pow10(places);
    let whole = scaled / unit;
    let frac = (scaled % unit).to_string();
    format!("{}.{:0>width$}", whole, frac, width = places as usize)
}

/// Format an 18-decimal token amount to 4 places.
pub fn format18(value: Option<U256>) -> String {
    format_units(value, TOKEN_DECIMALS, TOKEN_PLACES)
}

/// Format a 6-decimal stable amount to 2 places.
pub fn format6(value: Option<U256>) -> String {
    format_units(value, STABLE_DECIMALS, STABLE_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_fixed(s: &str, places: usize) -> bool {
        match s.split_once('.') {
            Some((whole, frac)) => {
                !whole.is_empty()
                    && whole.chars().all(|c| c.is_ascii_digit())
                    && frac.len() == places
                    && frac.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    #[test]
    fn test_format18_zero_and_missing() {
        assert_eq!(format18(None), "0.0000");
        assert_eq!(format18(Some(U256::ZERO)), "0.0000");
    }

    #[test]
    fn test_format6_zero_and_missing() {
        assert_eq!(format6(None), "0.00");
        assert_eq!(format6(Some(U256::ZERO)), "0.00");
    }

    #[test]
    fn test_format18_values() {
        // 1.5 tokens
        let v = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format18(Some(v)), "1.5000");

        // 0.00005 rounds up to 0.0001
        let v = U256::from(50_000_000_000_000u128);
        assert_eq!(format18(Some(v)), "0.0001");

        // 0.00004999 rounds down
        let v = U256::from(49_990_000_000_000u128);
        assert_eq!(format18(Some(v)), "0.0000");

        // 1 wei
        assert_eq!(format18(Some(U256::from(1u64))), "0.0000");
    }

    #[test]
    fn test_format6_values() {
        assert_eq!(format6(Some(U256::from(12_345_678u64))), "12.35");
        assert_eq!(format6(Some(U256::from(1_000_000u64))), "1.00");
        assert_eq!(format6(Some(U256::from(4_999u64))), "0.00");
        assert_eq!(format6(Some(U256::from(5_000u64))), "0.01");
    }

    #[test]
    fn test_format_shape_holds_for_large_values() {
        let samples = [
            U256::from(1u64),
            U256::from(999_999u64),
            U256::from(123_456_789_000_000_000_000u128),
            pow10(40),
            U256::MAX,
        ];
        for v in samples {
            assert!(is_fixed(&format18(Some(v)), 4), "format18({v})");
            assert!(is_fixed(&format6(Some(v)), 2), "format6({v})");
        }
    }

    #[test]
    fn test_format_units_places_capped_by_decimals() {
        assert_eq!(format_units(Some(U256::from(123u64)), 2, 4), "1.23");
        assert_eq!(format_units(Some(U256::from(7u64)), 0, 2), "7");
    }
}
