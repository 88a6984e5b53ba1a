//! Address display helpers.

use alloy_primitives::Address;

/// Characters kept at each end of a shortened address.
const KEEP: usize = 6;

/// Shorten an address string to `first 6...last 6`.
///
/// Strings too short to shorten are returned unchanged.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= KEEP * 2 {
        return address.to_string();
    }
    let head: String = chars[..KEEP].iter().collect();
    let tail: String = chars[chars.len() - KEEP..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Shorten a checksummed address.
pub fn short(address: &Address) -> String {
    short_address(&address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...345678"
        );
    }

    #[test]
    fn test_short_address_passthrough() {
        assert_eq!(short_address("0x12"), "0x12");
        assert_eq!(short_address(""), "");
    }

    #[test]
    fn test_short_checksummed() {
        let addr: Address = "0x94abf62b41f815448eedbe9ec10f10576d9d6004".parse().unwrap();
        assert_eq!(short(&addr), "0x94Ab...9D6004");
    }
}
