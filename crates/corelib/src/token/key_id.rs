//! Fixed-width ring identifier.

use crate::token::traits::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier on the ring.
///
/// Newtype over `u128`. Deployments using a narrower space (`m < 128` bits)
/// must keep values below `2^m`: interval tests run on the full 128-bit
/// circle, so a wider value would be routed as if it were a different key.
/// Use [`KeyId::fits`] to check and [`KeyId::truncate`] to reduce.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct KeyId(pub u128);

impl KeyId {
    /// `self + 2^exponent` modulo `2^bits`.
    ///
    /// This is where the finger with index `exponent` starts.
    pub fn offset_pow2(&self, exponent: u32, bits: u32) -> Self {
        let step = if exponent >= 128 { 0 } else { 1u128 << exponent };
        KeyId(self.0.wrapping_add(step) & mask(bits))
    }

    /// `true` when this identifier lies inside a space of `bits` bits.
    pub fn fits(&self, bits: u32) -> bool {
        self.0 & !mask(bits) == 0
    }

    /// Reduce this identifier into a space of `bits` bits.
    pub fn truncate(&self, bits: u32) -> Self {
        KeyId(self.0 & mask(bits))
    }
}

fn mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

impl Token for KeyId {
    fn zero() -> Self {
        KeyId(0)
    }

    fn max() -> Self {
        KeyId(u128::MAX)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_max(&self) -> bool {
        self.0 == u128::MAX
    }

    fn distance_to(&self, other: &Self) -> Self {
        KeyId(other.0.wrapping_sub(self.0))
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl From<u128> for KeyId {
    fn from(value: u128) -> Self {
        KeyId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_checks_the_space() {
        assert!(KeyId(31).fits(5));
        assert!(!KeyId(32).fits(5));
        assert!(!KeyId(40).fits(5));
        assert!(KeyId(u128::MAX).fits(128));
        assert_eq!(KeyId(40).truncate(5), KeyId(8));
    }

    #[test]
    fn test_distance_forward() {
        assert_eq!(KeyId(100).distance_to(&KeyId(200)), KeyId(100));
    }

    #[test]
    fn test_distance_wraps() {
        // One step clockwise from the maximum lands on zero.
        assert_eq!(<KeyId as Token>::max().distance_to(&KeyId(0)), KeyId(1));
        assert_eq!(KeyId(10).distance_to(&KeyId(3)), KeyId(u128::MAX - 6));
    }

    #[test]
    fn test_offset_pow2_wraps_in_small_space() {
        // m = 5, space of 32
        assert_eq!(KeyId(20).offset_pow2(0, 5), KeyId(21));
        assert_eq!(KeyId(20).offset_pow2(3, 5), KeyId(28));
        assert_eq!(KeyId(20).offset_pow2(4, 5), KeyId(4));
    }

    #[test]
    fn test_offset_pow2_full_width() {
        assert_eq!(KeyId(u128::MAX).offset_pow2(0, 128), KeyId(0));
        assert_eq!(KeyId(1).offset_pow2(127, 128), KeyId(1 + (1u128 << 127)));
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(KeyId(255).to_string(), format!("{:0>32}", "ff"));
    }
}
