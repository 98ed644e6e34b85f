//! Statblock power tier

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Power level of a statblock, always within 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(4);

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidTier(i64::from(value)))
        }
    }

    /// Build a tier from any integer, pinning it to the nearest valid tier
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Signed distance from `self` to `target`
    pub fn delta_to(self, target: Tier) -> i32 {
        i32::from(target.0) - i32::from(self.0)
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Tier {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Tier {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| DomainError::InvalidTier(value))
            .and_then(Self::new)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name prefix applied when a statblock moves `delta` tiers.
///
/// Deltas beyond the table edge reuse the outermost adjective.
pub fn tier_shift_adjective(delta: i32) -> &'static str {
    match delta.clamp(-3, 3) {
        -3 => "Inferior",
        -2 => "Lesser",
        -1 => "Small",
        1 => "Large",
        2 => "Greater",
        3 => "Superior",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bounds() {
        assert!(Tier::new(0).is_err());
        assert!(Tier::new(5).is_err());
        assert_eq!(Tier::new(3).unwrap().value(), 3);
        assert!(Tier::try_from(-1i64).is_err());
    }

    #[test]
    fn test_tier_clamped() {
        assert_eq!(Tier::clamped(0), Tier::MIN);
        assert_eq!(Tier::clamped(9), Tier::MAX);
        assert_eq!(Tier::clamped(2).value(), 2);
    }

    #[test]
    fn test_tier_serde_as_number() {
        let tier: Tier = serde_json::from_str("2").unwrap();
        assert_eq!(tier.value(), 2);
        assert_eq!(serde_json::to_string(&tier).unwrap(), "2");
        assert!(serde_json::from_str::<Tier>("7").is_err());
    }

    #[test]
    fn test_tier_shift_adjective() {
        assert_eq!(tier_shift_adjective(1), "Large");
        assert_eq!(tier_shift_adjective(-1), "Small");
        assert_eq!(tier_shift_adjective(-3), "Inferior");
        assert_eq!(tier_shift_adjective(3), "Superior");
        assert_eq!(tier_shift_adjective(0), "");
        assert_eq!(tier_shift_adjective(7), "Superior");
        assert_eq!(tier_shift_adjective(-5), "Inferior");
    }
}
