use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Coarse price preference used to filter places by provider price level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    #[default]
    Medium,
    High,
}

impl BudgetTier {
    /// Inclusive set of acceptable price levels
    pub fn price_levels(&self) -> &'static [u8] {
        match self {
            BudgetTier::Low => &[0, 1],
            BudgetTier::Medium => &[1, 2],
            BudgetTier::High => &[2, 3, 4],
        }
    }

    /// Places without a recorded price level are always allowed
    pub fn allows(&self, price_level: Option<u8>) -> bool {
        match price_level {
            None => true,
            Some(level) => self.price_levels().contains(&level),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "low",
            BudgetTier::Medium => "medium",
            BudgetTier::High => "high",
        }
    }
}

impl Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BudgetTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(BudgetTier::Low),
            "medium" => Ok(BudgetTier::Medium),
            "high" => Ok(BudgetTier::High),
            other => Err(AppError::InvalidInput(format!(
                "Unrecognized budget tier '{}', expected one of: low, medium, high",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tiers() {
        assert_eq!("low".parse::<BudgetTier>().unwrap(), BudgetTier::Low);
        assert_eq!("Medium".parse::<BudgetTier>().unwrap(), BudgetTier::Medium);
        assert_eq!(" HIGH ".parse::<BudgetTier>().unwrap(), BudgetTier::High);
    }

    #[test]
    fn test_parse_unknown_tier_is_invalid_input() {
        let result = "expensive".parse::<BudgetTier>();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_price_level_two_by_tier() {
        assert!(!BudgetTier::Low.allows(Some(2)));
        assert!(BudgetTier::Medium.allows(Some(2)));
        assert!(BudgetTier::High.allows(Some(2)));
    }

    #[test]
    fn test_missing_price_level_always_allowed() {
        for tier in [BudgetTier::Low, BudgetTier::Medium, BudgetTier::High] {
            assert!(tier.allows(None));
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert!(BudgetTier::Low.allows(Some(0)));
        assert!(!BudgetTier::Medium.allows(Some(0)));
        assert!(!BudgetTier::Medium.allows(Some(3)));
        assert!(BudgetTier::High.allows(Some(4)));
        assert!(!BudgetTier::High.allows(Some(1)));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&BudgetTier::High).unwrap(), r#""high""#);
    }
}
