//! Creature needs and wellness tiers

use serde::{Deserialize, Serialize};

/// A need tracked per creature on a 0..100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
    Hunger,
    Thirst,
    Happiness,
    Cleanliness,
    Health,
    Energy,
    Social,
    Shelter,
}

impl Need {
    pub fn all() -> &'static [Need] {
        &[
            Need::Hunger,
            Need::Thirst,
            Need::Happiness,
            Need::Cleanliness,
            Need::Health,
            Need::Energy,
            Need::Social,
            Need::Shelter,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Need::Hunger => "hunger",
            Need::Thirst => "thirst",
            Need::Happiness => "happiness",
            Need::Cleanliness => "cleanliness",
            Need::Health => "health",
            Need::Energy => "energy",
            Need::Social => "social",
            Need::Shelter => "shelter",
        }
    }
}

impl std::fmt::Display for Need {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Need {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Need::all()
            .iter()
            .copied()
            .find(|n| n.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown need: {}", s))
    }
}

/// Discrete bucket of the overall wellness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellnessTier {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl WellnessTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 85.0 {
            WellnessTier::Excellent
        } else if score >= 70.0 {
            WellnessTier::Good
        } else if score >= 50.0 {
            WellnessTier::Fair
        } else if score >= 30.0 {
            WellnessTier::Poor
        } else {
            WellnessTier::Critical
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WellnessTier::Excellent => "excellent",
            WellnessTier::Good => "good",
            WellnessTier::Fair => "fair",
            WellnessTier::Poor => "poor",
            WellnessTier::Critical => "critical",
        }
    }
}

impl std::fmt::Display for WellnessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(WellnessTier::from_score(100.0), WellnessTier::Excellent);
        assert_eq!(WellnessTier::from_score(85.0), WellnessTier::Excellent);
        assert_eq!(WellnessTier::from_score(84.9), WellnessTier::Good);
        assert_eq!(WellnessTier::from_score(70.0), WellnessTier::Good);
        assert_eq!(WellnessTier::from_score(50.0), WellnessTier::Fair);
        assert_eq!(WellnessTier::from_score(30.0), WellnessTier::Poor);
        assert_eq!(WellnessTier::from_score(29.9), WellnessTier::Critical);
        assert_eq!(WellnessTier::from_score(f32::NAN), WellnessTier::Critical);
    }

    #[test]
    fn test_need_parse() {
        assert_eq!("Hunger".parse::<Need>(), Ok(Need::Hunger));
        assert!("boredom".parse::<Need>().is_err());
        assert_eq!(Need::all().len(), 8);
    }
}
