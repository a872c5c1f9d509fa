//! Weighting strategies for the composite priority score.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// The preset strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    SmartBalance,
    FastestWins,
    HighImpact,
    DeadlineDriven,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    /// Case-insensitive, whitespace-tolerant lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|s| s.name() == wanted)
    }

    /// Lookup that falls back to `smart_balance` for unknown names.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn weights(&self) -> StrategyWeights {
        let (urgency, importance, effort, dependency) = match self {
            Strategy::SmartBalance => (0.30, 0.30, 0.20, 0.20),
            Strategy::FastestWins => (0.15, 0.15, 0.60, 0.10),
            Strategy::HighImpact => (0.15, 0.60, 0.10, 0.15),
            Strategy::DeadlineDriven => (0.60, 0.15, 0.10, 0.15),
        };
        StrategyWeights {
            name: self.name().to_string(),
            urgency,
            importance,
            effort,
            dependency,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::from_name(s) {
            Some(strategy) => Ok(strategy),
            None => bail!("unknown strategy '{s}'"),
        }
    }
}

/// Named weight vector over (urgency, importance, effort, dependency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub name: String,
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl StrategyWeights {
    /// Custom weights. Each must be finite and non-negative, and together they
    /// must sum to 1.0.
    pub fn custom(
        name: impl Into<String>,
        urgency: f64,
        importance: f64,
        effort: f64,
        dependency: f64,
    ) -> Result<Self> {
        let weights = [urgency, importance, effort, dependency];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            bail!("strategy weights must be finite and non-negative: {weights:?}");
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("strategy weights must sum to 1.0, got {sum}");
        }

        Ok(Self {
            name: name.into(),
            urgency,
            importance,
            effort,
            dependency,
        })
    }
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Strategy::default().weights()
    }
}

impl From<Strategy> for StrategyWeights {
    fn from(strategy: Strategy) -> Self {
        strategy.weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_sum_to_one() {
        for s in Strategy::ALL {
            let w = s.weights();
            let sum = w.urgency + w.importance + w.effort + w.dependency;
            assert!((sum - 1.0).abs() < 1e-9, "{s} sums to {sum}");
            assert_eq!(w.name, s.name());
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Strategy::from_name("  High_Impact "), Some(Strategy::HighImpact));
        assert_eq!(Strategy::from_name("nope"), None);
        assert_eq!(Strategy::from_name_or_default("nope"), Strategy::SmartBalance);
        assert!("deadline_driven".parse::<Strategy>().is_ok());
        assert!("fastest".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_custom_weights_checked() {
        assert!(StrategyWeights::custom("even", 0.25, 0.25, 0.25, 0.25).is_ok());
        assert!(StrategyWeights::custom("short", 0.25, 0.25, 0.25, 0.20).is_err());
        assert!(StrategyWeights::custom("neg", 1.25, -0.25, 0.0, 0.0).is_err());
        assert!(StrategyWeights::custom("nan", f64::NAN, 0.5, 0.25, 0.25).is_err());
    }
}
