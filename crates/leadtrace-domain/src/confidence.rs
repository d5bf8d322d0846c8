//! Confidence score module
//!
//! A score is always in [0, 100]; its level bucket is a pure function of the
//! score and never stored or independently assignable.

/// Threshold at and above which a score is High confidence
pub const HIGH_THRESHOLD: f64 = 80.0;
/// Threshold at and above which a score is Medium confidence
pub const MEDIUM_THRESHOLD: f64 = 50.0;
/// Threshold at and above which a score is Low confidence
pub const LOW_THRESHOLD: f64 = 20.0;

/// Numeric attribution certainty, clamped to [0, 100] at construction
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// The zero score (no attributing evidence)
    pub const ZERO: ConfidenceScore = ConfidenceScore(0.0);

    /// Create a score, clamping the value into [0, 100]
    ///
    /// NaN collapses to 0 rather than propagating.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 100.0))
    }

    /// Raw score value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Derive the confidence level bucket for this score
    pub fn level(&self) -> ConfidenceLevel {
        if self.0 >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if self.0 >= MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else if self.0 >= LOW_THRESHOLD {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Unknown
        }
    }

    /// Multiply by a boost factor, clamping to 100
    ///
    /// Factors below 1.0 are raised to 1.0 so a boost can never lower a
    /// score.
    pub fn boosted(&self, factor: f64) -> Self {
        Self::new(self.0 * factor.max(1.0))
    }
}

impl Default for ConfidenceScore {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Derived confidence bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceLevel {
    /// Score >= 80
    High,
    /// Score in [50, 80)
    Medium,
    /// Score in [20, 50)
    Low,
    /// Score below 20 (including absent evidence)
    Unknown,
}

impl ConfidenceLevel {
    /// All levels from strongest to weakest
    pub const ALL: [ConfidenceLevel; 4] = [
        ConfidenceLevel::High,
        ConfidenceLevel::Medium,
        ConfidenceLevel::Low,
        ConfidenceLevel::Unknown,
    ];

    /// Get the level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any finite input clamps into [0, 100]
        #[test]
        fn test_score_always_in_bounds(value in -1e6f64..1e6f64) {
            let score = ConfidenceScore::new(value);
            prop_assert!(score.value() >= 0.0 && score.value() <= 100.0);
        }

        /// Property: boosting never decreases a score and never exceeds 100
        #[test]
        fn test_boost_monotone(value in 0.0f64..100.0, factor in 0.0f64..5.0) {
            let score = ConfidenceScore::new(value);
            let boosted = score.boosted(factor);
            prop_assert!(boosted.value() >= score.value());
            prop_assert!(boosted.value() <= 100.0);
        }

        /// Property: level buckets partition the score range
        #[test]
        fn test_level_total(value in 0.0f64..=100.0) {
            let level = ConfidenceScore::new(value).level();
            let expected = if value >= 80.0 {
                ConfidenceLevel::High
            } else if value >= 50.0 {
                ConfidenceLevel::Medium
            } else if value >= 20.0 {
                ConfidenceLevel::Low
            } else {
                ConfidenceLevel::Unknown
            };
            prop_assert_eq!(level, expected);
        }
    }
}
