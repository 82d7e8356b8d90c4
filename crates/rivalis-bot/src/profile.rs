use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::metrics::BoardMetrics;

/// Difficulty tier of the bot opponent.
///
/// Selects one immutable [`DifficultyProfile`]; changing difficulty
/// mid-session means constructing a new bot, never mutating a profile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    SuperHard,
}

impl Difficulty {
    /// All tiers, weakest first.
    pub const ALL: [Self; 4] = [Self::Easy, Self::Normal, Self::Hard, Self::SuperHard];

    /// The configuration for this tier.
    #[must_use]
    pub const fn profile(self) -> &'static DifficultyProfile {
        &PROFILES[self as usize]
    }
}

/// Heuristic weights for scoring a simulated board.
///
/// Signs encode intent: `lines` rewards completed rows, the other three are
/// penalties and carry negative values. Higher tiers use larger penalty
/// magnitudes, which is what makes their play visibly smarter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub lines: f32,
    pub height: f32,
    pub holes: f32,
    pub bumpiness: f32,
}

impl Weights {
    /// Weighted sum over the four board metrics. Higher is better.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, metrics: &BoardMetrics) -> f32 {
        metrics.full_lines() as f32 * self.lines
            + metrics.aggregate_height() as f32 * self.height
            + metrics.holes() as f32 * self.holes
            + metrics.bumpiness() as f32 * self.bumpiness
    }
}

/// One tier's full configuration: timing knobs plus heuristic weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Cadence of the unconditional soft drop once the move queue is empty.
    pub drop_interval: Duration,
    /// Probability that a decision is replaced by a random mistake.
    pub error_rate: f64,
    /// Heuristic weights for the placement search.
    pub weights: Weights,
    /// Simulated reaction latency before a spawned piece is planned.
    pub think_delay: Duration,
    /// Fraction of the target landing row past which the piece hard-drops
    /// early. Zero disables the rule (lower tiers).
    pub drop_threshold: f32,
}

const PROFILES: [DifficultyProfile; 4] = [
    // Easy
    DifficultyProfile {
        drop_interval: Duration::from_millis(400),
        error_rate: 0.20,
        weights: Weights {
            lines: 10.0,
            height: -0.5,
            holes: -1.0,
            bumpiness: -0.5,
        },
        think_delay: Duration::from_millis(50),
        drop_threshold: 0.0,
    },
    // Normal
    DifficultyProfile {
        drop_interval: Duration::from_millis(200),
        error_rate: 0.05,
        weights: Weights {
            lines: 20.0,
            height: -1.0,
            holes: -5.0,
            bumpiness: -2.0,
        },
        think_delay: Duration::from_millis(50),
        drop_threshold: 0.0,
    },
    // Hard
    DifficultyProfile {
        drop_interval: Duration::from_millis(150),
        error_rate: 0.01,
        weights: Weights {
            lines: 30.0,
            height: -5.0,
            holes: -20.0,
            bumpiness: -5.0,
        },
        think_delay: Duration::from_millis(20),
        drop_threshold: 0.6,
    },
    // SuperHard
    DifficultyProfile {
        drop_interval: Duration::from_millis(60),
        error_rate: 0.0,
        weights: Weights {
            lines: 50.0,
            height: -10.0,
            holes: -100.0,
            bumpiness: -10.0,
        },
        think_delay: Duration::ZERO,
        drop_threshold: 0.5,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_signs_encode_intent() {
        for tier in Difficulty::ALL {
            let w = tier.profile().weights;
            assert!(w.lines > 0.0, "{tier}: lines is a reward");
            assert!(w.height < 0.0, "{tier}: height is a penalty");
            assert!(w.holes < 0.0, "{tier}: holes is a penalty");
            assert!(w.bumpiness < 0.0, "{tier}: bumpiness is a penalty");
        }
    }

    #[test]
    fn test_higher_tiers_are_monotonically_smarter() {
        for pair in Difficulty::ALL.windows(2) {
            let lo = pair[0].profile();
            let hi = pair[1].profile();
            assert!(hi.weights.lines > lo.weights.lines);
            assert!(hi.weights.height.abs() > lo.weights.height.abs());
            assert!(hi.weights.holes.abs() > lo.weights.holes.abs());
            assert!(hi.weights.bumpiness.abs() >= lo.weights.bumpiness.abs());
            assert!(hi.error_rate <= lo.error_rate);
            assert!(hi.drop_interval < lo.drop_interval);
            assert!(hi.think_delay <= lo.think_delay);
        }
        assert_eq!(Difficulty::SuperHard.profile().error_rate, 0.0);
    }

    #[test]
    fn test_only_high_tiers_use_early_hard_drop() {
        assert_eq!(Difficulty::Easy.profile().drop_threshold, 0.0);
        assert_eq!(Difficulty::Normal.profile().drop_threshold, 0.0);
        assert!(Difficulty::Hard.profile().drop_threshold > 0.0);
        assert!(Difficulty::SuperHard.profile().drop_threshold > 0.0);
    }

    #[test]
    fn test_difficulty_serde_uses_camel_case_names() {
        let json = serde_json::to_string(&Difficulty::SuperHard).unwrap();
        assert_eq!(json, "\"superHard\"");
        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let profile = Difficulty::Hard.profile();
        let json = serde_json::to_string(profile).unwrap();
        let back: DifficultyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(*profile, back);
    }

    #[test]
    fn test_difficulty_from_str_is_case_insensitive() {
        assert_eq!("superhard".parse::<Difficulty>().unwrap(), Difficulty::SuperHard);
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
