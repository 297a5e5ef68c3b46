//! Spread / confidence: how much of a player's movement was a decrease.
//!
//! For each included round after the first, `delta = previous - current`.
//! A falling coefficient (positive delta) counts as decrease, a rising one as
//! increase. `confidence = 100 - increase / (decrease + increase) * 100`, and
//! exactly 0 when there was no movement at all.

use serde::{Deserialize, Serialize};

use crate::coefficient::CoefficientPair;
use crate::decision::{PerPlayer, Player, Verdict, EPS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadStats {
    pub total_decrease: f64,
    pub total_increase: f64,
    /// Percent in [0, 100].
    pub confidence: f64,
    pub has_higher_chances: bool,
}

/// How the spread verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadOutcome {
    /// Fewer than two included rounds.
    Insufficient,
    /// Exactly one player qualifies.
    SingleQualifier,
    /// Both qualify, one has the higher confidence.
    HigherConfidence,
    /// Both qualify with equal confidence.
    EqualStrength,
    /// Nobody qualifies and at least one coefficient went up.
    UndeterminedWithIncrease,
    /// Nobody qualifies and nothing went up.
    UndeterminedFlat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadAnalysis {
    pub players: PerPlayer<SpreadStats>,
    pub outcome: SpreadOutcome,
    pub verdict: Verdict,
}

pub fn confidence_percent(total_decrease: f64, total_increase: f64) -> f64 {
    let denom = total_decrease + total_increase;
    if denom <= 0.0 {
        return 0.0;
    }
    (100.0 - total_increase / denom * 100.0).clamp(0.0, 100.0)
}

fn stats_for(pairs: &[CoefficientPair], player: Player, threshold: f64) -> SpreadStats {
    let mut total_decrease = 0.0;
    let mut total_increase = 0.0;
    for w in pairs.windows(2) {
        let delta = w[0].get(player) - w[1].get(player);
        if delta > 0.0 {
            total_decrease += delta;
        } else if delta < 0.0 {
            total_increase += -delta;
        }
    }
    let confidence = confidence_percent(total_decrease, total_increase);
    SpreadStats {
        total_decrease,
        total_increase,
        confidence,
        // two-decimal inputs leave float noise in the totals (0.30 / 0.40 → 74.999..)
        has_higher_chances: confidence + EPS >= threshold && total_decrease > total_increase + EPS,
    }
}

pub fn spread(pairs: &[CoefficientPair], confidence_threshold: f64) -> SpreadAnalysis {
    if pairs.len() < 2 {
        return SpreadAnalysis {
            players: PerPlayer::default(),
            outcome: SpreadOutcome::Insufficient,
            verdict: Verdict::Insufficient,
        };
    }

    let players = PerPlayer::new(
        stats_for(pairs, Player::One, confidence_threshold),
        stats_for(pairs, Player::Two, confidence_threshold),
    );

    let (outcome, verdict) = match (players.p1.has_higher_chances, players.p2.has_higher_chances) {
        (true, false) => (SpreadOutcome::SingleQualifier, Verdict::Player1),
        (false, true) => (SpreadOutcome::SingleQualifier, Verdict::Player2),
        (true, true) => {
            if (players.p1.confidence - players.p2.confidence).abs() <= EPS {
                (SpreadOutcome::EqualStrength, Verdict::Tie)
            } else {
                (
                    SpreadOutcome::HigherConfidence,
                    Verdict::higher_wins(players.p1.confidence, players.p2.confidence),
                )
            }
        }
        (false, false) => {
            let any_increase = players.p1.total_increase > 0.0 || players.p2.total_increase > 0.0;
            if any_increase {
                (SpreadOutcome::UndeterminedWithIncrease, Verdict::Tie)
            } else {
                (SpreadOutcome::UndeterminedFlat, Verdict::Tie)
            }
        }
    };

    SpreadAnalysis {
        players,
        outcome,
        verdict,
    }
}
