//! Decimal-part sum: rewards odds that sit close to whole numbers.

use serde::{Deserialize, Serialize};

use super::decimal_part;
use crate::coefficient::CoefficientPair;
use crate::decision::{PerPlayer, Player, Verdict};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalSum {
    pub sums: PerPlayer<f64>,
    /// `|sum1 - sum2|`, 0 on a tie.
    pub advantage: f64,
    pub rounds: usize,
    pub verdict: Verdict,
}

/// Lower total decimal part wins; equal totals are a probable push.
pub fn decimal_sum(pairs: &[CoefficientPair]) -> DecimalSum {
    let mut sums = PerPlayer::new(0.0f64, 0.0f64);
    for pair in pairs {
        for player in Player::BOTH {
            *sums.get_mut(player) += decimal_part(pair.get(player));
        }
    }

    let verdict = if pairs.is_empty() {
        Verdict::Insufficient
    } else {
        Verdict::lower_wins(sums.p1, sums.p2)
    };
    let advantage = match verdict {
        Verdict::Player1 | Verdict::Player2 => (sums.p1 - sums.p2).abs(),
        Verdict::Tie | Verdict::Insufficient => 0.0,
    };

    DecimalSum {
        sums,
        advantage,
        rounds: pairs.len(),
        verdict,
    }
}
