//! Stability: total absolute round-over-round movement per player.
//! Informational; it does not feed the prediction.

use serde::{Deserialize, Serialize};

use crate::coefficient::CoefficientPair;
use crate::decision::{PerPlayer, Player, Verdict};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stability {
    pub movement: PerPlayer<f64>,
    /// Lower movement = more stable.
    pub verdict: Verdict,
}

pub fn stability(pairs: &[CoefficientPair]) -> Stability {
    if pairs.len() < 2 {
        return Stability {
            movement: PerPlayer::default(),
            verdict: Verdict::Insufficient,
        };
    }
    let total = |player: Player| -> f64 {
        pairs
            .windows(2)
            .map(|w| (w[1].get(player) - w[0].get(player)).abs())
            .sum()
    };
    let movement = PerPlayer::new(total(Player::One), total(Player::Two));
    Stability {
        movement,
        verdict: Verdict::lower_wins(movement.p1, movement.p2),
    }
}
