//! Smallest-decimal voting: each round, the player with the smaller rounded
//! decimal part (in hundredths) gets one vote.

use serde::{Deserialize, Serialize};

use super::decimal_part;
use crate::coefficient::CoefficientPair;
use crate::decision::{PerPlayer, Player, Verdict};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalVotes {
    pub votes: PerPlayer<u32>,
    pub compared_rounds: usize,
    /// Lowest single rounded decimal part seen per player.
    pub lowest: PerPlayer<Option<u32>>,
    /// Who owns the lowest single decimal part.
    pub lowest_verdict: Verdict,
    pub verdict: Verdict,
}

/// `round(fract(value) * 100)`
pub fn hundredths(value: f64) -> u32 {
    (decimal_part(value) * 100.0).round() as u32
}

pub fn decimal_votes(pairs: &[CoefficientPair]) -> DecimalVotes {
    let mut votes = PerPlayer::new(0u32, 0u32);
    let mut lowest: PerPlayer<Option<u32>> = PerPlayer::default();

    for pair in pairs {
        let h = PerPlayer::new(hundredths(pair.p1), hundredths(pair.p2));
        if h.p1 < h.p2 {
            votes.p1 += 1;
        } else if h.p2 < h.p1 {
            votes.p2 += 1;
        }
        for player in Player::BOTH {
            let slot = lowest.get_mut(player);
            let current = *h.get(player);
            *slot = Some(slot.map_or(current, |v| v.min(current)));
        }
    }

    let (verdict, lowest_verdict) = if pairs.is_empty() {
        (Verdict::Insufficient, Verdict::Insufficient)
    } else {
        let low = lowest.map(|v| v.unwrap_or_default() as f64);
        (
            Verdict::higher_wins(votes.p1 as f64, votes.p2 as f64),
            Verdict::lower_wins(low.p1, low.p2),
        )
    };

    DecimalVotes {
        votes,
        compared_rounds: pairs.len(),
        lowest,
        lowest_verdict,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::pairs;

    #[test]
    fn hundredths_rounds_float_noise() {
        assert_eq!(hundredths(1.85), 85);
        assert_eq!(hundredths(2.07), 7);
        assert_eq!(hundredths(3.00), 0);
        assert_eq!(hundredths(1.999), 100);
    }

    #[test]
    fn counts_votes_and_skips_equal_rounds() {
        let v = decimal_votes(&pairs(&[(1.20, 1.50), (2.30, 1.50), (1.30, 2.10), (1.40, 1.40)]));
        assert_eq!(v.votes, PerPlayer::new(2, 1));
        assert_eq!(v.verdict, Verdict::Player1);
        assert!(v.votes.p1 + v.votes.p2 <= v.compared_rounds as u32);
        assert_eq!(v.lowest, PerPlayer::new(Some(20), Some(10)));
        assert_eq!(v.lowest_verdict, Verdict::Player2);
    }

    #[test]
    fn equal_votes_tie() {
        let v = decimal_votes(&pairs(&[(1.20, 1.50), (2.50, 1.30)]));
        assert_eq!(v.verdict, Verdict::Tie);
    }

    #[test]
    fn no_rounds_is_insufficient() {
        let v = decimal_votes(&[]);
        assert_eq!(v.verdict, Verdict::Insufficient);
        assert_eq!(v.lowest, PerPlayer::new(None, None));
    }
}
