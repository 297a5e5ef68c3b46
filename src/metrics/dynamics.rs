//! Last-round dynamic: movement between the last included round and the one
//! before it. Descriptive; the prediction may use the delta gap as a signal.

use serde::{Deserialize, Serialize};

use crate::coefficient::CoefficientPair;
use crate::decision::{PerPlayer, Player, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", content = "by", rename_all = "snake_case")]
pub enum Movement {
    Decreased(f64),
    Increased(f64),
    Unchanged,
}

impl Movement {
    /// `delta = previous - last`; exactly zero is "unchanged".
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Movement::Decreased(delta)
        } else if delta < 0.0 {
            Movement::Increased(-delta)
        } else {
            Movement::Unchanged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRoundDynamics {
    /// Labels of the two compared rounds, `None` when fewer than two are included.
    pub window: Option<(u32, u32)>,
    pub deltas: PerPlayer<f64>,
    pub movements: PerPlayer<Movement>,
    /// Player whose coefficient fell more (or rose less).
    pub verdict: Verdict,
}

impl LastRoundDynamics {
    pub fn is_available(&self) -> bool {
        self.window.is_some()
    }

    /// `|delta1 - delta2|`
    pub fn delta_gap(&self) -> f64 {
        (self.deltas.p1 - self.deltas.p2).abs()
    }
}

pub fn last_round_dynamics(pairs: &[CoefficientPair]) -> LastRoundDynamics {
    let [.., prev, last] = pairs else {
        return LastRoundDynamics {
            window: None,
            deltas: PerPlayer::default(),
            movements: PerPlayer::new(Movement::Unchanged, Movement::Unchanged),
            verdict: Verdict::Insufficient,
        };
    };

    let deltas = PerPlayer::new(
        prev.get(Player::One) - last.get(Player::One),
        prev.get(Player::Two) - last.get(Player::Two),
    );

    LastRoundDynamics {
        window: Some((prev.label, last.label)),
        deltas,
        movements: deltas.map(Movement::from_delta),
        verdict: Verdict::higher_wins(deltas.p1, deltas.p2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::pairs;

    #[test]
    fn uses_only_the_last_two_rounds() {
        let d = last_round_dynamics(&pairs(&[(3.00, 3.00), (1.85, 1.95), (1.50, 1.99)]));
        assert_eq!(d.window, Some((6, 7)));
        match d.movements.p1 {
            Movement::Decreased(x) => assert!((x - 0.35).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
        match d.movements.p2 {
            Movement::Increased(x) => assert!((x - 0.04).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(d.verdict, Verdict::Player1);
        assert!((d.delta_gap() - 0.39).abs() < 1e-9);
    }

    #[test]
    fn unchanged_is_exact_zero() {
        let d = last_round_dynamics(&pairs(&[(1.85, 2.00), (1.85, 2.00)]));
        assert_eq!(d.movements.p1, Movement::Unchanged);
        assert_eq!(d.movements.p2, Movement::Unchanged);
        assert_eq!(d.verdict, Verdict::Tie);
    }

    #[test]
    fn single_round_is_insufficient() {
        let d = last_round_dynamics(&pairs(&[(1.85, 2.00)]));
        assert!(!d.is_available());
        assert_eq!(d.verdict, Verdict::Insufficient);
    }
}
