//! Metrics over the included rounds of a validated form.
//!
//! Every metric takes the same ordered slice of `CoefficientPair`s (rounds
//! where both coefficients are valid) and is independent of the others; the
//! prediction combines them afterwards.
//!
//! - `decimal_sum`: total decimal part per player, lower wins
//! - `spread`:      decrease/increase accumulators and confidence percent
//! - `dynamics`:    movement between the last two included rounds
//! - `votes`:       per-round vote for the smaller rounded decimal part
//! - `stability`:   total absolute movement, lower is more stable

pub mod decimal_sum;
pub mod dynamics;
pub mod spread;
pub mod stability;
pub mod votes;

use serde::{Deserialize, Serialize};

use crate::coefficient::CoefficientPair;
use crate::config::CalcConfig;

pub use decimal_sum::{decimal_sum, DecimalSum};
pub use dynamics::{last_round_dynamics, LastRoundDynamics, Movement};
pub use spread::{confidence_percent, spread, SpreadAnalysis, SpreadOutcome, SpreadStats};
pub use stability::{stability, Stability};
pub use votes::{decimal_votes, hundredths, DecimalVotes};

/// `value - floor(value)`; in [0, 1) for every finite input.
pub fn decimal_part(value: f64) -> f64 {
    value - value.floor()
}

/// All metric results for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub included_rounds: usize,
    pub decimal_sum: DecimalSum,
    pub spread: SpreadAnalysis,
    pub dynamics: LastRoundDynamics,
    pub votes: DecimalVotes,
    pub stability: Stability,
}

impl MetricsReport {
    pub fn evaluate(pairs: &[CoefficientPair], cfg: &CalcConfig) -> Self {
        Self {
            included_rounds: pairs.len(),
            decimal_sum: decimal_sum(pairs),
            spread: spread(pairs, cfg.confidence_threshold),
            dynamics: last_round_dynamics(pairs),
            votes: decimal_votes(pairs),
            stability: stability(pairs),
        }
    }
}

#[cfg(test)]
pub(crate) fn pairs(values: &[(f64, f64)]) -> Vec<CoefficientPair> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(p1, p2))| CoefficientPair {
            round: i,
            label: 5 + i as u32,
            p1,
            p2,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Verdict;

    #[test]
    fn decimal_part_stays_in_unit_interval() {
        for h in 100..=1000u32 {
            let v = h as f64 / 100.0;
            let d = decimal_part(v);
            assert!((0.0..1.0).contains(&d), "{v} -> {d}");
        }
    }

    #[test]
    fn empty_input_is_insufficient_everywhere() {
        let r = MetricsReport::evaluate(&[], &CalcConfig::default());
        assert_eq!(r.included_rounds, 0);
        assert_eq!(r.decimal_sum.verdict, Verdict::Insufficient);
        assert_eq!(r.spread.verdict, Verdict::Insufficient);
        assert_eq!(r.dynamics.verdict, Verdict::Insufficient);
        assert_eq!(r.votes.verdict, Verdict::Insufficient);
        assert_eq!(r.stability.verdict, Verdict::Insufficient);
    }
}
