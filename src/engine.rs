//! # Calculation Engine
//! Pure, testable logic that maps the raw form → `ComputationResult`.
//! No I/O and no hidden state: the same input always yields the same result.
//!
//! Flow: validate → included rounds → metrics → prediction → verdict texts.
//! Invalid or insufficient input short-circuits with an `InputError`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coefficient::{validate, InputError, RoundInput, Validation};
use crate::config::CalcConfig;
use crate::decision::MetricVerdict;
use crate::explain;
use crate::metrics::MetricsReport;
use crate::prediction::{predict, Prediction};

/// Verdict + explanation for every metric and the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictSheet {
    pub decimal_sum: MetricVerdict,
    pub spread: MetricVerdict,
    pub dynamics: MetricVerdict,
    pub votes: MetricVerdict,
    pub stability: MetricVerdict,
    pub prediction: MetricVerdict,
}

impl VerdictSheet {
    pub fn build(metrics: &MetricsReport, prediction: &Prediction) -> Self {
        Self {
            decimal_sum: explain::decimal_sum(&metrics.decimal_sum),
            spread: explain::spread(&metrics.spread),
            dynamics: explain::dynamics(&metrics.dynamics),
            votes: explain::votes(&metrics.votes),
            stability: explain::stability(&metrics.stability),
            prediction: explain::prediction(prediction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    pub validation: Validation,
    pub metrics: MetricsReport,
    pub prediction: Prediction,
    pub verdicts: VerdictSheet,
}

impl ComputationResult {
    pub fn report_lines(&self) -> Vec<String> {
        explain::report_lines(self)
    }
}

/// Evaluate the metrics over an already validated form, ignoring its errors.
/// `compute` is the gated entry point; this one is for callers that want the
/// "insufficient data" picture of an incomplete form.
pub fn evaluate(validation: Validation, cfg: &CalcConfig) -> ComputationResult {
    let pairs = validation.included();
    let metrics = MetricsReport::evaluate(&pairs, cfg);
    let prediction = predict(&metrics, cfg);
    let verdicts = VerdictSheet::build(&metrics, &prediction);

    debug!(
        included = metrics.included_rounds,
        sum_p1 = metrics.decimal_sum.sums.p1,
        sum_p2 = metrics.decimal_sum.sums.p2,
        spread = ?metrics.spread.verdict,
        votes = ?metrics.votes.votes,
        winner = ?prediction.winner,
        scores = ?prediction.scores,
        "form evaluated"
    );

    ComputationResult {
        validation,
        metrics,
        prediction,
        verdicts,
    }
}

/// Validate the form and, when it is computable, evaluate every metric.
pub fn compute(rounds: &[RoundInput], cfg: &CalcConfig) -> Result<ComputationResult, InputError> {
    let validation = validate(rounds, cfg);
    if let Some(err) = validation.first_error() {
        debug!(kind = ?err.kind(), invalid = validation.invalid_fields.len(), "form not computable");
        return Err(err.clone());
    }
    Ok(evaluate(validation, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficient::InputErrorKind;
    use crate::decision::Verdict;
    use crate::prediction::PredictedWinner;

    #[test]
    fn ok_on_first_round_only() {
        let r = compute(&[RoundInput::new("1.85", "1.95")], &CalcConfig::default()).unwrap();
        assert_eq!(r.metrics.included_rounds, 1);
        assert_eq!(r.verdicts.decimal_sum.verdict, Verdict::Player1);
        assert_eq!(r.verdicts.spread.verdict, Verdict::Insufficient);
        assert_eq!(r.prediction.winner, PredictedWinner::Player1);
    }

    #[test]
    fn format_error_wins_over_insufficient() {
        let err = compute(&[RoundInput::new("2.50", "abc")], &CalcConfig::default()).unwrap_err();
        assert_eq!(err.kind(), InputErrorKind::FormatOrRange);
    }

    #[test]
    fn evaluate_reports_insufficient_for_empty_form() {
        let cfg = CalcConfig::default();
        let v = validate(&[], &cfg);
        let r = evaluate(v, &cfg);
        assert_eq!(r.verdicts.decimal_sum.verdict, Verdict::Insufficient);
        assert_eq!(r.verdicts.votes.verdict, Verdict::Insufficient);
        assert_eq!(r.prediction.winner, PredictedWinner::Undetermined);
    }

    #[test]
    fn report_has_prediction_last() {
        let r = compute(
            &[RoundInput::new("1.85", "1.95"), RoundInput::new("1.50", "1.99")],
            &CalcConfig::default(),
        )
        .unwrap();
        let lines = r.report_lines();
        assert_eq!(lines[0], "Player 1 decimal-part sum: 1.35");
        assert!(lines.last().unwrap().starts_with("Prediction: Player 1"));
    }
}
