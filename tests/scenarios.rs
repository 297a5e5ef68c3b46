// tests/scenarios.rs
//
// End-to-end scenarios through the public `compute` entry point.

use coeff_form_analyzer::metrics::SpreadOutcome;
use coeff_form_analyzer::{
    compute, evaluate, validate, CalcConfig, FieldId, InputError, InputErrorKind, Player,
    RoundInput, Verdict,
};

fn cfg() -> CalcConfig {
    CalcConfig::default()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn first_round_only_is_enough() {
    let r = compute(&[RoundInput::new("1.85", "1.95")], &cfg()).expect("minimum met");
    assert!(!r.validation.has_error(InputErrorKind::InsufficientInput));
    assert!(approx(r.metrics.decimal_sum.sums.p1, 0.85));
    assert!(approx(r.metrics.decimal_sum.sums.p2, 0.95));
    assert_eq!(r.verdicts.decimal_sum.verdict, Verdict::Player1);
}

#[test]
fn spread_two_rounds() {
    let r = compute(
        &[RoundInput::new("1.85", "1.95"), RoundInput::new("1.50", "1.99")],
        &cfg(),
    )
    .unwrap();
    let s = &r.metrics.spread;
    assert!(approx(s.players.p1.total_decrease, 0.35));
    assert!(approx(s.players.p1.total_increase, 0.0));
    assert!(approx(s.players.p1.confidence, 100.0));
    assert!(approx(s.players.p2.total_decrease, 0.0));
    assert!(approx(s.players.p2.total_increase, 0.04));
    assert!(approx(s.players.p2.confidence, 0.0));
    assert_eq!(s.outcome, SpreadOutcome::SingleQualifier);
    assert_eq!(r.verdicts.spread.verdict, Verdict::Player1);
    assert_eq!(
        r.verdicts.spread.explanation,
        "Spread analysis: Player 1 has higher chances"
    );
}

#[test]
fn spread_confidence_of_exactly_75_qualifies() {
    // P1: -0.30 then +0.10 → 75%
    let r = compute(
        &[
            RoundInput::new("2.00", "3.00"),
            RoundInput::new("1.70", "3.00"),
            RoundInput::new("1.80", "3.00"),
        ],
        &cfg(),
    )
    .unwrap();
    assert!(r.metrics.spread.players.p1.has_higher_chances);
    assert_eq!(r.metrics.spread.verdict, Verdict::Player1);
    // the +3 spread points reach the prediction: P1 3 vs P2 sum +2, votes +1
    assert_eq!(r.prediction.scores.p1, 3);
    assert_eq!(r.prediction.scores.p2, 3);
}

#[test]
fn garbage_coefficient_is_format_error() {
    let err = compute(&[RoundInput::new("2.50", "abc")], &cfg()).unwrap_err();
    assert_eq!(err.kind(), InputErrorKind::FormatOrRange);
    match err {
        InputError::FormatOrRange { fields, .. } => {
            assert_eq!(fields, vec![FieldId::new(0, Player::Two)]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn empty_form_is_insufficient_everywhere() {
    let rounds = vec![RoundInput::new("", ""); 6];
    let err = compute(&rounds, &cfg()).unwrap_err();
    assert_eq!(err.kind(), InputErrorKind::InsufficientInput);

    let r = evaluate(validate(&rounds, &cfg()), &cfg());
    for v in [
        &r.verdicts.decimal_sum,
        &r.verdicts.spread,
        &r.verdicts.dynamics,
        &r.verdicts.votes,
        &r.verdicts.stability,
    ] {
        assert_eq!(v.verdict, Verdict::Insufficient, "{}", v.explanation);
        assert!(v.explanation.contains("insufficient data"), "{}", v.explanation);
    }
}

#[test]
fn equal_decimal_sums_push() {
    let r = compute(&[RoundInput::new("1.50", "2.50")], &cfg()).unwrap();
    assert_eq!(r.metrics.decimal_sum.verdict, Verdict::Tie);
    assert_eq!(r.metrics.decimal_sum.advantage, 0.0);
    assert!(r.verdicts.decimal_sum.explanation.contains("probable push"));
}

#[test]
fn decimal_comma_is_accepted() {
    let r = compute(&[RoundInput::new("1,85", "1,95")], &cfg()).unwrap();
    assert!(approx(r.metrics.decimal_sum.sums.p1, 0.85));
}

#[test]
fn out_of_range_is_format_error() {
    for bad in ["0.50", "10.5", "0"] {
        let err = compute(&[RoundInput::new(bad, "1.50")], &cfg()).unwrap_err();
        assert_eq!(err.kind(), InputErrorKind::FormatOrRange, "{bad}");
    }
}

#[test]
fn full_form_feeds_every_metric() {
    let rounds = vec![
        RoundInput::new("2.10", "1.70"),
        RoundInput::new("2.00", "1.75"),
        RoundInput::new("1.90", "1.80"),
        RoundInput::new("1.80", "1.85"),
        RoundInput::new("1.75", "1.95"),
        RoundInput::new("1.60", "2.05"),
    ];
    let r = compute(&rounds, &cfg()).unwrap();
    assert!(r.validation.all_filled);
    assert_eq!(r.metrics.included_rounds, 6);
    // P1 only ever falls, P2 only ever rises
    assert_eq!(r.metrics.spread.verdict, Verdict::Player1);
    assert_eq!(r.metrics.dynamics.verdict, Verdict::Player1);
    assert_eq!(r.metrics.dynamics.window, Some((9, 10)));
    assert_eq!(r.prediction.winner.player(), Some(Player::One));
}
