//! Verdict formatter: metric results → verdict + sentence for the user.
//!
//! All numbers are printed with two decimals, percentages without decimals.

use crate::decision::{MetricVerdict, Player, Verdict};
use crate::engine::ComputationResult;
use crate::metrics::{
    DecimalSum, DecimalVotes, LastRoundDynamics, Movement, SpreadAnalysis, SpreadOutcome,
    Stability,
};
use crate::prediction::{Advantage, PredictedWinner, Prediction};

pub fn decimal_sum(m: &DecimalSum) -> MetricVerdict {
    let text = match m.verdict {
        Verdict::Player1 | Verdict::Player2 => format!(
            "Winner by decimal-part sum: {} (lower by {:.2})",
            winner_name(m.verdict),
            m.advantage
        ),
        Verdict::Tie => "Decimal-part sums are equal: probable push".to_string(),
        Verdict::Insufficient => "Decimal-part sum: insufficient data".to_string(),
    };
    MetricVerdict::new(m.verdict, text)
}

pub fn spread(m: &SpreadAnalysis) -> MetricVerdict {
    let text = match m.outcome {
        SpreadOutcome::Insufficient => {
            "Spread analysis: insufficient data (at least two rounds needed)".to_string()
        }
        SpreadOutcome::SingleQualifier => {
            format!("Spread analysis: {} has higher chances", winner_name(m.verdict))
        }
        SpreadOutcome::HigherConfidence => format!(
            "Spread analysis: both players qualify, {} has the higher confidence ({:.0}% vs {:.0}%)",
            winner_name(m.verdict),
            m.players.p1.confidence.max(m.players.p2.confidence),
            m.players.p1.confidence.min(m.players.p2.confidence),
        ),
        SpreadOutcome::EqualStrength => format!(
            "Spread analysis: both players qualify with equal strength ({:.0}%)",
            m.players.p1.confidence
        ),
        SpreadOutcome::UndeterminedWithIncrease => {
            "Spread analysis: undetermined, coefficients went up without a dominant decrease"
                .to_string()
        }
        SpreadOutcome::UndeterminedFlat => {
            "Spread analysis: undetermined, coefficients did not move".to_string()
        }
    };
    MetricVerdict::new(m.verdict, text)
}

pub fn dynamics(m: &LastRoundDynamics) -> MetricVerdict {
    let Some((from, to)) = m.window else {
        return MetricVerdict::new(
            m.verdict,
            "Last-round dynamic: insufficient data (two filled rounds needed)",
        );
    };
    let leader = match m.verdict {
        Verdict::Player1 | Verdict::Player2 => {
            format!("{} coefficient fell more", winner_name(m.verdict))
        }
        _ => "no difference between players".to_string(),
    };
    let text = format!(
        "Last-round dynamic (round {from} → {to}): Player 1 {}, Player 2 {}; {leader}",
        movement(m.movements.p1),
        movement(m.movements.p2),
    );
    MetricVerdict::new(m.verdict, text)
}

pub fn votes(m: &DecimalVotes) -> MetricVerdict {
    let text = match m.verdict {
        Verdict::Insufficient => "Smallest-decimal votes: insufficient data".to_string(),
        Verdict::Tie => format!(
            "Smallest-decimal votes: tie ({}:{})",
            m.votes.p1, m.votes.p2
        ),
        _ => format!(
            "Probable winner by smallest decimal part: {} ({}:{} votes)",
            winner_name(m.verdict),
            m.votes.p1,
            m.votes.p2
        ),
    };
    MetricVerdict::new(m.verdict, text)
}

pub fn stability(m: &Stability) -> MetricVerdict {
    let text = match m.verdict {
        Verdict::Insufficient => "Stability: insufficient data".to_string(),
        Verdict::Tie => format!("Stability: equal movement ({:.2})", m.movement.p1),
        _ => format!("Stability: {} is more stable", winner_name(m.verdict)),
    };
    MetricVerdict::new(m.verdict, text)
}

pub fn prediction(p: &Prediction) -> MetricVerdict {
    let verdict = match p.winner.player() {
        Some(player) => Verdict::for_player(player),
        None => Verdict::Tie,
    };
    let headline = match (p.winner, p.advantage) {
        (PredictedWinner::Undetermined, _) | (_, Advantage::None) => {
            "Prediction: undetermined / tie".to_string()
        }
        (winner, Advantage::Clear) => {
            format!("Prediction: {} (clear advantage)", predicted_name(winner))
        }
        (winner, Advantage::Slight) => {
            format!("Prediction: {} (slight advantage)", predicted_name(winner))
        }
    };
    let text = if p.reason_text.is_empty() {
        headline
    } else {
        format!("{headline}. Reasons: {}", p.reason_text)
    };
    MetricVerdict::new(verdict, text)
}

/// Full textual report in display order.
pub fn report_lines(result: &ComputationResult) -> Vec<String> {
    let m = &result.metrics;
    let v = &result.verdicts;
    let mut lines = Vec::new();

    for player in Player::BOTH {
        lines.push(format!(
            "{player} decimal-part sum: {:.2}",
            m.decimal_sum.sums.get(player)
        ));
    }
    lines.push(v.decimal_sum.explanation.clone());

    if m.spread.outcome != SpreadOutcome::Insufficient {
        for player in Player::BOTH {
            let s = m.spread.players.get(player);
            lines.push(format!(
                "{player} spread: decrease {:.2}, increase {:.2}, confidence {:.0}%",
                s.total_decrease, s.total_increase, s.confidence
            ));
        }
    }
    lines.push(v.spread.explanation.clone());
    lines.push(v.dynamics.explanation.clone());

    if m.stability.verdict != Verdict::Insufficient {
        for player in Player::BOTH {
            lines.push(format!(
                "{player} total movement: {:.2}",
                m.stability.movement.get(player)
            ));
        }
    }
    lines.push(v.stability.explanation.clone());

    lines.push(v.votes.explanation.clone());
    if let (Some(l1), Some(l2)) = (m.votes.lowest.p1, m.votes.lowest.p2) {
        lines.push(format!(
            "Lowest single decimal part: Player 1 .{l1:02}, Player 2 .{l2:02}"
        ));
    }

    lines.push(v.prediction.explanation.clone());
    lines
}

fn movement(m: Movement) -> String {
    match m {
        Movement::Decreased(x) => format!("decreased by {x:.2}"),
        Movement::Increased(x) => format!("increased by {x:.2}"),
        Movement::Unchanged => "unchanged".to_string(),
    }
}

fn winner_name(v: Verdict) -> String {
    v.winner()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "nobody".to_string())
}

fn predicted_name(w: PredictedWinner) -> String {
    w.player()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "undetermined".to_string())
}
