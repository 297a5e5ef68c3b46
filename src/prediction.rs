//! # Composite prediction
//! Combines the metric results into one predicted winner with reasons.
//!
//! Two strategies are available; `weighted` is the default:
//! - `weighted`: points from decimal sum (+2), spread (+3 per qualifier, +1
//!   for a confidence lead above the margin) and votes (+1); a lead of at
//!   least `clear_margin` is a clear advantage, any lead a slight one.
//! - `last_round_priority`: a last-round delta gap above `dynamic_threshold`
//!   decides outright; otherwise the decimal sum alone decides.

use serde::{Deserialize, Serialize};

use crate::config::CalcConfig;
use crate::decision::{PerPlayer, Player, Reason, ReasonKind, Verdict, EPS};
use crate::metrics::MetricsReport;

const DECIMAL_SUM_POINTS: u32 = 2;
const SPREAD_POINTS: u32 = 3;
const CONFIDENCE_MARGIN_POINTS: u32 = 1;
const VOTES_POINTS: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStrategy {
    #[default]
    Weighted,
    LastRoundPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictedWinner {
    #[serde(rename = "1")]
    Player1,
    #[serde(rename = "2")]
    Player2,
    #[serde(rename = "undetermined")]
    Undetermined,
}

impl PredictedWinner {
    pub fn player(self) -> Option<Player> {
        match self {
            PredictedWinner::Player1 => Some(Player::One),
            PredictedWinner::Player2 => Some(Player::Two),
            PredictedWinner::Undetermined => None,
        }
    }

    fn from_player(player: Player) -> Self {
        match player {
            Player::One => PredictedWinner::Player1,
            Player::Two => PredictedWinner::Player2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    Clear,
    Slight,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub strategy: PredictionStrategy,
    pub winner: PredictedWinner,
    pub advantage: Advantage,
    pub scores: PerPlayer<u32>,
    /// Triggered rules in evaluation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<Reason>,
    /// Reason messages joined with "; ".
    pub reason_text: String,
}

impl Prediction {
    fn finish(
        strategy: PredictionStrategy,
        winner: PredictedWinner,
        advantage: Advantage,
        scores: PerPlayer<u32>,
        reasons: Vec<Reason>,
    ) -> Self {
        let reason_text = reasons
            .iter()
            .map(|r| r.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            strategy,
            winner,
            advantage,
            scores,
            reasons,
            reason_text,
        }
    }
}

pub fn predict(metrics: &MetricsReport, cfg: &CalcConfig) -> Prediction {
    match cfg.strategy {
        PredictionStrategy::Weighted => weighted(metrics, cfg),
        PredictionStrategy::LastRoundPriority => last_round_priority(metrics, cfg),
    }
}

fn weighted(metrics: &MetricsReport, cfg: &CalcConfig) -> Prediction {
    let mut scores = PerPlayer::new(0u32, 0u32);
    let mut reasons = Vec::new();

    // 1) Decimal sum
    if let Some(player) = metrics.decimal_sum.verdict.winner() {
        *scores.get_mut(player) += DECIMAL_SUM_POINTS;
        reasons.push(
            Reason::new(
                ReasonKind::DecimalSum,
                player,
                format!("lower decimal-part sum ({player}, +{DECIMAL_SUM_POINTS})"),
            )
            .points(DECIMAL_SUM_POINTS),
        );
    }

    // 2) Spread: every qualifier scores, a clear confidence lead adds one more
    let spread = &metrics.spread.players;
    for player in Player::BOTH {
        let stats = spread.get(player);
        if stats.has_higher_chances {
            *scores.get_mut(player) += SPREAD_POINTS;
            reasons.push(
                Reason::new(
                    ReasonKind::Spread,
                    player,
                    format!(
                        "spread confidence {:.0}% with more decrease than increase ({player}, +{SPREAD_POINTS})",
                        stats.confidence
                    ),
                )
                .points(SPREAD_POINTS),
            );
        }
    }
    if spread.p1.has_higher_chances && spread.p2.has_higher_chances {
        let lead = spread.p1.confidence - spread.p2.confidence;
        let leader = if lead > cfg.confidence_margin + EPS {
            Some(Player::One)
        } else if -lead > cfg.confidence_margin + EPS {
            Some(Player::Two)
        } else {
            None
        };
        if let Some(player) = leader {
            *scores.get_mut(player) += CONFIDENCE_MARGIN_POINTS;
            reasons.push(
                Reason::new(
                    ReasonKind::ConfidenceMargin,
                    player,
                    format!(
                        "confidence ahead by more than {:.0} points ({player}, +{CONFIDENCE_MARGIN_POINTS})",
                        cfg.confidence_margin
                    ),
                )
                .points(CONFIDENCE_MARGIN_POINTS),
            );
        }
    }

    // 3) Smallest-decimal votes
    if let Some(player) = metrics.votes.verdict.winner() {
        *scores.get_mut(player) += VOTES_POINTS;
        reasons.push(
            Reason::new(
                ReasonKind::Votes,
                player,
                format!(
                    "more smallest-decimal votes, {}:{} ({player}, +{VOTES_POINTS})",
                    metrics.votes.votes.p1, metrics.votes.votes.p2
                ),
            )
            .points(VOTES_POINTS),
        );
    }

    let (winner, advantage) = match Verdict::higher_wins(scores.p1 as f64, scores.p2 as f64).winner() {
        Some(player) => {
            let lead = scores.get(player) - scores.get(player.other());
            let advantage = if lead >= cfg.clear_margin {
                Advantage::Clear
            } else {
                Advantage::Slight
            };
            (PredictedWinner::from_player(player), advantage)
        }
        None => (PredictedWinner::Undetermined, Advantage::None),
    };

    Prediction::finish(PredictionStrategy::Weighted, winner, advantage, scores, reasons)
}

fn last_round_priority(metrics: &MetricsReport, cfg: &CalcConfig) -> Prediction {
    let dynamics = &metrics.dynamics;
    let scores = PerPlayer::new(0u32, 0u32);

    // Priority 1: a large enough last-round gap locks in the winner.
    if dynamics.is_available() && dynamics.delta_gap() > cfg.dynamic_threshold + EPS {
        if let Some(player) = dynamics.verdict.winner() {
            let reason = Reason::new(
                ReasonKind::LastRoundDynamic,
                player,
                format!(
                    "last-round dynamic: {player} coefficient fell more (gap {:.2} > {:.2})",
                    dynamics.delta_gap(),
                    cfg.dynamic_threshold
                ),
            );
            return Prediction::finish(
                PredictionStrategy::LastRoundPriority,
                PredictedWinner::from_player(player),
                Advantage::Clear,
                scores,
                vec![reason],
            );
        }
    }

    // Priority 2: decimal sum alone.
    match metrics.decimal_sum.verdict.winner() {
        Some(player) => Prediction::finish(
            PredictionStrategy::LastRoundPriority,
            PredictedWinner::from_player(player),
            Advantage::Slight,
            scores,
            vec![Reason::new(
                ReasonKind::DecimalSum,
                player,
                format!("lower decimal-part sum ({player})"),
            )],
        ),
        None => Prediction::finish(
            PredictionStrategy::LastRoundPriority,
            PredictedWinner::Undetermined,
            Advantage::None,
            scores,
            Vec::new(),
        ),
    }
}
