//! decision.rs: shared verdict vocabulary for every metric and the prediction.
//!
//! Each metric ends up as a `Verdict` (who "wins" the metric) plus a readable
//! explanation, so the presentation layer never has to interpret raw numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing accumulated floating point totals.
pub const EPS: f64 = 1e-9;

/// One of the two players on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// 1 or 2, as printed on the form.
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// A value tracked separately for each player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub p1: T,
    pub p2: T,
}

impl<T> PerPlayer<T> {
    pub fn new(p1: T, p2: T) -> Self {
        Self { p1, p2 }
    }

    pub fn get(&self, player: Player) -> &T {
        match player {
            Player::One => &self.p1,
            Player::Two => &self.p2,
        }
    }

    pub fn get_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::One => &mut self.p1,
            Player::Two => &mut self.p2,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerPlayer<U> {
        PerPlayer {
            p1: f(self.p1),
            p2: f(self.p2),
        }
    }

    /// Exchange the two sides (used by symmetry checks).
    pub fn swapped(self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }
}

/// Outcome of a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Player1,
    Player2,
    /// Equal result, or no player qualified ("undetermined").
    Tie,
    /// Not enough comparable rounds to say anything.
    Insufficient,
}

impl Verdict {
    pub fn for_player(player: Player) -> Self {
        match player {
            Player::One => Verdict::Player1,
            Player::Two => Verdict::Player2,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Verdict::Player1 => Some(Player::One),
            Verdict::Player2 => Some(Player::Two),
            Verdict::Tie | Verdict::Insufficient => None,
        }
    }

    /// The smaller value wins; values within `EPS` tie.
    pub fn lower_wins(p1: f64, p2: f64) -> Self {
        if (p1 - p2).abs() <= EPS {
            Verdict::Tie
        } else if p1 < p2 {
            Verdict::Player1
        } else {
            Verdict::Player2
        }
    }

    /// The larger value wins; values within `EPS` tie.
    pub fn higher_wins(p1: f64, p2: f64) -> Self {
        Self::lower_wins(p2, p1)
    }

    /// Mirror the verdict as if the players had been swapped.
    pub fn swapped(self) -> Self {
        match self {
            Verdict::Player1 => Verdict::Player2,
            Verdict::Player2 => Verdict::Player1,
            other => other,
        }
    }
}

/// A verdict with the sentence shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricVerdict {
    pub verdict: Verdict,
    pub explanation: String,
}

impl MetricVerdict {
    pub fn new(verdict: Verdict, explanation: impl Into<String>) -> Self {
        Self {
            verdict,
            explanation: explanation.into(),
        }
    }
}

/// Rough categories of prediction reasons, in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    LastRoundDynamic,
    DecimalSum,
    Spread,
    ConfidenceMargin,
    Votes,
}

/// Why the prediction awarded points (explainability).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub message: String,
    pub kind: ReasonKind,
    /// Player that received the points.
    pub player: Player,
    /// Points awarded; 0 for rules that decide outright.
    #[serde(default)]
    pub points: u32,
}

impl Reason {
    pub fn new(kind: ReasonKind, player: Player, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            player,
            points: 0,
        }
    }

    pub fn points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }
}
