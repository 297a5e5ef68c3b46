//! Coefficient parsing and form validation.
//!
//! Raw per-field text becomes a `FieldState`; the whole form becomes a
//! `Validation` that knows which fields are invalid, whether the minimum input
//! is present, and which rounds the metrics may use.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::CalcConfig;
use crate::decision::Player;

/// Plain decimal literal after comma normalization: `12`, `1.5`, `1.`, `.5`.
static DECIMAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+\.?\d*|\.\d+)$").expect("decimal literal regex"));

/// Raw text of one round as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInput {
    #[serde(default)]
    pub p1: Option<String>,
    #[serde(default)]
    pub p2: Option<String>,
}

impl RoundInput {
    pub fn new(p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            p1: Some(p1.into()),
            p2: Some(p2.into()),
        }
    }

    pub fn get(&self, player: Player) -> Option<&str> {
        match player {
            Player::One => self.p1.as_deref(),
            Player::Two => self.p2.as_deref(),
        }
    }

    pub fn set(&mut self, player: Player, value: Option<String>) {
        match player {
            Player::One => self.p1 = value,
            Player::Two => self.p2 = value,
        }
    }
}

/// Address of one input field on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId {
    /// 0-based round index.
    pub round: usize,
    pub player: Player,
}

impl FieldId {
    pub fn new(round: usize, player: Player) -> Self {
        Self { round, player }
    }

    /// Stable cache key, e.g. `g5P1` for player 1 in the round labeled 5.
    pub fn cache_key(&self, first_round_label: u32) -> String {
        format!(
            "g{}P{}",
            first_round_label + self.round as u32,
            self.player.number()
        )
    }
}

/// Parsed state of a single coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldState {
    Absent,
    Invalid,
    Valid(f64),
}

impl FieldState {
    pub fn value(self) -> Option<f64> {
        match self {
            FieldState::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, FieldState::Valid(_))
    }
}

/// Parse one raw coefficient against the configured range.
pub fn parse_coefficient(raw: Option<&str>, cfg: &CalcConfig) -> FieldState {
    let Some(raw) = raw else {
        return FieldState::Absent;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldState::Absent;
    }
    let normalized = trimmed.replacen(',', ".", 1);
    if !DECIMAL_LITERAL.is_match(&normalized) {
        return FieldState::Invalid;
    }
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() && (cfg.min_coefficient..=cfg.max_coefficient).contains(&v) => {
            FieldState::Valid(v)
        }
        _ => FieldState::Invalid,
    }
}

/// Both coefficients of one round, valid on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientPair {
    pub round: usize,
    pub label: u32,
    pub p1: f64,
    pub p2: f64,
}

impl CoefficientPair {
    pub fn get(&self, player: Player) -> f64 {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub index: usize,
    pub label: u32,
    pub p1: FieldState,
    pub p2: FieldState,
}

impl RoundState {
    pub fn get(&self, player: Player) -> FieldState {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }

    pub fn pair(&self) -> Option<CoefficientPair> {
        match (self.p1, self.p2) {
            (FieldState::Valid(p1), FieldState::Valid(p2)) => Some(CoefficientPair {
                round: self.index,
                label: self.label,
                p1,
                p2,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputErrorKind {
    FormatOrRange,
    InsufficientInput,
}

/// Recoverable input problems; fixed by further editing, never fatal.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputError {
    #[error("enter valid coefficients (numbers from {min:.2} to {max:.2})")]
    FormatOrRange {
        fields: Vec<FieldId>,
        min: f64,
        max: f64,
    },
    #[error("fill in both coefficients of the first {required_rounds} round(s), starting with round {first_label}")]
    InsufficientInput {
        required_rounds: usize,
        first_label: u32,
    },
}

impl InputError {
    pub fn kind(&self) -> InputErrorKind {
        match self {
            InputError::FormatOrRange { .. } => InputErrorKind::FormatOrRange,
            InputError::InsufficientInput { .. } => InputErrorKind::InsufficientInput,
        }
    }
}

/// Result of validating the whole form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub rounds: Vec<RoundState>,
    /// No present field is invalid.
    pub all_valid: bool,
    /// Every field on the form holds a valid coefficient.
    pub all_filled: bool,
    pub invalid_fields: Vec<FieldId>,
    /// `FormatOrRange` first (when present), then `InsufficientInput`.
    pub errors: Vec<InputError>,
}

impl Validation {
    pub fn is_computable(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first_error(&self) -> Option<&InputError> {
        self.errors.first()
    }

    pub fn has_error(&self, kind: InputErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind() == kind)
    }

    /// Per-field "invalid" marker for the presentation layer.
    pub fn is_invalid(&self, field: FieldId) -> bool {
        self.invalid_fields.contains(&field)
    }

    /// Highest round index with at least one valid coefficient.
    pub fn last_filled_index(&self) -> Option<usize> {
        self.rounds
            .iter()
            .rposition(|r| r.p1.is_valid() || r.p2.is_valid())
    }

    /// Rounds `0..=last_filled` with both coefficients valid, in order.
    pub fn included(&self) -> Vec<CoefficientPair> {
        let Some(last) = self.last_filled_index() else {
            return Vec::new();
        };
        self.rounds[..=last]
            .iter()
            .filter_map(RoundState::pair)
            .collect()
    }
}

/// Validate the raw form. Missing trailing rounds count as empty.
pub fn validate(rounds: &[RoundInput], cfg: &CalcConfig) -> Validation {
    if rounds.len() > cfg.rounds {
        warn!(
            got = rounds.len(),
            expected = cfg.rounds,
            "extra rounds ignored"
        );
    }

    let empty = RoundInput::default();
    let mut states = Vec::with_capacity(cfg.rounds);
    let mut invalid_fields = Vec::new();

    for index in 0..cfg.rounds {
        let input = rounds.get(index).unwrap_or(&empty);
        let p1 = parse_coefficient(input.get(Player::One), cfg);
        let p2 = parse_coefficient(input.get(Player::Two), cfg);
        for (player, state) in [(Player::One, p1), (Player::Two, p2)] {
            if state == FieldState::Invalid {
                invalid_fields.push(FieldId::new(index, player));
            }
        }
        states.push(RoundState {
            index,
            label: cfg.round_label(index),
            p1,
            p2,
        });
    }

    let all_valid = invalid_fields.is_empty();
    let all_filled = states.iter().all(|r| r.p1.is_valid() && r.p2.is_valid());
    let minimum_met = states
        .iter()
        .take(cfg.required_rounds)
        .all(|r| r.pair().is_some());

    let mut errors = Vec::new();
    if !all_valid {
        errors.push(InputError::FormatOrRange {
            fields: invalid_fields.clone(),
            min: cfg.min_coefficient,
            max: cfg.max_coefficient,
        });
    }
    if !minimum_met {
        errors.push(InputError::InsufficientInput {
            required_rounds: cfg.required_rounds,
            first_label: cfg.first_round_label,
        });
    }

    Validation {
        rounds: states,
        all_valid,
        all_filled,
        invalid_fields,
        errors,
    }
}
