// src/config.rs
//! Calculator constants loaded from TOML.
//!
//! Lookup order (first hit wins):
//! 1) `$COEFF_CONFIG_PATH`
//! 2) `config/calculator.toml`
//! 3) built-in defaults
//!
//! Every loaded config is sanitized, so downstream code can rely on
//! `min_coefficient <= max_coefficient`, `rounds >= 1` and
//! `1 <= required_rounds <= rounds`.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::coefficient::FieldId;
use crate::decision::Player;
use crate::prediction::PredictionStrategy;

pub const DEFAULT_CONFIG_PATH: &str = "config/calculator.toml";
pub const ENV_CONFIG_PATH: &str = "COEFF_CONFIG_PATH";

/// Upper bounds enforced by `sanitized`.
pub const MAX_ROUNDS: usize = 64;
pub const MAX_FIRST_ROUND_LABEL: u32 = 10_000;

fn default_rounds() -> usize {
    6
}
fn default_first_round_label() -> u32 {
    5
}
fn default_min_coefficient() -> f64 {
    1.0
}
fn default_max_coefficient() -> f64 {
    10.0
}
fn default_required_rounds() -> usize {
    1
}
fn default_max_field_len() -> usize {
    4
}
fn default_confidence_threshold() -> f64 {
    75.0
}
fn default_confidence_margin() -> f64 {
    5.0
}
fn default_clear_margin() -> u32 {
    3
}
fn default_dynamic_threshold() -> f64 {
    0.05
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcConfig {
    /// Number of round slots on the form.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Label printed for the first round (rounds are labeled 5..10 by default).
    #[serde(default = "default_first_round_label")]
    pub first_round_label: u32,
    #[serde(default = "default_min_coefficient")]
    pub min_coefficient: f64,
    #[serde(default = "default_max_coefficient")]
    pub max_coefficient: f64,
    /// Leading rounds that must have both coefficients before anything is computed.
    #[serde(default = "default_required_rounds")]
    pub required_rounds: usize,
    /// Keypad/sanitizer length cap per field (e.g. "1.91").
    #[serde(default = "default_max_field_len")]
    pub max_field_len: usize,
    /// Spread confidence (percent) needed for "has higher chances".
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Confidence lead (percentage points) worth an extra point when both qualify.
    #[serde(default = "default_confidence_margin")]
    pub confidence_margin: f64,
    /// Score lead that turns a slight advantage into a clear one.
    #[serde(default = "default_clear_margin")]
    pub clear_margin: u32,
    /// Last-round delta gap that locks in the winner (last_round_priority only).
    #[serde(default = "default_dynamic_threshold")]
    pub dynamic_threshold: f64,
    #[serde(default)]
    pub strategy: PredictionStrategy,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            first_round_label: default_first_round_label(),
            min_coefficient: default_min_coefficient(),
            max_coefficient: default_max_coefficient(),
            required_rounds: default_required_rounds(),
            max_field_len: default_max_field_len(),
            confidence_threshold: default_confidence_threshold(),
            confidence_margin: default_confidence_margin(),
            clear_margin: default_clear_margin(),
            dynamic_threshold: default_dynamic_threshold(),
            strategy: PredictionStrategy::default(),
        }
    }
}

impl CalcConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: CalcConfig = toml::from_str(s).context("parsing calculator config")?;
        Ok(cfg.sanitized())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading calculator config from {}", path.display()))?;
        Self::from_toml_str(&data)
    }

    /// Env var first, then the default path, then built-in defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from_file(&default_path);
        }
        Ok(Self::default())
    }

    /// Repair out-of-range values instead of rejecting the whole file.
    pub fn sanitized(mut self) -> Self {
        if self.rounds == 0 {
            warn!("rounds = 0 in config, using {}", default_rounds());
            self.rounds = default_rounds();
        }
        if self.rounds > MAX_ROUNDS {
            warn!("rounds = {} in config, capping at {MAX_ROUNDS}", self.rounds);
            self.rounds = MAX_ROUNDS;
        }
        if self.first_round_label > MAX_FIRST_ROUND_LABEL {
            warn!(
                "first_round_label = {} in config, using {}",
                self.first_round_label,
                default_first_round_label()
            );
            self.first_round_label = default_first_round_label();
        }
        if !self.min_coefficient.is_finite() || !self.max_coefficient.is_finite() {
            self.min_coefficient = default_min_coefficient();
            self.max_coefficient = default_max_coefficient();
        }
        if self.min_coefficient > self.max_coefficient {
            // swap to keep a valid interval
            std::mem::swap(&mut self.min_coefficient, &mut self.max_coefficient);
        }
        self.required_rounds = self.required_rounds.clamp(1, self.rounds);
        if self.max_field_len == 0 {
            self.max_field_len = default_max_field_len();
        }
        if !(0.0..=100.0).contains(&self.confidence_threshold) {
            self.confidence_threshold = default_confidence_threshold();
        }
        if !self.confidence_margin.is_finite() || self.confidence_margin < 0.0 {
            self.confidence_margin = default_confidence_margin();
        }
        if !self.dynamic_threshold.is_finite() || self.dynamic_threshold < 0.0 {
            self.dynamic_threshold = default_dynamic_threshold();
        }
        self
    }

    /// Printed label of the round at `index` (0-based).
    pub fn round_label(&self, index: usize) -> u32 {
        let offset = u32::try_from(index).unwrap_or(u32::MAX);
        self.first_round_label.saturating_add(offset)
    }

    /// Every field on the form in display order (round by round, player 1 first).
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        (0..self.rounds)
            .flat_map(|round| Player::BOTH.into_iter().map(move |player| FieldId::new(round, player)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = CalcConfig::from_toml_str("dynamic_threshold = 0.04\nstrategy = \"last_round_priority\"").unwrap();
        assert_eq!(cfg.rounds, 6);
        assert!((cfg.dynamic_threshold - 0.04).abs() < 1e-12);
        assert_eq!(cfg.strategy, PredictionStrategy::LastRoundPriority);
        assert_eq!(cfg.required_rounds, 1);
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let cfg = CalcConfig::from_toml_str(
            "rounds = 0\nmin_coefficient = 10.0\nmax_coefficient = 1.0\nrequired_rounds = 99\nconfidence_threshold = 140.0",
        )
        .unwrap();
        assert_eq!(cfg.rounds, 6);
        assert_eq!(cfg.min_coefficient, 1.0);
        assert_eq!(cfg.max_coefficient, 10.0);
        assert_eq!(cfg.required_rounds, 6);
        assert_eq!(cfg.confidence_threshold, 75.0);
    }

    #[test]
    fn sanitize_bounds_rounds_and_labels() {
        let cfg = CalcConfig::from_toml_str("rounds = 1000000\nfirst_round_label = 4294967295").unwrap();
        assert_eq!(cfg.rounds, MAX_ROUNDS);
        assert_eq!(cfg.first_round_label, 5);
        assert_eq!(cfg.round_label(MAX_ROUNDS - 1), 5 + MAX_ROUNDS as u32 - 1);

        // unsanitized values saturate instead of overflowing
        let raw = CalcConfig {
            first_round_label: u32::MAX,
            ..CalcConfig::default()
        };
        assert_eq!(raw.round_label(3), u32::MAX);
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        assert!(CalcConfig::from_toml_str("strategy = \"coin_flip\"").is_err());
    }

    #[test]
    fn field_ids_walk_rounds_in_order() {
        let cfg = CalcConfig {
            rounds: 2,
            ..CalcConfig::default()
        };
        let keys: Vec<String> = cfg
            .field_ids()
            .map(|f| f.cache_key(cfg.first_round_label))
            .collect();
        assert_eq!(keys, vec!["g5P1", "g5P2", "g6P1", "g6P2"]);
        assert_eq!(cfg.round_label(1), 6);
    }
}
