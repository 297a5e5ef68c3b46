//! Form session: raw field values, the visible phase, and the field cache.
//!
//! Phases follow an explicit state machine:
//!
//! ```text
//! Editing ──(computable)──────────────▶ ReviewingResults
//!    ▲  ◀──(not computable)──────────────────┘  │
//!    │                                    finalize / last field filled
//!    └──────────── clear ◀──── ShowingPrediction ◀┘
//! ```
//!
//! The guards reuse the validator: "computable" means `compute` returned `Ok`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{FieldCache, MemoryCache};
use crate::coefficient::{FieldId, InputError, RoundInput};
use crate::config::CalcConfig;
use crate::engine::{compute, ComputationResult};
use crate::input::{apply_key, sanitize, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Editing,
    ReviewingResults,
    ShowingPrediction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    FieldChanged,
    Finalize,
    Clear,
}

/// What the guards need to know about the current form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStatus {
    pub computable: bool,
    pub all_filled: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("results are not ready: {0}")]
    NotReady(InputError),
    #[error("round {round} is out of range (form has {rounds} rounds)")]
    RoundOutOfRange { round: usize, rounds: usize },
}

/// Pure transition function.
pub fn next_phase(current: Phase, event: FormEvent, status: FormStatus) -> Option<Phase> {
    match event {
        FormEvent::Clear => Some(Phase::Editing),
        FormEvent::FieldChanged => Some(match (status.computable, status.all_filled) {
            (false, _) => Phase::Editing,
            (true, true) => Phase::ShowingPrediction,
            (true, false) => Phase::ReviewingResults,
        }),
        FormEvent::Finalize => {
            if current == Phase::ShowingPrediction || status.computable {
                Some(Phase::ShowingPrediction)
            } else {
                None
            }
        }
    }
}

/// One form being filled in. Owns the raw values exclusively.
#[derive(Debug)]
pub struct FormSession<C: FieldCache = MemoryCache> {
    config: CalcConfig,
    rounds: Vec<RoundInput>,
    phase: Phase,
    cache: C,
    outcome: Result<ComputationResult, InputError>,
}

impl FormSession<MemoryCache> {
    pub fn in_memory(config: CalcConfig) -> Self {
        Self::new(config, MemoryCache::new())
    }
}

impl<C: FieldCache> FormSession<C> {
    /// Empty form in `Editing`; the cache is not read.
    pub fn new(config: CalcConfig, cache: C) -> Self {
        let rounds = vec![RoundInput::default(); config.rounds];
        let outcome = compute(&rounds, &config);
        Self {
            config,
            rounds,
            phase: Phase::Editing,
            cache,
            outcome,
        }
    }

    /// Form pre-filled from the cache, with the phase recomputed.
    pub fn restore(config: CalcConfig, cache: C) -> Self {
        let mut session = Self::new(config, cache);
        let fields: Vec<FieldId> = session.config.field_ids().collect();
        for field in fields {
            let key = field.cache_key(session.config.first_round_label);
            if let Some(value) = session.cache.get(&key) {
                session.rounds[field.round].set(field.player, Some(value));
            }
        }
        session.refresh(FormEvent::FieldChanged);
        debug!(phase = ?session.phase, "form restored from cache");
        session
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rounds(&self) -> &[RoundInput] {
        &self.rounds
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Latest computation; recomputed after every event.
    pub fn outcome(&self) -> &Result<ComputationResult, InputError> {
        &self.outcome
    }

    pub fn raw(&self, field: FieldId) -> &str {
        self.rounds
            .get(field.round)
            .and_then(|r| r.get(field.player))
            .unwrap_or("")
    }

    fn status(&self) -> FormStatus {
        match &self.outcome {
            Ok(r) => FormStatus {
                computable: true,
                all_filled: r.validation.all_filled,
            },
            Err(_) => FormStatus {
                computable: false,
                all_filled: false,
            },
        }
    }

    fn refresh(&mut self, event: FormEvent) {
        self.outcome = compute(&self.rounds, &self.config);
        if let Some(next) = next_phase(self.phase, event, self.status()) {
            if next != self.phase {
                debug!(from = ?self.phase, to = ?next, ?event, "phase change");
            }
            self.phase = next;
        }
    }

    /// Store raw text as typed (no sanitizing) and recompute.
    pub fn set_field(&mut self, field: FieldId, raw: &str) -> Result<Phase, SessionError> {
        let rounds = self.rounds.len();
        let slot = self
            .rounds
            .get_mut(field.round)
            .ok_or(SessionError::RoundOutOfRange {
                round: field.round,
                rounds,
            })?;
        let value = if raw.is_empty() { None } else { Some(raw.to_string()) };
        slot.set(field.player, value);

        let key = field.cache_key(self.config.first_round_label);
        if let Err(e) = self.cache.set(&key, raw) {
            warn!("field cache write failed for {key}: {e:#}");
        }

        self.refresh(FormEvent::FieldChanged);
        Ok(self.phase)
    }

    /// Input-source path: sanitize pasted text first.
    pub fn paste(&mut self, field: FieldId, raw: &str) -> Result<Phase, SessionError> {
        let clean = sanitize(raw, self.config.max_field_len);
        self.set_field(field, &clean)
    }

    /// One on-screen keypad press on `field`.
    pub fn press_key(&mut self, field: FieldId, key: Key) -> Result<Phase, SessionError> {
        let next = apply_key(self.raw(field), key, self.config.max_field_len);
        self.set_field(field, &next)
    }

    /// Explicit "show me the prediction".
    pub fn finalize(&mut self) -> Result<Phase, SessionError> {
        match next_phase(self.phase, FormEvent::Finalize, self.status()) {
            Some(next) => {
                self.phase = next;
                Ok(next)
            }
            None => match &self.outcome {
                Err(e) => Err(SessionError::NotReady(e.clone())),
                Ok(_) => Ok(self.phase),
            },
        }
    }

    /// Discard every value, drop the cached fields, back to `Editing`.
    pub fn clear(&mut self) -> Phase {
        let fields: Vec<FieldId> = self.config.field_ids().collect();
        for field in fields {
            let key = field.cache_key(self.config.first_round_label);
            if let Err(e) = self.cache.remove(&key) {
                warn!("field cache remove failed for {key}: {e:#}");
            }
        }
        self.rounds = vec![RoundInput::default(); self.config.rounds];
        self.refresh(FormEvent::Clear);
        self.phase
    }
}
