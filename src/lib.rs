// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod cache;
pub mod coefficient;
pub mod config;
pub mod decision;
pub mod engine;
pub mod explain;
pub mod form;
pub mod input;
pub mod metrics;
pub mod prediction;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::cache::{FieldCache, JsonFileCache, MemoryCache};
pub use crate::coefficient::{
    validate, FieldId, FieldState, InputError, InputErrorKind, RoundInput, Validation,
};
pub use crate::config::CalcConfig;
pub use crate::decision::{MetricVerdict, PerPlayer, Player, Verdict};
pub use crate::engine::{compute, evaluate, ComputationResult};
pub use crate::input::{apply_key, sanitize, Key};
pub use crate::prediction::{Advantage, PredictedWinner, Prediction, PredictionStrategy};
pub use crate::session::{FormSession, Phase, SessionError};
