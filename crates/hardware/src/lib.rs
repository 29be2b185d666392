//! Speculative branch-direction predictor library.
//!
//! This crate implements a gshare direction predictor for use inside an
//! instruction-pipeline simulator, with the following:
//! 1. **Prediction:** Per-thread global history hashed with the PC into a table of saturating counters.
//! 2. **Speculation:** History advanced at prediction time and rewound exactly on squash.
//! 3. **Records:** Move-only per-prediction snapshots that are consumed exactly once.
//! 4. **Fault Injection:** Stuck-at faults on individual counter bits, permanent or transient.
//! 5. **Configuration:** JSON-deserializable geometry and fault parameters, plus statistics.

/// Common types (configuration errors, bounded widths, thread ids).
pub mod common;
/// Predictor configuration (defaults, fault parameters, validation).
pub mod config;
/// Prediction units.
pub mod core;
/// Predictor statistics collection and reporting.
pub mod stats;

/// Thread identifier and configuration error types.
pub use crate::common::{ConfigError, ThreadId};
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The gshare predictor and its record type.
pub use crate::core::units::bru::{DirectionPredictor, GSharePredictor, PredictionRecord};
/// Predictor event counters.
pub use crate::stats::PredictorStats;
