//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the speculative gshare direction predictor and the
//! state it is built from: per-thread history registers, saturating counter
//! tables with stuck-at fault injection, and per-prediction records.

pub use self::branch_predictor::DirectionPredictor;
pub use self::counter::{CounterTable, SatCounter, StuckBit};
pub use self::gshare::GSharePredictor;
pub use self::history::HistoryStore;
pub use self::record::PredictionRecord;

/// Direction predictor trait.
pub mod branch_predictor;

/// Saturating counters and per-thread counter tables.
pub mod counter;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Per-thread global history registers.
pub mod history;

/// Per-prediction history records.
pub mod record;
