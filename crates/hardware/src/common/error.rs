//! Configuration error definitions.
//!
//! Every error in this module is fatal: a predictor built from a rejected
//! configuration never exists. Protocol misuse at runtime (resolving a branch
//! with no live record) is tolerated by the predictor itself and has no error
//! type; double consumption of a record is ruled out by ownership.

use thiserror::Error;

/// Errors raised while validating a predictor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The predictor must model at least one hardware thread.
    #[error("BP: numThreads must be at least 1")]
    NoThreads,

    /// The global history width is outside the supported range.
    #[error("BP: globalHistoryBits = {bits} is outside 1..={max}")]
    HistoryBits {
        /// Requested history width.
        bits: u32,
        /// Largest supported history width.
        max: u32,
    },

    /// The saturating counter width is outside the supported range.
    #[error("BP: ctrBits = {bits} is outside 1..={max}")]
    CounterBits {
        /// Requested counter width.
        bits: u32,
        /// Largest supported counter width.
        max: u32,
    },

    /// The counter table size is zero or not a power of two.
    #[error("BP: predictorSets = {0} is not a power of two")]
    PredictorSets(usize),

    /// The instruction alignment shift would discard the whole address.
    #[error("BP: instShiftAmt = {0} must be below 64")]
    InstShift(u32),

    /// A fault targets an entry beyond the end of the counter table.
    #[error("BP: FaultEntry {entry} exceeds dimension of the saturating counter array ({sets})")]
    FaultEntryOutOfRange {
        /// Targeted counter index.
        entry: usize,
        /// Number of counters per thread.
        sets: usize,
    },

    /// A fault targets a bit beyond the counter width.
    #[error("BP: fault bit position {bit} exceeds counter width of {width} bits")]
    FaultBitOutOfRange {
        /// Targeted bit position.
        bit: u32,
        /// Counter width in bits.
        width: u32,
    },

    /// The stuck-at value must be a single bit.
    #[error("BP: stuck bit value {0} is not 0 or 1")]
    StuckBit(u8),

    /// A fault names a thread the predictor does not model.
    #[error("BP: thread {tid} is outside 0..{threads}")]
    ThreadOutOfRange {
        /// Requested thread.
        tid: usize,
        /// Number of modelled threads.
        threads: usize,
    },

    /// The configuration text could not be parsed.
    #[error("BP: malformed configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
