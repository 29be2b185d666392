//! Per-prediction history records.
//!
//! A [`PredictionRecord`] is created by every prediction and handed to the
//! caller, who later gives it back to exactly one consuming operation. The
//! record is neither `Clone` nor `Copy`, so consuming it twice does not
//! compile:
//!
//! ```compile_fail
//! use bpsim_core::{Config, GSharePredictor, ThreadId};
//! use bpsim_core::core::units::bru::DirectionPredictor;
//!
//! let mut bp = GSharePredictor::new(&Config::default()).unwrap();
//! let tid = ThreadId(0);
//! let (_, record) = bp.lookup(tid, 0x100);
//! let _ = bp.update(tid, 0x100, true, Some(record), false);
//! bp.squash(tid, record);
//! ```

use crate::common::ThreadId;

/// Snapshot of predictor state taken when a branch was predicted.
#[derive(Debug, PartialEq, Eq)]
pub struct PredictionRecord {
    tid: ThreadId,
    history: u32,
    predicted_taken: bool,
}

impl PredictionRecord {
    pub(crate) const fn new(tid: ThreadId, history: u32, predicted_taken: bool) -> Self {
        Self {
            tid,
            history,
            predicted_taken,
        }
    }

    /// Thread the prediction was made for.
    #[inline(always)]
    pub const fn thread(&self) -> ThreadId {
        self.tid
    }

    /// Global history at prediction time, before the speculative advance.
    #[inline(always)]
    pub const fn history(&self) -> u32 {
        self.history
    }

    /// Predicted direction.
    #[inline(always)]
    pub const fn predicted_taken(&self) -> bool {
        self.predicted_taken
    }
}
