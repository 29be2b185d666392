//! Branch Predictor Interface.
//!
//! This module defines the `DirectionPredictor` trait that direction
//! predictors expose to the fetch and squash logic of the pipeline. Every
//! prediction returns a record that the caller owns until it hands the
//! record to exactly one consuming operation.

use crate::common::ThreadId;

/// Trait for speculative branch-direction predictors.
///
/// Predictions advance per-thread state speculatively; the record returned by
/// each prediction carries what is needed to train the predictor later or to
/// undo the speculation.
pub trait DirectionPredictor {
    /// Per-prediction state handed to the caller.
    type Record;

    /// Predicts an unconditional branch.
    ///
    /// The branch is always taken, so the counter tables are not consulted;
    /// only the speculative history is advanced.
    ///
    /// # Arguments
    ///
    /// * `tid` - Hardware thread issuing the branch
    /// * `pc` - Program counter of the branch instruction
    fn uncond_branch(&mut self, tid: ThreadId, pc: u64) -> Self::Record;

    /// Predicts a conditional branch.
    ///
    /// # Arguments
    ///
    /// * `tid` - Hardware thread issuing the branch
    /// * `pc` - Program counter of the branch instruction
    ///
    /// # Returns
    ///
    /// A tuple `(taken, record)` with the predicted direction and the record
    /// to pass back on resolution or squash.
    fn lookup(&mut self, tid: ThreadId, pc: u64) -> (bool, Self::Record);

    /// Notifies the predictor that a taken branch missed in the target buffer.
    ///
    /// # Arguments
    ///
    /// * `tid` - Hardware thread issuing the branch
    /// * `pc` - Program counter of the branch instruction
    /// * `record` - Record of the branch, left untouched
    fn btb_update(&mut self, tid: ThreadId, pc: u64, record: &Self::Record);

    /// Trains the predictor with a resolved outcome.
    ///
    /// A `None` record is ignored. When `squashed` is set the history is
    /// repaired from the record and the record is handed back, since the
    /// caller will resolve the branch again later; otherwise the record is
    /// consumed.
    ///
    /// # Arguments
    ///
    /// * `tid` - Hardware thread issuing the branch
    /// * `pc` - Program counter of the branch instruction
    /// * `taken` - Whether the branch was actually taken
    /// * `record` - Record returned when the branch was predicted
    /// * `squashed` - Whether this resolution corrects a misprediction
    fn update(
        &mut self,
        tid: ThreadId,
        pc: u64,
        taken: bool,
        record: Option<Self::Record>,
        squashed: bool,
    ) -> Option<Self::Record>;

    /// Unwinds all speculation made at and after the recorded prediction.
    fn squash(&mut self, tid: ThreadId, record: Self::Record);

    /// Releases the record of a branch that will never be resolved.
    fn retire_squashed(&mut self, tid: ThreadId, record: Self::Record);

    /// Global history captured in a record.
    fn get_ghr(&self, tid: ThreadId, record: &Self::Record) -> u32;
}
