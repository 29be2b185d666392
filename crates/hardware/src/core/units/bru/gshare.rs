//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! History is advanced speculatively at prediction time so that younger
//! branches fetched behind an unresolved one see the predicted path. Every
//! prediction returns a [`PredictionRecord`] holding the history it was made
//! with; resolution trains the counter that prediction used, and a squash
//! rewinds the history to the snapshot.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `lookup()`: O(1)
//!   - `update()`: O(1) (plus O(log f) with `f` faulted entries)
//! - **Space Complexity:** O(T * S) for `T` threads and `S` counters per thread
//! - **Hardware Cost:** Moderate - single PHT lookup, XOR fold, and counter update

use tracing::{debug, trace, warn};

use super::{
    DirectionPredictor,
    counter::CounterTable,
    history::HistoryStore,
    record::PredictionRecord,
};
use crate::common::{ConfigError, CounterWidth, HistoryWidth, ThreadId};
use crate::config::{Config, FaultConfig};
use crate::stats::PredictorStats;

/// Width of a branch address in bytes; bounds how many times history is
/// folded into the hashed address.
const ADDR_BYTES: u32 = std::mem::size_of::<u64>() as u32;

/// GShare Predictor structure.
#[derive(Clone, Debug)]
pub struct GSharePredictor {
    /// Global History Registers, one per thread.
    history: HistoryStore,
    /// Pattern History Tables, one per thread.
    tables: Vec<CounterTable>,
    /// `predictor_sets - 1`.
    index_mask: u64,
    /// Low PC bits dropped before hashing.
    inst_shift_amt: u32,
    /// Event counters.
    stats: PredictorStats,
}

impl GSharePredictor {
    /// Creates a new GShare Predictor.
    ///
    /// All counters start at zero (weakly not-taken) and all history
    /// registers start cleared. A permanent counter fault in `config` is
    /// applied to the same entry of every thread's table.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid or the fault
    /// targets a counter or bit outside the table.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let p = &config.predictor;
        let history_width = HistoryWidth::new(p.global_history_bits)?;
        let ctr_width = CounterWidth::new(p.ctr_bits)?;

        let mut tables = vec![CounterTable::new(p.predictor_sets, ctr_width); p.num_threads];

        debug!(
            threads = p.num_threads,
            history_bits = history_width.bits(),
            sets = p.predictor_sets,
            ctr_bits = ctr_width.bits(),
            "gshare predictor configured"
        );

        let fault = &config.fault;
        if fault.is_permanent_counter_fault() {
            for table in &mut tables {
                table.set_faulted(fault.entry, fault.bit_position, fault.stuck_bit)?;
            }
            debug!(
                label = fault.label.as_deref().unwrap_or("-"),
                entry = fault.entry,
                bit = fault.bit_position,
                stuck = fault.stuck_bit,
                "permanent counter fault injected"
            );
        } else if fault.enabled {
            warn!(
                label = fault.label.as_deref().unwrap_or("-"),
                field = ?fault.field,
                tick_end = fault.tick_end,
                "fault not applied at construction: not a permanent counter fault"
            );
        }

        Ok(Self {
            history: HistoryStore::new(p.num_threads, history_width),
            tables,
            index_mask: (p.predictor_sets as u64) - 1,
            inst_shift_amt: p.inst_shift_amt,
            stats: PredictorStats::default(),
        })
    }

    /// Calculates the index into the Pattern History Table.
    ///
    /// Drops the alignment bits of the PC, then XORs the history into the
    /// address once per history-width window of the address byte count, and
    /// finally masks to the table size. Widths that do not divide evenly
    /// leave the top window partially folded.
    #[inline(always)]
    pub fn compute_index(&self, pc: u64, history: u32) -> usize {
        let width = self.history.width();
        let hist = (history & width.mask()) as u64;
        let mut index = pc >> self.inst_shift_amt;

        for i in 0..ADDR_BYTES / width.bits() {
            index ^= hist << (i * width.bits());
        }

        (index & self.index_mask) as usize
    }

    /// Number of modelled hardware threads.
    pub fn num_threads(&self) -> usize {
        self.tables.len()
    }

    /// Counters per thread.
    pub fn predictor_sets(&self) -> usize {
        (self.index_mask + 1) as usize
    }

    /// Live global history of a thread.
    pub fn history(&self, tid: ThreadId) -> u32 {
        self.history.get(tid)
    }

    /// Stored counter value at `index` for a thread.
    pub fn counter_value(&self, tid: ThreadId, index: usize) -> Option<u8> {
        let table = self.tables.get(tid.val())?;
        (index < table.len()).then(|| table.read(index))
    }

    /// Marks one counter bit of a thread as stuck at `stuck_bit`.
    ///
    /// Used by the simulator to start a transient fault.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the thread, entry, bit, or value is out of range.
    pub fn inject_fault(
        &mut self,
        tid: ThreadId,
        entry: usize,
        bit_position: u32,
        stuck_bit: u8,
    ) -> Result<(), ConfigError> {
        let threads = self.tables.len();
        let table = self
            .tables
            .get_mut(tid.val())
            .ok_or(ConfigError::ThreadOutOfRange {
                tid: tid.val(),
                threads,
            })?;
        table.set_faulted(entry, bit_position, stuck_bit)?;
        debug!(%tid, entry, bit = bit_position, stuck = stuck_bit, "counter fault injected");
        Ok(())
    }

    /// Removes a fault from one counter of a thread.
    ///
    /// The counter keeps its stored value. Returns whether a fault was present.
    pub fn clear_fault(&mut self, tid: ThreadId, entry: usize) -> bool {
        let cleared = self
            .tables
            .get_mut(tid.val())
            .is_some_and(|t| t.clear_fault(entry));
        if cleared {
            debug!(%tid, entry, "counter fault cleared");
        }
        cleared
    }

    /// Applies a scheduled fault event to the same entry of every thread.
    ///
    /// A start event marks the bit stuck; an event with `fault_end` set ends
    /// the fault as [`Self::end_fault`] does. Returns `Ok(false)` without
    /// touching state when the fault is disabled or targets another structure.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the entry, bit, or value is out of range.
    /// No thread is modified in that case.
    pub fn apply_fault(&mut self, fault: &FaultConfig) -> Result<bool, ConfigError> {
        if !fault.targets_counter() {
            return Ok(false);
        }
        if fault.fault_end {
            return Ok(self.end_fault(fault));
        }
        // Every table shares one geometry, so the first rejects before any is modified.
        for table in &mut self.tables {
            table.set_faulted(fault.entry, fault.bit_position, fault.stuck_bit)?;
        }
        debug!(
            label = fault.label.as_deref().unwrap_or("-"),
            entry = fault.entry,
            bit = fault.bit_position,
            stuck = fault.stuck_bit,
            tick_begin = fault.tick_begin,
            tick_end = fault.tick_end,
            "counter fault started"
        );
        Ok(true)
    }

    /// Ends a fault on the same entry of every thread.
    ///
    /// Returns whether any thread had a fault on that entry.
    pub fn end_fault(&mut self, fault: &FaultConfig) -> bool {
        if !fault.targets_counter() {
            return false;
        }
        let mut cleared = false;
        for table in &mut self.tables {
            cleared |= table.clear_fault(fault.entry);
        }
        if cleared {
            debug!(
                label = fault.label.as_deref().unwrap_or("-"),
                entry = fault.entry,
                "counter fault ended"
            );
        }
        cleared
    }

    /// Event counters accumulated since construction or the last reset.
    pub const fn stats(&self) -> &PredictorStats {
        &self.stats
    }

    /// Zeroes the event counters.
    pub fn reset_stats(&mut self) {
        self.stats = PredictorStats::default();
    }
}

impl DirectionPredictor for GSharePredictor {
    type Record = PredictionRecord;

    /// Records the current history and shifts in a taken bit.
    fn uncond_branch(&mut self, tid: ThreadId, pc: u64) -> PredictionRecord {
        let record = PredictionRecord::new(tid, self.history.get(tid), true);
        self.history.push(tid, true);
        self.stats.uncond_branches += 1;

        trace!(%tid, pc = %format_args!("{pc:#x}"), ghr = record.history(), "uncond");
        record
    }

    /// Returns the direction bit of the hashed counter and speculatively
    /// shifts the prediction into the history.
    fn lookup(&mut self, tid: ThreadId, pc: u64) -> (bool, PredictionRecord) {
        let ghr = self.history.get(tid);
        let index = self.compute_index(pc, ghr);
        let taken = self.tables[tid.val()].predict(index);

        self.history.push(tid, taken);
        self.stats.lookups += 1;

        trace!(%tid, pc = %format_args!("{pc:#x}"), ghr, index, taken, "lookup");
        (taken, PredictionRecord::new(tid, ghr, taken))
    }

    /// Clears the newest history bit.
    fn btb_update(&mut self, tid: ThreadId, pc: u64, _record: &PredictionRecord) {
        self.history.clear_newest(tid);
        self.stats.btb_updates += 1;

        trace!(%tid, pc = %format_args!("{pc:#x}"), ghr = self.history.get(tid), "btb update");
    }

    /// Trains the counter selected by the recorded history; on a squashed
    /// resolution also rebuilds the live history from the record.
    fn update(
        &mut self,
        tid: ThreadId,
        pc: u64,
        taken: bool,
        record: Option<PredictionRecord>,
        squashed: bool,
    ) -> Option<PredictionRecord> {
        let record = record?;
        debug_assert_eq!(record.thread(), tid, "record resolved on the wrong thread");

        let index = self.compute_index(pc, record.history());
        self.tables[tid.val()].train(index, taken);
        self.stats.updates += 1;

        trace!(
            %tid,
            pc = %format_args!("{pc:#x}"),
            ghr = record.history(),
            index,
            taken,
            squashed,
            "update"
        );

        if squashed {
            self.history.repair(tid, record.history(), taken);
            self.stats.squashed_updates += 1;
            Some(record)
        } else {
            if record.predicted_taken() != taken {
                self.stats.incorrect += 1;
            }
            None
        }
    }

    /// Restores the history captured in the record.
    fn squash(&mut self, tid: ThreadId, record: PredictionRecord) {
        debug_assert_eq!(record.thread(), tid, "record squashed on the wrong thread");
        self.history.restore(tid, record.history());
        self.stats.squashes += 1;

        trace!(%tid, ghr = record.history(), "squash");
    }

    fn retire_squashed(&mut self, tid: ThreadId, record: PredictionRecord) {
        debug_assert_eq!(record.thread(), tid, "record retired on the wrong thread");
        self.stats.retired_squashed += 1;
    }

    fn get_ghr(&self, _tid: ThreadId, record: &PredictionRecord) -> u32 {
        record.history()
    }
}
