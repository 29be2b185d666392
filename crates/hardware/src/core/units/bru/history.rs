//! Global History Registers.
//!
//! One register per hardware thread. Each register records the most recent
//! branch outcomes (1 = taken), newest in bit 0, and is masked to the
//! configured width after every write so it never holds stray upper bits.

use crate::common::{HistoryWidth, ThreadId};

/// Per-thread global history registers.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    regs: Vec<u32>,
    width: HistoryWidth,
}

impl HistoryStore {
    /// Creates `num_threads` cleared registers of the given width.
    pub fn new(num_threads: usize, width: HistoryWidth) -> Self {
        Self {
            regs: vec![0; num_threads],
            width,
        }
    }

    /// Register width.
    #[inline(always)]
    pub const fn width(&self) -> HistoryWidth {
        self.width
    }

    /// Number of thread registers.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns `true` if no threads are modelled.
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Current value of a thread's register.
    #[inline(always)]
    pub fn get(&self, tid: ThreadId) -> u32 {
        self.regs[tid.val()]
    }

    /// Shifts an outcome into a thread's register.
    #[inline(always)]
    pub fn push(&mut self, tid: ThreadId, taken: bool) {
        let reg = &mut self.regs[tid.val()];
        *reg = self.width.shift_in(*reg, taken);
    }

    /// Overwrites a thread's register, masking to the configured width.
    #[inline(always)]
    pub fn restore(&mut self, tid: ThreadId, value: u32) {
        self.regs[tid.val()] = value & self.width.mask();
    }

    /// Rebuilds a thread's register as `snapshot` followed by one resolved outcome.
    #[inline(always)]
    pub fn repair(&mut self, tid: ThreadId, snapshot: u32, taken: bool) {
        self.regs[tid.val()] = self.width.shift_in(snapshot, taken);
    }

    /// Clears bit 0 of a thread's register.
    #[inline(always)]
    pub fn clear_newest(&mut self, tid: ThreadId) {
        self.regs[tid.val()] &= self.width.mask() & !1;
    }
}
