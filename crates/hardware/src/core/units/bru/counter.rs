//! Saturating Counter Tables.
//!
//! Each thread owns a table of `n`-bit saturating counters. The most
//! significant bit of a counter is its predicted direction.
//!
//! Stuck-at faults live in a sparse side table keyed by entry index and are
//! consulted on every write: the stuck value is forced into storage when the
//! fault is set, and again after each saturating step, so writes to the
//! faulted bit are lost. Reads return storage as is. Clearing a fault stops
//! the forcing but leaves the stored value untouched.

use std::collections::BTreeMap;

use crate::common::{ConfigError, CounterWidth};
use crate::config::check_fault_site;

/// A single bit forced to a fixed value.
///
/// Only built through [`CounterTable::set_faulted`], which checks the bit
/// against the counter width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StuckBit {
    bit: u32,
    value: u8,
}

impl StuckBit {
    const fn new(bit: u32, value: u8) -> Self {
        Self { bit, value }
    }

    /// Bit position within the counter.
    pub const fn bit(self) -> u32 {
        self.bit
    }

    /// Forced value (0 or 1).
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Forces the stuck bit of a counter value.
    #[inline(always)]
    pub const fn apply(self, ctr: u8) -> u8 {
        (ctr & !(1 << self.bit)) | ((self.value & 1) << self.bit)
    }
}

/// An `n`-bit saturating counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SatCounter(u8);

impl SatCounter {
    /// Raw counter value.
    #[inline(always)]
    pub const fn val(self) -> u8 {
        self.0
    }

    /// Counts up, stopping at `width.max()`.
    #[inline(always)]
    pub fn increment(&mut self, width: CounterWidth) {
        if self.0 < width.max() {
            self.0 += 1;
        }
    }

    /// Counts down, stopping at zero.
    #[inline(always)]
    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

/// One thread's counter array plus its fault side table.
#[derive(Clone, Debug)]
pub struct CounterTable {
    counters: Vec<SatCounter>,
    width: CounterWidth,
    faults: BTreeMap<usize, StuckBit>,
}

impl CounterTable {
    /// Creates `sets` counters, all zero (weakly not-taken).
    pub fn new(sets: usize, width: CounterWidth) -> Self {
        Self {
            counters: vec![SatCounter::default(); sets],
            width,
            faults: BTreeMap::new(),
        }
    }

    /// Number of counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns `true` if the table has no counters.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Counter width.
    pub const fn width(&self) -> CounterWidth {
        self.width
    }

    /// Stored value of the counter at `index`.
    #[inline(always)]
    pub fn read(&self, index: usize) -> u8 {
        self.counters[index].val()
    }

    /// Direction bit of the counter at `index`.
    #[inline(always)]
    pub fn predict(&self, index: usize) -> bool {
        (self.read(index) >> self.width.msb()) & 1 == 1
    }

    /// Trains the counter at `index` towards `taken`.
    #[inline(always)]
    ///
    /// The step is taken from the stored value; a stuck bit is forced back
    /// before the result is written.
    #[inline(always)]
    pub fn train(&mut self, index: usize, taken: bool) {
        let width = self.width;
        let fault = self.fault(index);
        let ctr = &mut self.counters[index];
        if taken {
            ctr.increment(width);
        } else {
            ctr.decrement();
        }
        if let Some(fault) = fault {
            *ctr = SatCounter(fault.apply(ctr.val()));
        }
    }

    /// Marks bit `bit` of the counter at `index` as stuck at `value`.
    ///
    /// The stuck value is written into the counter immediately. Replaces any
    /// fault already present on that entry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the entry, bit, or value is out of range.
    pub fn set_faulted(&mut self, index: usize, bit: u32, value: u8) -> Result<(), ConfigError> {
        check_fault_site(index, bit, value, self.counters.len(), self.width)?;
        let fault = StuckBit::new(bit, value);
        let ctr = &mut self.counters[index];
        *ctr = SatCounter(fault.apply(ctr.val()));
        let _ = self.faults.insert(index, fault);
        Ok(())
    }

    /// Removes the fault on `index`, returning whether one was present.
    ///
    /// The counter keeps the value it holds, including the stuck bit.
    pub fn clear_fault(&mut self, index: usize) -> bool {
        self.faults.remove(&index).is_some()
    }

    /// Fault currently applied to `index`, if any.
    #[inline(always)]
    pub fn fault(&self, index: usize) -> Option<StuckBit> {
        if self.faults.is_empty() {
            return None;
        }
        self.faults.get(&index).copied()
    }
}
