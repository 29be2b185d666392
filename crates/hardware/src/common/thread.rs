//! Hardware thread identifiers.

use std::fmt;

/// Identifies one hardware thread context (SMT slot).
///
/// Each thread owns a fully isolated history register and counter table;
/// operations on different threads never interact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ThreadId(pub usize);

impl ThreadId {
    /// Creates a thread identifier from a raw index.
    #[inline(always)]
    pub const fn new(tid: usize) -> Self {
        Self(tid)
    }

    /// Returns the raw index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }
}

impl From<usize> for ThreadId {
    fn from(tid: usize) -> Self {
        Self(tid)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
