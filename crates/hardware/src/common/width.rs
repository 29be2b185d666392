//! Validated bit widths.
//!
//! History registers and saturating counters are both fixed-width bit
//! fields. The widths are checked once when the predictor is built, and the
//! masks derived from them are cached here so no call site re-derives them.

use super::error::ConfigError;

/// Width of a global history register, in bits (1..=32).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryWidth {
    bits: u32,
    mask: u32,
}

impl HistoryWidth {
    /// Widest supported history register.
    pub const MAX_BITS: u32 = u32::BITS;

    /// Validates `bits` and derives the history mask.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HistoryBits`] when `bits` is zero or wider
    /// than [`Self::MAX_BITS`].
    pub fn new(bits: u32) -> Result<Self, ConfigError> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(ConfigError::HistoryBits {
                bits,
                max: Self::MAX_BITS,
            });
        }
        let mask = ((1u64 << bits) - 1) as u32;
        Ok(Self { bits, mask })
    }

    /// Number of history bits.
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// `2^bits - 1`.
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        self.mask
    }

    /// Shifts `outcome` into `history` and drops bits beyond the width.
    #[inline(always)]
    pub const fn shift_in(self, history: u32, outcome: bool) -> u32 {
        ((history << 1) | outcome as u32) & self.mask
    }
}

/// Width of a saturating counter, in bits (1..=8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterWidth {
    bits: u32,
    max: u8,
}

impl CounterWidth {
    /// Widest supported counter; values are stored in a byte.
    pub const MAX_BITS: u32 = u8::BITS;

    /// Validates `bits` and derives the saturation ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CounterBits`] when `bits` is zero or wider
    /// than [`Self::MAX_BITS`].
    pub fn new(bits: u32) -> Result<Self, ConfigError> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(ConfigError::CounterBits {
                bits,
                max: Self::MAX_BITS,
            });
        }
        let max = ((1u16 << bits) - 1) as u8;
        Ok(Self { bits, max })
    }

    /// Number of counter bits.
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Saturation ceiling, `2^bits - 1`.
    #[inline(always)]
    pub const fn max(self) -> u8 {
        self.max
    }

    /// Bit position of the direction bit (the most significant bit).
    #[inline(always)]
    pub const fn msb(self) -> u32 {
        self.bits - 1
    }
}
