//! Predictor statistics collection and reporting.
//!
//! This module tracks protocol events for the direction predictor. It provides:
//! 1. **Predictions:** Conditional lookups and unconditional branches.
//! 2. **Resolution:** Updates, squashed (corrective) updates, and mispredictions.
//! 3. **Recovery:** Squashes, records retired without resolution, and BTB-miss notifications.

use std::fmt;

/// Predictor statistics, summed over all threads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredictorStats {
    /// Conditional branch predictions made.
    pub lookups: u64,
    /// Unconditional branch predictions made.
    pub uncond_branches: u64,
    /// Counter updates performed (squashed and final).
    pub updates: u64,
    /// Final updates whose outcome differed from the recorded prediction.
    pub incorrect: u64,
    /// Updates that also repaired history after a misprediction.
    pub squashed_updates: u64,
    /// Records consumed by a squash.
    pub squashes: u64,
    /// Records released without resolution.
    pub retired_squashed: u64,
    /// Taken branches that missed in the target buffer.
    pub btb_updates: u64,
}

impl PredictorStats {
    /// Final (non-squashed) updates.
    pub const fn resolved(&self) -> u64 {
        self.updates - self.squashed_updates
    }

    /// Fraction of resolved branches that were predicted correctly.
    ///
    /// Returns `1.0` before any branch has resolved.
    pub fn accuracy(&self) -> f64 {
        let resolved = self.resolved();
        if resolved == 0 {
            return 1.0;
        }
        (resolved - self.incorrect) as f64 / resolved as f64
    }
}

impl fmt::Display for PredictorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BRANCH PREDICTION")?;
        writeln!(f, "  bp.lookups              {}", self.lookups)?;
        writeln!(f, "  bp.uncond_branches      {}", self.uncond_branches)?;
        writeln!(f, "  bp.updates              {}", self.updates)?;
        writeln!(f, "  bp.squashed_updates     {}", self.squashed_updates)?;
        writeln!(f, "  bp.incorrect            {}", self.incorrect)?;
        writeln!(f, "  bp.squashes             {}", self.squashes)?;
        writeln!(f, "  bp.retired_squashed     {}", self.retired_squashed)?;
        writeln!(f, "  bp.btb_updates          {}", self.btb_updates)?;
        write!(f, "  bp.accuracy             {:.2}%", self.accuracy() * 100.0)
    }
}
