//! Core prediction units.
//!
//! This module groups the functional units a pipeline front end consults when
//! fetching past unresolved control flow.

/// Execution units (branch direction prediction).
pub mod units;
