//! Execution units and functional components.
//!
//! This module contains the branch prediction unit. Target prediction (BTB,
//! return address stack) is owned by the surrounding simulator.

/// Branch Resolution Unit: direction prediction state and protocol.
pub mod bru;
