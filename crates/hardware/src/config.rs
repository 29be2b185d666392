//! Configuration system for the branch predictor.
//!
//! This module defines the configuration structures used to parameterize the
//! predictor. It provides:
//! 1. **Defaults:** Baseline geometry (threads, history width, table size, counter width).
//! 2. **Structures:** Predictor geometry and fault-injection parameters.
//! 3. **Validation:** Fatal checks run once before any predictor state is allocated.
//!
//! Configuration is supplied as JSON by the surrounding simulator, or use
//! `Config::default()` for the reference geometry.

use serde::Deserialize;

use crate::common::{ConfigError, CounterWidth, HistoryWidth};

/// Default configuration constants for the predictor.
///
/// These values match the reference gshare parameter set.
mod defaults {
    /// Number of hardware thread contexts.
    pub const NUM_THREADS: usize = 1;

    /// Width of each thread's global history register in bits.
    pub const GLOBAL_HISTORY_BITS: u32 = 6;

    /// Number of saturating counters per thread (must be a power of two).
    pub const PREDICTOR_SETS: usize = 1024;

    /// Width of each saturating counter in bits.
    pub const CTR_BITS: u32 = 2;

    /// Low PC bits dropped before hashing (log2 of the minimum instruction size).
    pub const INST_SHIFT_AMT: u32 = 2;

    /// Fault end tick marking a permanent fault.
    pub const FAULT_TICK_PERMANENT: i64 = -1;
}

/// Storage field a fault is injected into.
///
/// The fault parameters are shared with the target buffer, so only
/// [`FaultField::Counter`] concerns the direction predictor. Deserializes
/// from either the variant name or its numeric code (`0..=3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "FaultFieldRepr")]
pub enum FaultField {
    /// BTB tag array.
    #[default]
    Tag,
    /// BTB target array.
    Target,
    /// BTB valid bits.
    Valid,
    /// Direction predictor saturating counters.
    Counter,
}

impl TryFrom<u8> for FaultField {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Tag),
            1 => Ok(Self::Target),
            2 => Ok(Self::Valid),
            3 => Ok(Self::Counter),
            _ => Err(format!("unknown fault field code {code} (expected 0..=3)")),
        }
    }
}

/// Wire forms accepted for [`FaultField`].
#[derive(Deserialize)]
#[serde(untagged)]
enum FaultFieldRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<FaultFieldRepr> for FaultField {
    type Error = String;

    fn try_from(repr: FaultFieldRepr) -> Result<Self, Self::Error> {
        match repr {
            FaultFieldRepr::Code(code) => <Self as TryFrom<u8>>::try_from(code),
            FaultFieldRepr::Name(name) => match name.as_str() {
                "Tag" => Ok(Self::Tag),
                "Target" => Ok(Self::Target),
                "Valid" => Ok(Self::Valid),
                "Counter" => Ok(Self::Counter),
                _ => Err(format!("unknown fault field `{name}`")),
            },
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use bpsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.predictor.predictor_sets, 1024);
/// assert!(!config.fault.enabled);
/// ```
///
/// Loading from JSON; omitted fields take their defaults:
///
/// ```
/// use bpsim_core::config::{Config, FaultField};
///
/// let json = r#"{
///     "predictor": { "num_threads": 2, "global_history_bits": 4 },
///     "fault": { "enabled": true, "field": "Counter", "entry": 7, "stuck_bit": 1 }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.predictor.num_threads, 2);
/// assert_eq!(config.predictor.ctr_bits, 2);
/// assert_eq!(config.fault.field, FaultField::Counter);
/// assert!(config.fault.is_permanent_counter_fault());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Config {
    /// Predictor geometry.
    #[serde(default)]
    pub predictor: PredictorConfig,
    /// Fault injection parameters.
    #[serde(default)]
    pub fault: FaultConfig,
}

impl Config {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every constraint the predictor relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint. A fault that will not be applied
    /// at construction (disabled, non-counter, or transient) is not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.predictor;
        if p.num_threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        let _ = HistoryWidth::new(p.global_history_bits)?;
        let ctr = CounterWidth::new(p.ctr_bits)?;
        if !p.predictor_sets.is_power_of_two() {
            return Err(ConfigError::PredictorSets(p.predictor_sets));
        }
        if p.inst_shift_amt >= u64::BITS {
            return Err(ConfigError::InstShift(p.inst_shift_amt));
        }

        if self.fault.is_permanent_counter_fault() {
            self.fault.check(p.predictor_sets, ctr)?;
        }
        Ok(())
    }
}

/// Predictor geometry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictorConfig {
    /// Number of hardware thread contexts.
    #[serde(default = "PredictorConfig::default_num_threads")]
    pub num_threads: usize,

    /// Width of each global history register in bits.
    #[serde(default = "PredictorConfig::default_global_history_bits")]
    pub global_history_bits: u32,

    /// Saturating counters per thread; must be a power of two.
    #[serde(default = "PredictorConfig::default_predictor_sets")]
    pub predictor_sets: usize,

    /// Width of each saturating counter in bits.
    #[serde(default = "PredictorConfig::default_ctr_bits")]
    pub ctr_bits: u32,

    /// Low PC bits dropped before hashing.
    #[serde(default = "PredictorConfig::default_inst_shift_amt")]
    pub inst_shift_amt: u32,
}

impl PredictorConfig {
    fn default_num_threads() -> usize {
        defaults::NUM_THREADS
    }

    fn default_global_history_bits() -> u32 {
        defaults::GLOBAL_HISTORY_BITS
    }

    fn default_predictor_sets() -> usize {
        defaults::PREDICTOR_SETS
    }

    fn default_ctr_bits() -> u32 {
        defaults::CTR_BITS
    }

    fn default_inst_shift_amt() -> u32 {
        defaults::INST_SHIFT_AMT
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            num_threads: defaults::NUM_THREADS,
            global_history_bits: defaults::GLOBAL_HISTORY_BITS,
            predictor_sets: defaults::PREDICTOR_SETS,
            ctr_bits: defaults::CTR_BITS,
            inst_shift_amt: defaults::INST_SHIFT_AMT,
        }
    }
}

/// Fault injection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaultConfig {
    /// Whether the fault is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Free-form label identifying the injected fault in logs.
    #[serde(default)]
    pub label: Option<String>,

    /// Storage field the fault targets.
    #[serde(default)]
    pub field: FaultField,

    /// Counter index the fault targets (same index in every thread).
    #[serde(default)]
    pub entry: usize,

    /// Bit of the counter that is stuck.
    #[serde(default)]
    pub bit_position: u32,

    /// Value the bit is stuck at (0 or 1).
    #[serde(default)]
    pub stuck_bit: u8,

    /// Tick at which the fault becomes active.
    #[serde(default)]
    pub tick_begin: i64,

    /// Tick at which the fault ends; `-1` for a permanent fault.
    #[serde(default = "FaultConfig::default_tick_end")]
    pub tick_end: i64,

    /// Marks this event as the end of a transient fault rather than its start.
    #[serde(default)]
    pub fault_end: bool,
}

impl FaultConfig {
    fn default_tick_end() -> i64 {
        defaults::FAULT_TICK_PERMANENT
    }

    /// Whether this fault is enabled and targets the counter array.
    pub fn targets_counter(&self) -> bool {
        self.enabled && self.field == FaultField::Counter
    }

    /// Whether this fault is applied when the predictor is built.
    ///
    /// Only enabled, permanent faults on the counter array qualify; transient
    /// faults are scheduled by the simulator through
    /// `GSharePredictor::apply_fault`.
    pub fn is_permanent_counter_fault(&self) -> bool {
        self.targets_counter() && self.tick_end == defaults::FAULT_TICK_PERMANENT
    }

    /// Whether the fault window covers `tick`.
    ///
    /// The window is `tick_begin..tick_end`, open-ended when `tick_end` is `-1`.
    pub fn is_active_at(&self, tick: i64) -> bool {
        tick >= self.tick_begin
            && (self.tick_end == defaults::FAULT_TICK_PERMANENT || tick < self.tick_end)
    }

    /// Checks the fault against the table geometry.
    pub(crate) fn check(&self, sets: usize, width: CounterWidth) -> Result<(), ConfigError> {
        check_fault_site(self.entry, self.bit_position, self.stuck_bit, sets, width)
    }
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            label: None,
            field: FaultField::default(),
            entry: 0,
            bit_position: 0,
            stuck_bit: 0,
            tick_begin: 0,
            tick_end: defaults::FAULT_TICK_PERMANENT,
            fault_end: false,
        }
    }
}

/// Validates a stuck-at fault site against the table geometry.
pub(crate) fn check_fault_site(
    entry: usize,
    bit: u32,
    stuck: u8,
    sets: usize,
    width: CounterWidth,
) -> Result<(), ConfigError> {
    if entry >= sets {
        return Err(ConfigError::FaultEntryOutOfRange { entry, sets });
    }
    if bit >= width.bits() {
        return Err(ConfigError::FaultBitOutOfRange {
            bit,
            width: width.bits(),
        });
    }
    if stuck > 1 {
        return Err(ConfigError::StuckBit(stuck));
    }
    Ok(())
}
