//! # Saturating Counter Tests
//!
//! Saturation bounds, direction bit extraction, and table bookkeeping.

use bpsim_core::ConfigError;
use bpsim_core::common::CounterWidth;
use bpsim_core::core::units::bru::{CounterTable, SatCounter};
use rstest::rstest;

fn width(bits: u32) -> CounterWidth {
    CounterWidth::new(bits).unwrap()
}

#[test]
fn counter_starts_at_zero() {
    assert_eq!(SatCounter::default().val(), 0);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(8)]
fn counter_saturates_at_max(#[case] bits: u32) {
    let w = width(bits);
    let mut ctr = SatCounter::default();
    for _ in 0..300 {
        ctr.increment(w);
    }
    assert_eq!(ctr.val(), w.max());
    ctr.increment(w);
    assert_eq!(ctr.val(), w.max(), "increment at max is a no-op");
}

#[test]
fn counter_saturates_at_zero() {
    let w = width(2);
    let mut ctr = SatCounter::default();
    ctr.decrement();
    assert_eq!(ctr.val(), 0, "decrement at zero is a no-op");
    ctr.increment(w);
    ctr.decrement();
    ctr.decrement();
    assert_eq!(ctr.val(), 0);
}

#[test]
fn table_initialized_weakly_not_taken() {
    let table = CounterTable::new(16, width(2));
    assert_eq!(table.len(), 16);
    assert!(!table.is_empty());
    assert!((0..16).all(|i| table.read(i) == 0 && !table.predict(i)));
}

/// Two-bit counter walks 0 → 3 and back, predicting taken in the upper half.
#[test]
fn table_two_bit_direction() {
    let mut table = CounterTable::new(4, width(2));
    let mut seen = Vec::new();
    for _ in 0..4 {
        table.train(2, true);
        seen.push((table.read(2), table.predict(2)));
    }
    assert_eq!(seen, vec![(1, false), (2, true), (3, true), (3, true)]);

    table.train(2, false);
    assert_eq!((table.read(2), table.predict(2)), (2, true));
    table.train(2, false);
    assert_eq!((table.read(2), table.predict(2)), (1, false));
}

#[test]
fn table_one_bit_counter_flips_immediately() {
    let mut table = CounterTable::new(2, width(1));
    table.train(0, true);
    assert!(table.predict(0));
    table.train(0, false);
    assert!(!table.predict(0));
}

#[test]
fn table_three_bit_msb_threshold() {
    let mut table = CounterTable::new(1, width(3));
    for _ in 0..3 {
        table.train(0, true);
    }
    assert_eq!(table.read(0), 3);
    assert!(!table.predict(0));
    table.train(0, true);
    assert_eq!(table.read(0), 4);
    assert!(table.predict(0));
}

#[test]
fn table_training_is_per_entry() {
    let mut table = CounterTable::new(4, width(2));
    table.train(1, true);
    table.train(1, true);
    assert_eq!(table.read(1), 2);
    assert_eq!(table.read(0), 0);
    assert_eq!(table.read(2), 0);
}

/// Setting a fault writes the stuck value into the counter at once.
#[rstest]
#[case(2, 0, 0, 1, 0b01)]
#[case(2, 3, 0, 0, 0b10)]
#[case(2, 1, 1, 1, 0b11)]
#[case(2, 2, 1, 0, 0b00)]
#[case(8, 0, 7, 1, 0x80)]
fn stuck_value_forced_on_set(
    #[case] bits: u32,
    #[case] start: u8,
    #[case] bit: u32,
    #[case] value: u8,
    #[case] stored: u8,
) {
    let mut table = CounterTable::new(4, width(bits));
    for _ in 0..start {
        table.train(0, true);
    }
    table.set_faulted(0, bit, value).unwrap();
    assert_eq!(table.read(0), stored);
}

/// The saturating step runs on the stored value, then the stuck bit is forced back.
#[test]
fn stuck_lsb_steps_from_stored_value() {
    let mut table = CounterTable::new(4, width(2));
    table.set_faulted(1, 0, 1).unwrap();
    assert_eq!(table.read(1), 0b01);

    table.train(1, true);
    assert_eq!(table.read(1), 0b11);

    // 3 - 1 = 2, bit 0 forced back to 1.
    table.train(1, false);
    assert_eq!(table.read(1), 0b11);
    assert!(table.predict(1));
}

#[test]
fn stuck_msb_zero_writes_are_lost() {
    let mut table = CounterTable::new(4, width(2));
    table.set_faulted(2, 1, 0).unwrap();
    let mut seen = Vec::new();
    for _ in 0..4 {
        table.train(2, true);
        seen.push(table.read(2));
    }
    assert_eq!(seen, vec![1, 0, 1, 0]);
    assert!(!table.predict(2));
}

#[test]
fn cleared_fault_keeps_stored_value() {
    let mut table = CounterTable::new(4, width(2));
    table.set_faulted(3, 1, 0).unwrap();
    for _ in 0..3 {
        table.train(3, true);
    }
    assert_eq!(table.read(3), 1);

    assert!(table.clear_fault(3));
    assert_eq!(table.read(3), 1, "bit 1 writes made under the fault are gone");
    table.train(3, true);
    assert_eq!(table.read(3), 2);
}

#[test]
fn table_fault_bookkeeping() {
    let mut table = CounterTable::new(4, width(2));
    assert_eq!(table.fault(3), None);
    table.set_faulted(3, 1, 1).unwrap();
    let fault = table.fault(3).unwrap();
    assert_eq!((fault.bit(), fault.value()), (1, 1));
    table.set_faulted(3, 0, 0).unwrap();
    let fault = table.fault(3).unwrap();
    assert_eq!((fault.bit(), fault.value()), (0, 0), "latest fault wins");
    assert!(table.clear_fault(3));
    assert!(!table.clear_fault(3));
    assert_eq!(table.fault(3), None);
}

#[rstest]
#[case(2, 4, 0, 1, ConfigError::FaultEntryOutOfRange { entry: 4, sets: 4 })]
#[case(2, 0, 2, 1, ConfigError::FaultBitOutOfRange { bit: 2, width: 2 })]
#[case(8, 0, 8, 1, ConfigError::FaultBitOutOfRange { bit: 8, width: 8 })]
#[case(2, 0, 0, 2, ConfigError::StuckBit(2))]
fn set_faulted_rejects_bad_site(
    #[case] bits: u32,
    #[case] entry: usize,
    #[case] bit: u32,
    #[case] value: u8,
    #[case] expected: ConfigError,
) {
    let mut table = CounterTable::new(4, width(bits));
    assert_eq!(table.set_faulted(entry, bit, value), Err(expected));
    assert!((0..4).all(|i| table.fault(i).is_none() && table.read(i) == 0));
}
