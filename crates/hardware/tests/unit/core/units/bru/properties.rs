//! Randomized invariants of the gshare predictor.
//!
//! Uses proptest to drive counters and predictors through arbitrary
//! operation sequences and check the invariants that must hold after every
//! step.

use bpsim_core::common::{CounterWidth, HistoryWidth};
use bpsim_core::core::units::bru::SatCounter;
use bpsim_core::{DirectionPredictor, GSharePredictor, PredictionRecord, ThreadId};
use proptest::prelude::*;

use crate::common::{T0, predictor, train_in_place};

/// One protocol step applied to the in-flight record stack.
#[derive(Clone, Debug)]
enum Op {
    Lookup(u64),
    Uncond(u64),
    Update { taken: bool, squashed: bool },
    Squash,
    Retire,
    BtbUpdate,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u64>().prop_map(Op::Lookup),
        any::<u64>().prop_map(Op::Uncond),
        (any::<bool>(), any::<bool>()).prop_map(|(taken, squashed)| Op::Update { taken, squashed }),
        Just(Op::Squash),
        Just(Op::Retire),
        Just(Op::BtbUpdate),
    ]
}

/// Applies `op` to thread `tid`, keeping the in-flight records youngest-last.
fn apply(bp: &mut GSharePredictor, tid: ThreadId, inflight: &mut Vec<(u64, PredictionRecord)>, op: &Op) {
    match *op {
        Op::Lookup(pc) => {
            let (_, rec) = bp.lookup(tid, pc);
            inflight.push((pc, rec));
        }
        Op::Uncond(pc) => inflight.push((pc, bp.uncond_branch(tid, pc))),
        Op::Update { taken, squashed } => {
            if let Some((pc, rec)) = inflight.pop() {
                if let Some(rec) = bp.update(tid, pc, taken, Some(rec), squashed) {
                    inflight.push((pc, rec));
                }
            }
        }
        Op::Squash => {
            if let Some((_, rec)) = inflight.pop() {
                bp.squash(tid, rec);
            }
        }
        Op::Retire => {
            if let Some((_, rec)) = inflight.pop() {
                bp.retire_squashed(tid, rec);
            }
        }
        Op::BtbUpdate => {
            if let Some((pc, rec)) = inflight.last() {
                bp.btb_update(tid, *pc, rec);
            }
        }
    }
}

proptest! {
    /// Counters stay within `0..=2^bits - 1` under any training sequence.
    #[test]
    fn prop_counter_saturates(bits in 1u32..=8, steps in prop::collection::vec(any::<bool>(), 0..600)) {
        let width = CounterWidth::new(bits).unwrap();
        let mut ctr = SatCounter::default();
        for up in steps {
            let before = ctr.val();
            if up {
                ctr.increment(width);
                prop_assert!(before == width.max() || ctr.val() == before + 1);
            } else {
                ctr.decrement();
                prop_assert!(before == 0 || ctr.val() + 1 == before);
            }
            prop_assert!(ctr.val() <= width.max());
        }
    }

    /// The index is a pure function of `(pc, history)` and always fits the table.
    #[test]
    fn prop_index_deterministic(
        bits in 1u32..=32,
        sets_log2 in 0u32..=12,
        pc in any::<u64>(),
        ghr in any::<u32>(),
    ) {
        let bp = predictor(1, bits, 1 << sets_log2, 2);
        let idx = bp.compute_index(pc, ghr);
        prop_assert_eq!(idx, bp.compute_index(pc, ghr));
        prop_assert!(idx < bp.predictor_sets());

        let other = predictor(1, bits, 1 << sets_log2, 2);
        prop_assert_eq!(idx, other.compute_index(pc, ghr));
    }

    /// History never exceeds its width, whatever the operation sequence.
    #[test]
    fn prop_history_masked(
        bits in 1u32..=32,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mask = HistoryWidth::new(bits).unwrap().mask();
        let mut bp = predictor(2, bits, 64, 2);
        let mut inflight = [Vec::new(), Vec::new()];
        for (i, op) in ops.iter().enumerate() {
            let tid = ThreadId(i % 2);
            apply(&mut bp, tid, &mut inflight[tid.val()], op);
            prop_assert!(bp.history(T0) & !mask == 0);
            prop_assert!(bp.history(ThreadId(1)) & !mask == 0);
        }
    }

    /// Counters stay in range under any operation sequence.
    #[test]
    fn prop_counters_in_range(
        ctr_bits in 1u32..=8,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let max = CounterWidth::new(ctr_bits).unwrap().max();
        let mut bp = predictor(1, 4, 16, ctr_bits);
        let mut inflight = Vec::new();
        for op in &ops {
            apply(&mut bp, T0, &mut inflight, op);
        }
        for i in 0..16 {
            prop_assert!(bp.counter_value(T0, i).unwrap() <= max);
        }
    }

    /// A lookup followed immediately by a squash restores the history exactly.
    #[test]
    fn prop_lookup_squash_restores(
        prefix in prop::collection::vec(op(), 0..64),
        pc in any::<u64>(),
        uncond in any::<bool>(),
    ) {
        let mut bp = predictor(1, 6, 256, 2);
        let mut inflight = Vec::new();
        for op in &prefix {
            apply(&mut bp, T0, &mut inflight, op);
        }
        let before = bp.history(T0);
        let counters: Vec<_> = (0..256).map(|i| bp.counter_value(T0, i)).collect();

        let rec = if uncond { bp.uncond_branch(T0, pc) } else { bp.lookup(T0, pc).1 };
        prop_assert_eq!(bp.get_ghr(T0, &rec), before);
        bp.squash(T0, rec);

        prop_assert_eq!(bp.history(T0), before);
        let after: Vec<_> = (0..256).map(|i| bp.counter_value(T0, i)).collect();
        prop_assert_eq!(counters, after);
    }

    /// Squashing the oldest of any number of in-flight predictions rewinds
    /// to the history that preceded it.
    #[test]
    fn prop_squash_oldest_rewinds_all(
        pcs in prop::collection::vec((any::<u64>(), any::<bool>()), 1..32),
    ) {
        let mut bp = predictor(1, 10, 1024, 2);
        let seed = bp.uncond_branch(T0, 0);
        let before = bp.history(T0);

        let mut records: Vec<_> = pcs
            .iter()
            .map(|&(pc, uncond)| if uncond { bp.uncond_branch(T0, pc) } else { bp.lookup(T0, pc).1 })
            .collect();
        let oldest = records.remove(0);
        bp.squash(T0, oldest);
        prop_assert_eq!(bp.history(T0), before);

        for rec in records {
            bp.retire_squashed(T0, rec);
        }
        bp.retire_squashed(T0, seed);
        prop_assert_eq!(bp.history(T0), before);
    }

    /// A stuck bit keeps its value through any training; the counter still
    /// saturates within range.
    #[test]
    fn prop_stuck_bit_holds(
        bit in 0u32..3,
        stuck in 0u8..=1,
        outcomes in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut bp = predictor(1, 6, 1024, 3);
        let entry = 9;
        let pc = (entry as u64) << 2;
        bp.inject_fault(T0, entry, bit, stuck).unwrap();

        for taken in outcomes {
            train_in_place(&mut bp, T0, pc, taken);
            let value = bp.counter_value(T0, entry).unwrap();
            prop_assert_eq!((value >> bit) & 1, stuck);
            prop_assert!(value <= 7);
        }
    }
}
