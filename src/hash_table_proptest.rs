#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can reach the
// raw probe results and slot handles without extra API.

use crate::hash::KeyHasher;
use crate::hash_table::{HashTable, SlotHandle};
use crate::slot_table::{Probe, SystemAlloc};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink toward earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum Op {
    GetOrCreate(usize, u64),
    Insert(usize, u64),
    Get(usize),
    Handle(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u64>, Vec<Op>)> {
    proptest::collection::btree_set(any::<u64>(), 1..=48).prop_flat_map(|keys| {
        let pool: Vec<u64> = keys.into_iter().collect();
        let idx = 0..pool.len();
        let op = prop_oneof![
            3 => (idx.clone(), any::<u64>()).prop_map(|(i, v)| Op::GetOrCreate(i, v)),
            3 => (idx.clone(), any::<u64>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            1 => idx.clone().prop_map(Op::Handle),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_state_machine<H: KeyHasher>(
    mut sut: HashTable<u64, H>,
    pool: &[u64],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<u64, u64> = HashMap::new();
    // Handles minted since the last growth, with the key they point at.
    let mut handles: Vec<(SlotHandle, u64)> = Vec::new();

    for op in ops {
        let capacity_before = sut.capacity();
        match op {
            Op::GetOrCreate(i, v) => {
                let k = pool[i];
                let existed = model.contains_key(&k);
                let mut slot = sut.get_or_create(k).expect("allocation");
                prop_assert_eq!(slot.is_new(), !existed);
                prop_assert_eq!(slot.key(), k);
                if existed {
                    prop_assert_eq!(Some(slot.get()), model.get(&k));
                } else {
                    prop_assert_eq!(*slot.get(), 0);
                }
                slot.set(v);
                model.insert(k, v);
            }
            Op::Insert(i, v) => {
                let k = pool[i];
                let prev = sut.insert(k, v).expect("allocation");
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Get(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.get(k), model.get(&k));
                let probe = sut.probe(k).expect("probe never wraps");
                prop_assert_eq!(matches!(probe, Probe::Occupied(_)), model.contains_key(&k));
            }
            Op::Handle(i) => {
                let k = pool[i];
                if let Some(h) = sut.find(k) {
                    prop_assert_eq!(h.key(&sut), Some(k));
                    handles.push((h, k));
                }
            }
            Op::Iterate => {
                let s_keys: BTreeSet<u64> = sut.keys().collect();
                let m_keys: BTreeSet<u64> = model.keys().copied().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert!(sut.len() * 10 < sut.capacity() * 7);
        prop_assert!(sut.capacity() >= capacity_before, "tables never shrink");
        if sut.capacity() != capacity_before {
            for (h, _) in handles.drain(..) {
                prop_assert!(h.value(&sut).is_none(), "stale handle resolved after growth");
            }
        }
        for &(h, k) in &handles {
            prop_assert_eq!(h.value(&sut), model.get(&k));
        }
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.get(*k), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - get_or_create inserts the default exactly once and never re-keys.
// - insert reports the previous value; len matches the model.
// - capacity stays a power of two and the load factor stays below 0.7.
// - handles resolve until growth and never afterwards.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), initial in 0usize..=8) {
        let sut = HashTable::with_capacity(initial).expect("allocation");
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant: every key shares one home slot, so every lookup walks
// the full cluster.
#[derive(Clone, Default)]
struct ConstHasher;
impl KeyHasher for ConstHasher {
    fn hash_key(&self, _key: u64) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = HashTable::with_hasher_in(0, ConstHasher, SystemAlloc).expect("allocation");
        run_state_machine(sut, &pool, ops)?;
    }
}
