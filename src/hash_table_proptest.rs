#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check the
// bucket/chain structure directly, not only the public API.

use crate::hash_table::HashTable;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Retrieve(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=4, proptest::collection::vec("[a-z]{0,5}", 1..=12)).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Retrieve),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

// Drive `sut` and a std HashMap model through the same operations.
// Invariants checked after each op:
// - lookups, removals and overwrites agree with the model;
// - `len` parity, `len <= capacity`, capacity only doubles;
// - every node sits in the bucket its key hashes to, keys are unique and
//   the chains account for every stored node.
fn run_state_machine<S: BuildHasher>(
    mut sut: HashTable<i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let initial = sut.capacity();

    for op in ops {
        let before_cap = sut.capacity();
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let full = sut.len() == sut.capacity();
                let prev = sut.insert(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                if full {
                    prop_assert_eq!(sut.capacity(), before_cap * 2);
                } else {
                    prop_assert_eq!(sut.capacity(), before_cap);
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let len = sut.len();
                let removed = sut.remove(k);
                let expected = model.remove(k);
                prop_assert_eq!(removed, expected);
                let delta = usize::from(expected.is_some());
                prop_assert_eq!(sut.len(), len - delta);
                prop_assert!(sut.retrieve(k).is_none());
            }
            OpI::Retrieve(i) => {
                let k = &pool[i];
                let first = sut.retrieve(k).copied();
                prop_assert_eq!(first, model.get(k).copied());
                // Repeated reads without mutation agree.
                prop_assert_eq!(sut.retrieve(k).copied(), first);
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.retrieve_mut(k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<String> = sut.keys().map(str::to_string).collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), before_cap);
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() <= sut.capacity());
        prop_assert!(sut.capacity() >= before_cap);
        prop_assert_eq!(sut.capacity() % initial, 0);
        prop_assert!((sut.capacity() / initial).is_power_of_two());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario()) {
        let sut = HashTable::new(cap).expect("non-zero capacity");
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant: the hasher keeps only two bits, so every chain is long
// and removals hit heads, middles and tails alike.
#[derive(Clone, Default)]
struct CoarseBuildHasher;
struct CoarseHasher(crate::hash::Djb2Hasher);
impl BuildHasher for CoarseBuildHasher {
    type Hasher = CoarseHasher;
    fn build_hasher(&self) -> Self::Hasher {
        CoarseHasher(crate::hash::Djb2Hasher::new())
    }
}
impl Hasher for CoarseHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }
    fn finish(&self) -> u64 {
        self.0.finish() & 0b11
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((cap, pool, ops) in arb_scenario()) {
        let sut = HashTable::with_hasher(cap, CoarseBuildHasher).expect("non-zero capacity");
        run_state_machine(sut, &pool, ops)?;
    }
}
