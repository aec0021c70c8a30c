#![cfg(test)]

// Property tests for PoolHashMap kept inside the crate so they can reach
// internal observability helpers without feature gates.

use crate::map::{Handle, PoolHashMap};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    RemoveAt(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    OrDefault(usize),
    Iterate,
    Rehash(usize),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::RemoveAt),
            idx.clone().prop_map(OpI::Find),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            idx.clone().prop_map(OpI::OrDefault),
            Just(OpI::Iterate),
            (0usize..512).prop_map(OpI::Rehash),
            Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Invariants exercised across random operation sequences:
// - Insert overwrites in place: the present key keeps its handle and the
//   map's length; a fresh key mints a new tracked handle.
// - `find`/`contains_key` parity with the model and handle stability for
//   live entries; borrowed (`&str`) lookup agrees with owned lookup.
// - `remove` returns the model's value; `remove_at` returns the owned pair
//   and rejects stale handles.
// - `get_or_insert_default` behaves like the model's entry-or-default.
// - `iter` yields each live entry exactly once (key-set equality).
// - `clear` empties the map and invalidates every outstanding handle.
// - After every op: stale handles never resolve, length/emptiness parity,
//   and the entry list reachable from the head has exactly `len` nodes.
fn run_scenario<S>(
    sut: &mut PoolHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut live: HashMap<Key, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                let h = sut.insert(k.clone(), v);
                if already {
                    let &lh = live.get(&k).expect("tracked live handle present");
                    prop_assert_eq!(h, lh, "overwrite must preserve the handle");
                } else {
                    let prev = live.insert(k.clone(), h);
                    prop_assert!(prev.is_none());
                }
                model.insert(k, v);
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k));
                if let Some(h) = live.remove(&k) {
                    stale.push(h);
                }
            }
            OpI::RemoveAt(i) => {
                let k = key_from(pool, i);
                if let Some(&h) = live.get(&k) {
                    let (kk, vv) = sut.remove_at(h).expect("live handle removes its entry");
                    prop_assert!(kk == k);
                    let mv = model.remove(&kk).expect("present in model");
                    prop_assert_eq!(vv, mv);
                    live.remove(&k);
                    stale.push(h);
                } else if let Some(&h) = stale.first() {
                    // Stale handles must be rejected without side effects.
                    let before = sut.len();
                    prop_assert!(sut.remove_at(h).is_none());
                    prop_assert_eq!(sut.len(), before);
                }
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let found = sut.find(&k);
                prop_assert_eq!(found.is_some(), model.contains_key(&k));
                if let Some(h) = found {
                    let &lh = live.get(&k).expect("tracked live handle present");
                    prop_assert_eq!(h, lh);
                    prop_assert_eq!(h.value(sut), model.get(&k));
                }
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                let slot = sut.get_mut(&k);
                prop_assert_eq!(slot.is_some(), model.contains_key(&k));
                if let Some(v) = slot {
                    *v = v.saturating_add(d);
                    if let Some(mv) = model.get_mut(&k) {
                        *mv = mv.saturating_add(d);
                    }
                }
            }
            OpI::OrDefault(i) => {
                let k = key_from(pool, i);
                let v = sut.get_or_insert_default(k.clone());
                *v = v.saturating_add(1);
                let mv = model.entry(k.clone()).or_insert(0);
                *mv = mv.saturating_add(1);
                prop_assert_eq!(*v, *mv);
                // A defaulted insert mints a live entry we must track.
                let h = sut.find(&k).expect("entry just touched is live");
                live.insert(k, h);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Rehash(n) => {
                // Pre-reserving must never disturb the contents.
                sut.rehash(n);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                stale.extend(live.drain().map(|(_, h)| h));
            }
        }

        // Post-conditions after each op
        for &h in &stale {
            prop_assert!(h.value(sut).is_none(), "stale handle must not resolve");
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), sut.len());
        if sut.bucket_count() > 0 {
            prop_assert!(sut.bucket_count().is_power_of_two());
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: PoolHashMap<Key, i32> = PoolHashMap::new();
        run_scenario(&mut sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key lands in one bucket,
// stressing run walking, anchor maintenance, and equality probing.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: PoolHashMap<Key, i32, ConstBuildHasher> =
            PoolHashMap::with_hasher(ConstBuildHasher);
        run_scenario(&mut sut, &pool, ops)?;
    }
}

// Small-capacity variant: a tiny requested capacity still rounds up to the
// default bucket count, and growth from there must never lose a key.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_small_capacity((pool, ops) in arb_scenario()) {
        let mut sut: PoolHashMap<Key, i32> = PoolHashMap::with_capacity(4);
        run_scenario(&mut sut, &pool, ops)?;
    }
}
