//! PoolHashMap: table orchestration over the node pool and bucket runs.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use std::collections::hash_map::RandomState;

use crate::bucket::Bucket;
use crate::pool::{Node, NodeIdx, NodePool, CHUNK_SIZE};

/// Default bucket count; explicit capacities grow from here by doubling.
const DEFAULT_BUCKETS: usize = 1 << 6;

/// A generational reference to an entry. Stays valid until the entry is
/// removed (or the map is cleared); a stale handle never resolves, even when
/// the underlying node slot is reused for a new entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    idx: NodeIdx,
    generation: u32,
}

impl Handle {
    pub(crate) fn new(idx: NodeIdx, generation: u32) -> Self {
        Handle { idx, generation }
    }

    pub fn key<'a, K, V, S>(&self, map: &'a PoolHashMap<K, V, S>) -> Option<&'a K>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        map.handle_key(*self)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a PoolHashMap<K, V, S>) -> Option<&'a V>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut PoolHashMap<K, V, S>) -> Option<&'a mut V>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        map.handle_value_mut(*self)
    }
}

/// A hash map whose entries live in a chunked node pool and are threaded
/// through one intrusive doubly-linked list. Buckets are anchored runs in
/// that list; see the crate docs for the full design.
pub struct PoolHashMap<K, V, S = RandomState> {
    hasher: S,
    pool: NodePool<K, V>,
    buckets: Vec<Bucket>,
    mask: usize,
    len: usize,
    init_buckets: usize,
    /// Head of the global entry list; `None` while the map is empty.
    first: Option<NodeIdx>,
}

impl<K, V> PoolHashMap<K, V>
where
    K: Eq + Hash,
{
    /// An unsized map with the default initial bucket count. Allocates
    /// nothing until the first insertion.
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_BUCKETS, Default::default())
    }

    /// An unsized map whose first bucket array will hold at least
    /// `min_buckets` buckets, rounded up to a power of two (never below the
    /// default). Allocates nothing until the first insertion.
    pub fn with_capacity(min_buckets: usize) -> Self {
        Self::with_capacity_and_hasher(min_buckets, Default::default())
    }
}

impl<K, V> Default for PoolHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PoolHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_BUCKETS, hasher)
    }

    pub fn with_capacity_and_hasher(min_buckets: usize, hasher: S) -> Self {
        // Saturates at the largest power of two rather than overflowing for
        // absurd requests; the array itself is not allocated until the first
        // insertion.
        let init = min_buckets
            .checked_next_power_of_two()
            .unwrap_or(1 << (usize::BITS - 1))
            .max(DEFAULT_BUCKETS);
        Self {
            hasher,
            pool: NodePool::new(),
            buckets: Vec::new(),
            mask: 0,
            len: 0,
            init_buckets: init,
            first: None,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket array size; 0 while the map is unsized.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn find_node<Q>(&self, q: &Q) -> Option<NodeIdx>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let pos = self.bucket_index(self.make_hash(q));
        self.buckets[pos].lookup(&self.pool, q)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.find_node(q)?;
        Some(Handle::new(idx, self.pool.generation(idx)))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_node(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.find_node(q)?;
        self.pool.node(idx).entry.as_ref().map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.find_node(q)?;
        self.pool.node_mut(idx).entry.as_mut().map(|(_, v)| v)
    }

    /// Insert `key`/`value`. A present key has its value overwritten in
    /// place: the node keeps its identity, position in the entry list, and
    /// outstanding handles. Never fails.
    pub fn insert(&mut self, key: K, value: V) -> Handle {
        let idx = self.insert_node(key, value);
        Handle::new(idx, self.pool.generation(idx))
    }

    fn insert_node(&mut self, key: K, value: V) -> NodeIdx {
        // Grow first: the bucket index must be computed under the final mask.
        self.rehash(self.len + 1);
        let pos = self.bucket_index(self.make_hash(&key));
        if let Some(idx) = self.buckets[pos].lookup(&self.pool, &key) {
            if let Some((_, v)) = &mut self.pool.node_mut(idx).entry {
                *v = value;
            }
            return idx;
        }
        let idx = self.pool.acquire(key, value);
        self.link_into(pos, idx);
        idx
    }

    /// Thread a detached node into the bucket at `pos`. When the bucket was
    /// empty, its anchor is first spliced in front of the global head; that
    /// is the only way a bucket's run becomes reachable from the list.
    fn link_into(&mut self, pos: usize, idx: NodeIdx) {
        if self.buckets[pos].is_empty() {
            self.pool.node_mut(idx).next = self.first;
            if let Some(head) = self.first {
                self.pool.node_mut(head).prev = Some(idx);
            }
            self.first = Some(idx);
        }
        self.buckets[pos].insert(&mut self.pool, idx);
        self.len += 1;
        debug_assert!(self.list_consistent());
    }

    /// Remove by key; `None` when the map is unsized or the key is absent.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let pos = self.bucket_index(self.make_hash(q));
        let idx = self.buckets[pos].remove(&mut self.pool, q)?;
        Some(self.release_unlinked(idx).1)
    }

    /// Remove the entry a handle points at; `None` for stale handles.
    pub fn remove_at(&mut self, handle: Handle) -> Option<(K, V)> {
        let idx = self.resolve(handle)?;
        let hash = match &self.pool.node(idx).entry {
            Some((k, _)) => self.make_hash(k),
            None => return None,
        };
        let pos = self.bucket_index(hash);
        self.buckets[pos].unlink(&mut self.pool, idx);
        Some(self.release_unlinked(idx))
    }

    fn release_unlinked(&mut self, idx: NodeIdx) -> (K, V) {
        if self.first == Some(idx) {
            // The unlinked node's own links are stale but still name its
            // former successor.
            self.first = self.pool.node(idx).next;
        }
        let entry = self.pool.release(idx);
        self.len -= 1;
        debug_assert!(self.list_consistent());
        entry
    }

    /// Mutable access to the value for `key`, inserting a default value
    /// first when the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let idx = match self.find_node(&key) {
            Some(idx) => idx,
            None => self.insert_node(key, V::default()),
        };
        self.pool
            .node_mut(idx)
            .entry
            .as_mut()
            .map(|(_, v)| v)
            .expect("found or freshly inserted node is live")
    }

    /// Growth policy. An unsized map allocates its initial bucket array and
    /// becomes sized. A sized map resizes only when `min_size` exceeds twice
    /// the bucket count, to the smallest power of two whose next doubling
    /// would reach `min_size`; the table therefore tolerates a load factor
    /// of up to 2 between resizes. The map never shrinks.
    pub fn rehash(&mut self, min_size: usize) {
        if self.buckets.is_empty() {
            self.buckets = vec![Bucket::new(); self.init_buckets];
            self.mask = self.init_buckets - 1;
        } else if min_size > (self.buckets.len() << 1) {
            let mut size = self.buckets.len() << 1;
            while (size << 1) < min_size {
                size <<= 1;
            }
            self.buckets = vec![Bucket::new(); size];
            self.mask = size - 1;
            self.rebuild();
        }
    }

    /// Re-thread every live node under the new mask. The old global order is
    /// the traversal order of the rebuild; bucket-local order is applied
    /// afresh by the normal insert path.
    fn rebuild(&mut self) {
        let mut cur = self.first.take();
        self.len = 0;
        while let Some(idx) = cur {
            let next = {
                let node = self.pool.node_mut(idx);
                node.prev = None;
                node.next.take()
            };
            let hash = self
                .pool
                .node(idx)
                .entry
                .as_ref()
                .map(|(k, _)| self.make_hash(k));
            if let Some(hash) = hash {
                let pos = self.bucket_index(hash);
                self.link_into(pos, idx);
            }
            cur = next;
        }
    }

    /// Drop the bucket array and release every live node back to the pool,
    /// returning the map to its unsized initial state. The pool's chunks are
    /// retained and reused by future insertions.
    pub fn clear(&mut self) {
        self.buckets = Vec::new();
        self.mask = 0;
        self.len = 0;
        let mut cur = self.first.take();
        while let Some(idx) = cur {
            cur = self.pool.node(idx).next;
            let _ = self.pool.release(idx);
        }
    }

    /// Iterate the global entry list from its head. Order is the documented
    /// anchored-run order: the most recently opened bucket's run first, and
    /// within a run the anchor followed by its members newest-first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            pool: &self.pool,
            cur: self.first,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            cur: self.first,
            chunks: self.pool.chunk_bases(),
            _marker: PhantomData,
        }
    }

    fn resolve(&self, handle: Handle) -> Option<NodeIdx> {
        let node = self.pool.get(handle.idx)?;
        if node.generation == handle.generation && node.entry.is_some() {
            Some(handle.idx)
        } else {
            None
        }
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        let idx = self.resolve(h)?;
        self.pool.node(idx).entry.as_ref().map(|(k, _)| k)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        let idx = self.resolve(h)?;
        self.pool.node(idx).entry.as_ref().map(|(_, v)| v)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        let idx = self.resolve(h)?;
        self.pool.node_mut(idx).entry.as_mut().map(|(_, v)| v)
    }

    /// Consistency check run after every structural mutation in debug
    /// builds: the number of nodes reachable from the global head must equal
    /// the tracked length. Guards against a cycle by capping the walk.
    fn list_consistent(&self) -> bool {
        let mut n = 0usize;
        let mut cur = self.first;
        while let Some(idx) = cur {
            n += 1;
            if n > self.len {
                return false;
            }
            cur = self.pool.node(idx).next;
        }
        n == self.len
    }

    #[cfg(test)]
    pub(crate) fn chunk_count(&self) -> usize {
        self.pool.chunk_count()
    }
}

/// Iterator over the global entry list.
pub struct Iter<'a, K, V> {
    pool: &'a NodePool<K, V>,
    cur: Option<NodeIdx>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cur?;
        let node = self.pool.node(idx);
        self.cur = node.next;
        node.entry.as_ref().map(|(k, v)| (k, v))
    }
}

/// Mutable iterator over the global entry list.
///
/// Holds raw chunk base pointers snapshotted at construction so that `next`
/// never re-borrows the pool as a whole: each yield reborrows exactly one
/// node, keeping previously yielded references disjoint and valid.
pub struct IterMut<'a, K, V> {
    chunks: Vec<*mut Node<K, V>>,
    cur: Option<NodeIdx>,
    _marker: PhantomData<&'a mut NodePool<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cur?;
        // SAFETY: each chunk base was derived from its own `&mut` chunk
        // borrow while `iter_mut` held the map's unique borrow, which this
        // iterator keeps alive for 'a. The entry list is acyclic and visits
        // every node at most once, so the single-node `&mut` minted here is
        // disjoint from every reference yielded earlier; nothing wider than
        // one node is ever reborrowed.
        let node: &'a mut Node<K, V> = unsafe {
            &mut *self.chunks[idx.index() / CHUNK_SIZE].add(idx.index() % CHUNK_SIZE)
        };
        self.cur = node.next;
        node.entry.as_mut().map(|(k, v)| (&*k, v))
    }
}

impl<'a, K, V, S> IntoIterator for &'a PoolHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut PoolHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::Hasher;

    /// Hasher that sends every key to one bucket, for ordering tests.
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

    /// Hasher that uses a u64 key as its own hash, for placing keys into
    /// chosen buckets.
    #[derive(Clone, Default)]
    struct IdentityBuildHasher;
    #[derive(Default)]
    struct IdentityHasher(u64);
    impl BuildHasher for IdentityBuildHasher {
        type Hasher = IdentityHasher;
        fn build_hasher(&self) -> Self::Hasher {
            IdentityHasher(0)
        }
    }
    impl Hasher for IdentityHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
        fn finish(&self) -> u64 {
            self.0
        }
    }

    /// Invariant: construction allocates nothing; the bucket array appears
    /// on the first insertion at the configured size.
    #[test]
    fn bucket_array_is_lazy() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        assert_eq!(m.bucket_count(), 0);
        assert_eq!(m.chunk_count(), 0);

        m.insert(1, 1);
        assert_eq!(m.bucket_count(), 64);

        // Small requested capacities still start at the default.
        let mut small: PoolHashMap<u32, u32> = PoolHashMap::with_capacity(4);
        small.insert(1, 1);
        assert_eq!(small.bucket_count(), 64);

        // Larger ones round up to a power of two.
        let mut big: PoolHashMap<u32, u32> = PoolHashMap::with_capacity(100);
        big.insert(1, 1);
        assert_eq!(big.bucket_count(), 128);
    }

    /// Invariant: inserting a present key overwrites in place; the handle,
    /// length, and list position are unchanged.
    #[test]
    fn overwrite_preserves_identity() {
        let mut m: PoolHashMap<String, i32> = PoolHashMap::new();
        let h1 = m.insert("k".to_string(), 1);
        let h2 = m.insert("k".to_string(), 2);
        assert_eq!(h1, h2);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("k"), Some(&2));
        assert_eq!(h1.value(&m), Some(&2));
    }

    /// Invariant: a removed entry's handle goes stale and never aliases a
    /// new entry, even when the node slot is reused.
    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut m: PoolHashMap<String, i32> = PoolHashMap::new();
        let h1 = m.insert("old".to_string(), 1);
        assert_eq!(m.remove("old"), Some(1));
        assert!(h1.value(&m).is_none());

        // The pool's LIFO free list makes slot reuse immediate.
        let h2 = m.insert("new".to_string(), 2);
        assert_ne!(h1, h2);
        assert!(h1.value(&m).is_none());
        assert_eq!(h2.value(&m), Some(&2));
    }

    /// Invariant: within one bucket, iteration yields the anchor first and
    /// the remaining members newest-first.
    #[test]
    fn single_bucket_order_is_anchor_then_newest_first() {
        let mut m: PoolHashMap<&'static str, i32, ConstBuildHasher> =
            PoolHashMap::with_hasher(ConstBuildHasher);
        m.insert("a", 0);
        m.insert("b", 1);
        m.insert("c", 2);
        let keys: Vec<_> = m.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["a", "c", "b"]);
    }

    /// Invariant: a bucket's run becomes reachable by splicing its anchor in
    /// front of the global head, so runs appear newest-bucket-first.
    #[test]
    fn bucket_runs_are_prepended_to_the_list() {
        let mut m: PoolHashMap<u64, i32, IdentityBuildHasher> =
            PoolHashMap::with_hasher(IdentityBuildHasher);
        // Distinct buckets (identity hash, mask 63).
        m.insert(1, 0);
        m.insert(2, 0);
        m.insert(3, 0);
        // Second member of bucket 1 lands after its anchor, not at the head.
        m.insert(65, 0);
        let keys: Vec<_> = m.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [3, 2, 1, 65]);
    }

    /// Invariant: removing the entry at the global head advances the head to
    /// its former successor.
    #[test]
    fn removing_the_head_advances_it() {
        let mut m: PoolHashMap<u64, i32, IdentityBuildHasher> =
            PoolHashMap::with_hasher(IdentityBuildHasher);
        m.insert(1, 10);
        m.insert(2, 20);
        let head_key = *m.iter().next().map(|(k, _)| k).expect("non-empty");
        assert_eq!(head_key, 2);

        assert_eq!(m.remove(&2), Some(20));
        let keys: Vec<_> = m.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [1]);
    }

    /// Invariant: growth re-threads every entry; nothing is lost or
    /// duplicated and the counter stays consistent with the list.
    #[test]
    fn growth_keeps_every_key_findable() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        for i in 0..1000u32 {
            m.insert(i, i * 3);
        }
        assert_eq!(m.len(), 1000);
        assert_eq!(m.bucket_count(), 512);
        assert_eq!(m.iter().count(), 1000);
        for i in 0..1000u32 {
            assert_eq!(m.get(&i), Some(&(i * 3)));
        }
    }

    /// Invariant: handles survive a rehash; node storage never moves, only
    /// the links are re-threaded.
    #[test]
    fn handles_survive_rehash() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        let h = m.insert(7, 70);
        for i in 1000..2000u32 {
            m.insert(i, i);
        }
        assert!(m.bucket_count() > 64);
        assert_eq!(h.value(&m), Some(&70));
        assert_eq!(h.key(&m), Some(&7));
    }

    /// Invariant: clear releases every entry but retains pool chunks; the
    /// map then behaves as freshly constructed.
    #[test]
    fn clear_retains_chunks_and_resets_table() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        for i in 0..600u32 {
            m.insert(i, i);
        }
        let chunks = m.chunk_count();
        assert!(chunks >= 2);

        m.clear();
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert_eq!(m.bucket_count(), 0);
        assert_eq!(m.chunk_count(), chunks);
        assert_eq!(m.get(&5), None);

        // Reinsertion reuses pooled nodes without new chunk allocations.
        for i in 0..600u32 {
            m.insert(i, i + 1);
        }
        assert_eq!(m.len(), 600);
        assert_eq!(m.chunk_count(), chunks);
        assert_eq!(m.get(&5), Some(&6));
    }

    /// Invariant: `remove_at` removes exactly the referenced entry and
    /// returns its key/value; stale handles are rejected.
    #[test]
    fn remove_at_takes_the_entry() {
        let mut m: PoolHashMap<String, i32> = PoolHashMap::new();
        let h = m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);

        assert_eq!(m.remove_at(h), Some(("a".to_string(), 1)));
        assert_eq!(m.len(), 1);
        assert_eq!(m.remove_at(h), None);
        assert!(m.contains_key("b"));
    }

    /// Invariant: `get_or_insert_default` inserts the default exactly once
    /// and then keeps returning the same entry.
    #[test]
    fn get_or_insert_default_inserts_once() {
        let mut m: PoolHashMap<String, i32> = PoolHashMap::new();
        *m.get_or_insert_default("n".to_string()) += 1;
        *m.get_or_insert_default("n".to_string()) += 1;
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("n"), Some(&2));
    }

    /// Invariant: `iter_mut` visits each entry once with mutable access.
    #[test]
    fn iter_mut_updates_every_entry() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        for i in 0..10u32 {
            m.insert(i, i);
        }
        for (_k, v) in &mut m {
            *v += 100;
        }
        for i in 0..10u32 {
            assert_eq!(m.get(&i), Some(&(i + 100)));
        }
    }

    /// Invariant: items yielded by `iter_mut` borrow disjoint entries, so
    /// several can be held and written through simultaneously.
    #[test]
    fn iter_mut_items_are_independent() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        for i in 0..4u32 {
            m.insert(i, i);
        }
        let mut it = m.iter_mut();
        let (_, a) = it.next().expect("first entry");
        let (_, b) = it.next().expect("second entry");
        *a += 100;
        *b += 200;
        drop(it);
        // Original values 0..4 sum to 6; the two writes add 300.
        let sum: u32 = m.iter().map(|(_, v)| *v).sum();
        assert_eq!(sum, 306);
    }

    /// Invariant: capacity requests near `usize::MAX` still construct; the
    /// bucket array is deferred to the first insertion, so nothing huge is
    /// allocated here.
    #[test]
    fn huge_capacity_request_constructs() {
        let m: PoolHashMap<u32, u32> = PoolHashMap::with_capacity(usize::MAX);
        assert_eq!(m.bucket_count(), 0);
        assert!(m.is_empty());
    }

    /// Invariant: an explicit `rehash` pre-sizes the table; later inserts up
    /// to twice that size trigger no further growth.
    #[test]
    fn explicit_rehash_presizes() {
        let mut m: PoolHashMap<u32, u32> = PoolHashMap::new();
        m.rehash(0);
        assert_eq!(m.bucket_count(), 64);
        m.rehash(1000);
        assert_eq!(m.bucket_count(), 512);
        for i in 0..1000u32 {
            m.insert(i, i);
        }
        assert_eq!(m.bucket_count(), 512);
    }
}
