//! pool-hashmap: a chained hash map whose entries live in a pooled node
//! arena and are threaded through one intrusive doubly-linked list.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: amortized O(1) lookup/insert/remove with no per-entry heap
//!   allocation, built in small layers so each invariant can be reasoned
//!   about independently.
//! - Layers:
//!   - NodePool: chunked storage (256 nodes per chunk) with an embedded
//!     free list. Nodes never move; released nodes are recycled, and chunks
//!     are only freed when the pool is dropped.
//!   - Bucket: an anchored run inside the map-wide entry list. A bucket has
//!     no chain of its own, only the node where its run begins and a count.
//!   - PoolHashMap: owns the bucket array, the pool, and the head of the
//!     entry list; computes masked hashes and coordinates growth.
//!
//! One link pair, three roles
//! - Every node carries a single `next`/`prev` pair. On the free list,
//!   `next` is the free-list link. Once live, the pair positions the node in
//!   the single global list that simultaneously serves whole-map iteration
//!   and, via anchored contiguous runs, per-bucket chains. The free/live
//!   transition happens only inside the pool and is debug-asserted.
//!
//! Ordering
//! - A bucket's first entry is spliced in front of the global head; later
//!   entries of the same bucket are spliced right after the bucket's anchor.
//!   Iteration therefore yields the most recently opened bucket's run first,
//!   and within a run the anchor followed by its members newest-first. This
//!   keeps insertion O(1) without tail tracking and is part of the contract,
//!   not an accident.
//!
//! Growth
//! - The bucket array is allocated lazily on the first insertion (default 64
//!   buckets, always a power of two). A sized table resizes only when the
//!   incoming size exceeds twice the bucket count, so the load factor may
//!   reach 2 between resizes; rebuilds walk the old entry list in order and
//!   re-thread every node under the new mask. The table never shrinks.
//!
//! Handles
//! - `find`/`insert` return `Handle`s: generational node references that
//!   keep working across rehashes (storage is stable) and reliably stop
//!   resolving once the entry is removed, even if the slot is reused.
//!
//! Constraints and non-goals
//! - Single-threaded; mutation requires `&mut self` and there is no internal
//!   locking. No persistence, no shrinking, no load-factor tuning. All
//!   operations are total: absent-key lookups and removals return `None`.
//! - Structural invariants (entry-list length vs. tracked length) are
//!   checked after every mutation in debug builds and compiled out in
//!   release builds.

mod bucket;
pub mod hash;
mod map;
mod map_proptest;
mod pool;

// Public surface
pub use hash::{PtrBuildHasher, PtrHasher};
pub use map::{Handle, Iter, IterMut, PoolHashMap};
