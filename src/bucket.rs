//! Bucket: an anchored run of nodes inside the map's single entry list.
//!
//! A bucket does not own a chain of its own. It remembers the node where its
//! run begins (the anchor) and how many nodes belong to it; the nodes
//! themselves are threaded through the map-wide list held in the pool.
//! Walking `next` from the anchor for `len` steps visits exactly this
//! bucket's nodes.

use core::borrow::Borrow;

use crate::pool::{NodeIdx, NodePool};

#[derive(Clone)]
pub(crate) struct Bucket {
    anchor: Option<NodeIdx>,
    len: u32,
}

impl Bucket {
    pub(crate) fn new() -> Self {
        Bucket {
            anchor: None,
            len: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len as usize
    }

    /// Walk the run from the anchor, at most `len` steps, looking for `q`.
    pub(crate) fn lookup<K, V, Q>(&self, pool: &NodePool<K, V>, q: &Q) -> Option<NodeIdx>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.anchor;
        for _ in 0..self.len {
            let idx = cur?;
            let node = pool.node(idx);
            if let Some((k, _)) = &node.entry {
                if k.borrow() == q {
                    return Some(idx);
                }
            }
            cur = node.next;
        }
        None
    }

    /// Adopt a node into the run. An empty bucket takes it as the anchor
    /// without touching its links (the table has already threaded it into
    /// the global list); a non-empty bucket splices it immediately after the
    /// anchor, so within a bucket the order after the anchor is
    /// most-recent-first. Insertion never needs a tail pointer.
    pub(crate) fn insert<K, V>(&mut self, pool: &mut NodePool<K, V>, idx: NodeIdx) {
        match self.anchor {
            None => {
                debug_assert_eq!(self.len, 0);
                self.anchor = Some(idx);
            }
            Some(anchor) => {
                let after = pool.node(anchor).next;
                pool.node_mut(anchor).next = Some(idx);
                if let Some(a) = after {
                    pool.node_mut(a).prev = Some(idx);
                }
                let node = pool.node_mut(idx);
                node.prev = Some(anchor);
                node.next = after;
            }
        }
        self.len += 1;
    }

    /// Locate `q` in the run and unlink it. Returns the unlinked node, still
    /// live in the pool; the caller releases it.
    pub(crate) fn remove<K, V, Q>(&mut self, pool: &mut NodePool<K, V>, q: &Q) -> Option<NodeIdx>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = self.lookup(pool, q)?;
        self.unlink(pool, idx);
        Some(idx)
    }

    /// Unlink a node known to belong to this bucket. When the node is the
    /// anchor, the run re-anchors at its former `next` (or empties). The
    /// node's own links are left stale; only its neighbors are repaired.
    pub(crate) fn unlink<K, V>(&mut self, pool: &mut NodePool<K, V>, idx: NodeIdx) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.contains(pool, idx), "node must belong to this bucket");
        }
        if self.anchor == Some(idx) {
            self.anchor = if self.len == 1 {
                None
            } else {
                pool.node(idx).next
            };
        }
        let (prev, next) = {
            let node = pool.node(idx);
            (node.prev, node.next)
        };
        if let Some(n) = next {
            pool.node_mut(n).prev = prev;
        }
        if let Some(p) = prev {
            pool.node_mut(p).next = next;
        }
        self.len -= 1;
    }

    #[cfg(debug_assertions)]
    fn contains<K, V>(&self, pool: &NodePool<K, V>, idx: NodeIdx) -> bool {
        let mut cur = self.anchor;
        for _ in 0..self.len {
            match cur {
                Some(c) if c == idx => return true,
                Some(c) => cur = pool.node(c).next,
                None => return false,
            }
        }
        false
    }
}
