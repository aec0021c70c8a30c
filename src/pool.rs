//! NodePool: chunked node storage with an embedded free list.
//!
//! Nodes are handed out from fixed-size chunks and never move for the life
//! of the pool, so a `NodeIdx` stays valid until the pool itself is dropped.
//! A node's single `next`/`prev` link pair is role-scoped: while the node is
//! free, `next` threads the pool's free list (`prev` is ignored); while the
//! node is live, both links position it in the map's global entry list.
//! The role transition happens only in `acquire`/`release` and is
//! debug-asserted, never implied.

/// Nodes per chunk. Growth allocates one whole chunk at a time.
pub(crate) const CHUNK_SIZE: usize = 256;

/// Index of a node inside the pool. Stable for the pool's lifetime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct NodeIdx(u32);

impl NodeIdx {
    fn new(i: usize) -> Self {
        NodeIdx(i as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

pub(crate) struct Node<K, V> {
    /// `Some` while the node is live in the table, `None` on the free list.
    pub(crate) entry: Option<(K, V)>,
    /// Free-list link while free; global-list link while live.
    pub(crate) next: Option<NodeIdx>,
    pub(crate) prev: Option<NodeIdx>,
    /// Bumped on every release so stale handles stop resolving, even when
    /// the slot is reused.
    pub(crate) generation: u32,
}

pub(crate) struct NodePool<K, V> {
    chunks: Vec<Box<[Node<K, V>]>>,
    free_head: Option<NodeIdx>,
}

impl<K, V> NodePool<K, V> {
    /// An empty pool. Performs no allocation; the first chunk is created on
    /// the first `acquire`.
    pub(crate) fn new() -> Self {
        Self {
            chunks: Vec::new(),
            free_head: None,
        }
    }

    pub(crate) fn node(&self, idx: NodeIdx) -> &Node<K, V> {
        &self.chunks[idx.index() / CHUNK_SIZE][idx.index() % CHUNK_SIZE]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<K, V> {
        &mut self.chunks[idx.index() / CHUNK_SIZE][idx.index() % CHUNK_SIZE]
    }

    /// Bounds-checked access, for resolving handles that may not have been
    /// minted by this pool's owner.
    pub(crate) fn get(&self, idx: NodeIdx) -> Option<&Node<K, V>> {
        self.chunks
            .get(idx.index() / CHUNK_SIZE)?
            .get(idx.index() % CHUNK_SIZE)
    }

    pub(crate) fn generation(&self, idx: NodeIdx) -> u32 {
        self.node(idx).generation
    }

    #[cfg(test)]
    pub(crate) fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Raw base pointer of every chunk, one `&mut` borrow per chunk. For
    /// mutable iteration, which must not re-borrow the whole pool between
    /// yields: each base stays a valid, mutually disjoint window over its
    /// chunk for as long as the caller's `&mut` borrow of the pool lasts.
    pub(crate) fn chunk_bases(&mut self) -> Vec<*mut Node<K, V>> {
        self.chunks.iter_mut().map(|c| c.as_mut_ptr()).collect()
    }

    /// Take a free node and populate it with `key`/`value`, links cleared.
    ///
    /// Growth triggers while two or more free nodes remain short, so the
    /// free list is never drained to empty by a pop; `release` can always
    /// push in front of an existing head.
    pub(crate) fn acquire(&mut self, key: K, value: V) -> NodeIdx {
        let grow = match self.free_head {
            Some(head) => self.node(head).next.is_none(),
            None => true,
        };
        if grow {
            self.add_chunk();
        }

        let idx = self
            .free_head
            .expect("free list is non-empty after chunk growth");
        let next = {
            let node = self.node_mut(idx);
            debug_assert!(node.entry.is_none(), "acquired node must be free");
            node.entry = Some((key, value));
            node.prev = None;
            node.next.take()
        };
        self.free_head = next;
        debug_assert!(self.free_head.is_some());
        idx
    }

    /// Return a node to the front of the free list, dropping its entry and
    /// invalidating outstanding handles to it. The node's stale `prev` link
    /// is cleared; `next` becomes the free-list link.
    pub(crate) fn release(&mut self, idx: NodeIdx) -> (K, V) {
        let free_head = self.free_head;
        let node = self.node_mut(idx);
        let entry = node.entry.take().expect("released node must be live");
        node.generation = node.generation.wrapping_add(1);
        node.prev = None;
        node.next = free_head;
        self.free_head = Some(idx);
        entry
    }

    /// Allocate one chunk, pre-thread its nodes into a free run in array
    /// order, and append the run to the free list. Growth only happens when
    /// at most one free node remains, so the current head is also the tail.
    fn add_chunk(&mut self) {
        let base = self.chunks.len() * CHUNK_SIZE;
        debug_assert!(base + CHUNK_SIZE <= u32::MAX as usize);

        let mut nodes = Vec::with_capacity(CHUNK_SIZE);
        for i in 0..CHUNK_SIZE {
            let next = if i + 1 < CHUNK_SIZE {
                Some(NodeIdx::new(base + i + 1))
            } else {
                None
            };
            nodes.push(Node {
                entry: None,
                next,
                prev: None,
                generation: 0,
            });
        }
        self.chunks.push(nodes.into_boxed_slice());

        let first = NodeIdx::new(base);
        match self.free_head {
            Some(head) => {
                let head_node = self.node_mut(head);
                debug_assert!(head_node.next.is_none(), "growth with >1 free node");
                head_node.next = Some(first);
            }
            None => self.free_head = Some(first),
        }
    }

    #[cfg(test)]
    fn free_len(&self) -> usize {
        let mut n = 0;
        let mut cur = self.free_head;
        while let Some(idx) = cur {
            n += 1;
            cur = self.node(idx).next;
        }
        n
    }
}
