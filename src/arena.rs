//! Index-addressed node storage.
//!
//! Nodes are appended to a single `Vec` and referenced by [`NodeId`]. The tree
//! never deletes keys, so slots are never recycled; dropping the arena drops
//! every node at once without recursion.

// =============================================================================
// Node id
// =============================================================================

/// 32-bit index into a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Node
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    /// Sorted per the tree comparator; at most `2t-1` entries.
    pub(crate) keys: Vec<T>,
    /// Empty for leaves, otherwise `keys.len() + 1` entries.
    pub(crate) children: Vec<NodeId>,
    pub(crate) leaf: bool,
}

/// Upper bound on the key slots reserved when a node is created; larger
/// nodes grow on demand.
const MAX_PREALLOC_KEYS: usize = 64;

impl<T> Node<T> {
    /// Empty node for a tree holding at most `max_keys` keys per node.
    pub(crate) fn new(max_keys: usize, leaf: bool) -> Self {
        let reserve = max_keys.min(MAX_PREALLOC_KEYS);
        Self {
            keys: Vec::with_capacity(reserve),
            children: if leaf {
                Vec::new()
            } else {
                Vec::with_capacity(reserve + 1)
            },
            leaf,
        }
    }

    #[inline]
    pub(crate) fn is_full(&self, max_keys: usize) -> bool {
        self.keys.len() == max_keys
    }
}

// =============================================================================
// Arena
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    nodes: Vec<Node<T>>,
}

impl<T> NodeArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        let idx = self.nodes.len();
        assert!(idx < u32::MAX as usize, "node arena overflow");
        self.nodes.push(node);
        NodeId(idx as u32)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Heap bytes held by the slot vector and every node's buffers.
    pub(crate) fn memory_usage(&self) -> usize {
        self.capacity() * std::mem::size_of::<Node<T>>()
            + self
                .nodes
                .iter()
                .map(|n| {
                    n.keys.capacity() * std::mem::size_of::<T>()
                        + n.children.capacity() * std::mem::size_of::<NodeId>()
                })
                .sum::<usize>()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        for node in &mut self.nodes {
            node.keys.shrink_to_fit();
            node.children.shrink_to_fit();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }
}
