//! # mwtree
//!
//! An in-memory B-tree multiset with an injectable ordering and breadth-first
//! (level-order) traversal.
//!
//! Nodes live in an index-addressed arena. Insertion is iterative and splits
//! every full node on the way down, so the tree only grows at the root and all
//! leaves stay at the same depth. Duplicate keys are stored, not rejected.
//!
//! ## Example
//!
//! ```rust
//! use mwtree::BTree;
//!
//! let mut tree: BTree<u32> = BTree::new(2).unwrap();
//! tree.extend(0..10);
//!
//! let levels: Vec<Vec<u32>> = tree
//!     .levels()
//!     .map(|level| level.into_iter().copied().collect())
//!     .collect();
//! assert_eq!(levels, vec![vec![3], vec![1, 5, 7], vec![0, 2, 4, 6, 8, 9]]);
//! ```

mod arena;
mod compare;
mod config;
mod error;
mod level;

pub use compare::{Compare, Natural, Reverse};
pub use config::TreeConfig;
pub use error::{Result, TreeError};
pub use level::{LevelEvent, Levels};

use std::iter::FusedIterator;

use arena::{Node, NodeArena, NodeId};

/// Smallest minimum degree for which the node size bounds are meaningful.
pub const MIN_DEGREE: usize = 2;

// =============================================================================
// Tree
// =============================================================================

/// A B-tree of minimum degree `t` ordered by `C`.
///
/// - every node holds at most `2t-1` keys, every non-root node at least `t-1`
/// - internal nodes have exactly one more child than keys
/// - equal keys are kept as separate entries
#[derive(Clone)]
pub struct BTree<T, C = Natural> {
    nodes: NodeArena<T>,
    root: Option<NodeId>,
    min_degree: usize,
    /// `2t-1`, computed once by [`TreeConfig::max_keys`].
    max_keys: usize,
    cmp: C,
    len: usize,
    height: usize,
}

impl<T: Ord> BTree<T> {
    /// Empty tree ordered by [`Ord`].
    pub fn new(min_degree: usize) -> Result<Self> {
        Self::with_comparator(min_degree, Natural)
    }
}

impl<T, C: Compare<T>> BTree<T, C> {
    /// Empty tree ordered by `cmp`.
    pub fn with_comparator(min_degree: usize, cmp: C) -> Result<Self> {
        Self::with_config(TreeConfig::with_min_degree(min_degree), cmp)
    }

    pub fn with_config(config: TreeConfig, cmp: C) -> Result<Self> {
        let max_keys = match config.max_keys() {
            Ok(max_keys) => max_keys,
            Err(err) => {
                tracing::debug!(min_degree = config.min_degree, "rejected tree configuration");
                return Err(err);
            }
        };
        tracing::debug!(
            min_degree = config.min_degree,
            initial_node_capacity = config.initial_node_capacity,
            "created tree"
        );
        Ok(Self {
            nodes: NodeArena::with_capacity(config.initial_node_capacity),
            root: None,
            min_degree: config.min_degree,
            max_keys,
            cmp,
            len: 0,
            height: 0,
        })
    }

    /// Number of stored keys, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Number of levels; `0` for an empty tree.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Approximate heap footprint in bytes.
    pub fn memory_usage(&self) -> usize {
        self.nodes.memory_usage()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Drop every key and node, keeping the configuration.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.height = 0;
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Insert `key`, splitting full nodes on the way down.
    pub fn insert(&mut self, key: T) {
        let root = match self.root {
            Some(root) => root,
            None => {
                let mut leaf = Node::new(self.max_keys, true);
                leaf.keys.push(key);
                self.root = Some(self.nodes.alloc(leaf));
                self.len = 1;
                self.height = 1;
                return;
            }
        };

        let root = if self.nodes.get(root).is_full(self.max_keys) {
            self.grow_root(root)
        } else {
            root
        };

        self.insert_non_full(root, key);
        self.len += 1;
    }

    /// Put a new root above the full `old_root` and split it, so descent
    /// always starts from a node with room for one more key.
    fn grow_root(&mut self, old_root: NodeId) -> NodeId {
        let mut new_root = Node::new(self.max_keys, false);
        new_root.children.push(old_root);
        let new_root = self.nodes.alloc(new_root);
        self.root = Some(new_root);
        self.split_child(new_root, 0);
        self.height += 1;
        tracing::trace!(height = self.height, "grew root");
        new_root
    }

    /// Split the full child at `index` of `parent`.
    ///
    /// The child keeps its lower `t-1` keys (and `t` children), the median
    /// moves into `parent` at `index`, and a new sibling with the upper
    /// `t-1` keys (and `t` children) is linked at `index + 1`.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let t = self.min_degree;
        let full_id = self.nodes.get(parent).children[index];

        let full = self.nodes.get_mut(full_id);
        debug_assert!(full.is_full(self.max_keys), "split of a non-full node");
        let mut sibling = Node::new(self.max_keys, full.leaf);
        sibling.keys.extend(full.keys.drain(t..));
        let median = full.keys.remove(t - 1);
        if !full.leaf {
            sibling.children.extend(full.children.drain(t..));
        }

        let sibling = self.nodes.alloc(sibling);
        let parent = self.nodes.get_mut(parent);
        parent.keys.insert(index, median);
        parent.children.insert(index + 1, sibling);
        tracing::trace!(index, "split child");
    }

    fn insert_non_full(&mut self, start: NodeId, key: T) {
        let mut current = start;
        loop {
            let node = self.nodes.get(current);
            let mut pos = route(&self.cmp, &node.keys, &key);

            if node.leaf {
                self.nodes.get_mut(current).keys.insert(pos, key);
                return;
            }

            let child = node.children[pos];
            if self.nodes.get(child).is_full(self.max_keys) {
                self.split_child(current, pos);
                // The promoted median now sits at `pos`; keys above it go right.
                if self.cmp.lt(&self.nodes.get(current).keys[pos], &key) {
                    pos += 1;
                }
            }
            current = self.nodes.get(current).children[pos];
        }
    }

    /// Whether a key equivalent to `key` is stored.
    pub fn contains(&self, key: &T) -> bool {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.nodes.get(id);
            let pos = route(&self.cmp, &node.keys, key);
            if pos > 0 && self.cmp.equivalent(&node.keys[pos - 1], key) {
                return true;
            }
            current = (!node.leaf).then(|| node.children[pos]);
        }
        false
    }

    /// Number of stored keys equivalent to `key`.
    ///
    /// Only subtrees whose separator range can hold an equivalent key are
    /// visited, so the walk is one root-to-leaf path plus the run of equals.
    pub fn count(&self, key: &T) -> usize {
        let mut total = 0;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id);
            let lo = node.keys.partition_point(|k| self.cmp.lt(k, key));
            let hi = lo + node.keys[lo..].partition_point(|k| !self.cmp.lt(key, k));
            total += hi - lo;
            if !node.leaf {
                // children[lo..=hi] lie between separators bracketing `key`
                stack.extend(node.children[lo..=hi].iter().copied());
            }
        }
        total
    }

    /// Smallest key per the comparator.
    pub fn first(&self) -> Option<&T> {
        let mut id = self.root?;
        loop {
            let node = self.nodes.get(id);
            if node.leaf {
                return node.keys.first();
            }
            id = node.children[0];
        }
    }

    /// Largest key per the comparator.
    pub fn last(&self) -> Option<&T> {
        let mut id = self.root?;
        loop {
            let node = self.nodes.get(id);
            if node.leaf {
                return node.keys.last();
            }
            id = *node.children.last()?;
        }
    }
}

impl<T, C> BTree<T, C> {
    /// Keys in comparator order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::with_capacity(self.height),
            remaining: self.len,
        };
        if let Some(root) = self.root {
            iter.push_left_spine(root);
        }
        iter
    }

    /// Breadth-first levels, root first.
    pub fn levels(&self) -> Levels<'_, T> {
        Levels::new(&self.nodes, self.root)
    }

    /// Breadth-first walk as a flat stream of [`LevelEvent`]s.
    pub fn events(&self) -> impl Iterator<Item = LevelEvent<'_, T>> + '_ {
        level::events(self.levels())
    }

    /// Breadth-first walk driven through callbacks.
    ///
    /// `on_level_start` fires before a level's first key, `on_key` for every
    /// key in node order, and `on_level_end` after the level's last key.
    pub fn level_order_traversal<S, K, E>(
        &self,
        mut on_level_start: S,
        mut on_key: K,
        mut on_level_end: E,
    ) where
        S: FnMut(),
        K: FnMut(&T),
        E: FnMut(),
    {
        for event in self.events() {
            match event {
                LevelEvent::Start => on_level_start(),
                LevelEvent::Key(key) => on_key(key),
                LevelEvent::End => on_level_end(),
            }
        }
    }
}

/// Child index for `key`: scan from the right while `key` orders before the
/// separator, so equal keys route right of their equals.
#[inline]
fn route<T, C: Compare<T>>(cmp: &C, keys: &[T], key: &T) -> usize {
    let mut pos = keys.len();
    while pos > 0 && cmp.lt(key, &keys[pos - 1]) {
        pos -= 1;
    }
    pos
}

impl<T, C: Compare<T>> Extend<T> for BTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for BTree<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a BTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// In-order iterator
// =============================================================================

/// In-order iterator created by [`BTree::iter`].
pub struct Iter<'a, T> {
    nodes: &'a NodeArena<T>,
    /// (node, index of the next key to yield)
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

impl<T> Iter<'_, T> {
    fn push_left_spine(&mut self, mut id: NodeId) {
        loop {
            self.stack.push((id, 0));
            let node = self.nodes.get(id);
            if node.leaf {
                return;
            }
            id = node.children[0];
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, idx)) = self.stack.pop() {
            let nodes = self.nodes;
            let node = nodes.get(id);
            if idx >= node.keys.len() {
                continue;
            }
            self.stack.push((id, idx + 1));
            if !node.leaf {
                self.push_left_spine(node.children[idx + 1]);
            }
            self.remaining -= 1;
            return Some(&node.keys[idx]);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}


#[cfg(test)]
mod proptests;
