//! Breadth-first projections of a [`BTree`](crate::BTree).
//!
//! A level is every node at one depth, visited left to right in queue order.
//! Keys are reported in node array order, so a level is sorted within each
//! node but not necessarily across node boundaries.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::arena::{NodeArena, NodeId};

/// One step of a breadth-first walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelEvent<'a, T> {
    /// A new level begins.
    Start,
    /// A key, in node order.
    Key(&'a T),
    /// The current level is complete.
    End,
}

/// Iterator over breadth-first levels, yielding the keys of each level.
///
/// Created by [`BTree::levels`](crate::BTree::levels).
pub struct Levels<'a, T> {
    nodes: &'a NodeArena<T>,
    queue: VecDeque<NodeId>,
}

impl<'a, T> Levels<'a, T> {
    pub(crate) fn new(nodes: &'a NodeArena<T>, root: Option<NodeId>) -> Self {
        Self {
            nodes,
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Levels<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.is_empty() {
            return None;
        }

        // The queue grows with the next level while this one drains.
        let level_size = self.queue.len();
        let mut keys = Vec::new();
        for _ in 0..level_size {
            let Some(id) = self.queue.pop_front() else {
                break;
            };
            let node = self.nodes.get(id);
            keys.extend(node.keys.iter());
            if !node.leaf {
                self.queue.extend(node.children.iter().copied());
            }
        }
        Some(keys)
    }
}

impl<T> FusedIterator for Levels<'_, T> {}

/// Flatten levels into `Start`, `Key`* and `End` events.
pub(crate) fn events<'a, T>(levels: Levels<'a, T>) -> impl Iterator<Item = LevelEvent<'a, T>> {
    levels.flat_map(|level| {
        std::iter::once(LevelEvent::Start)
            .chain(level.into_iter().map(LevelEvent::Key))
            .chain(std::iter::once(LevelEvent::End))
    })
}
