//! Append-only, index-addressed node storage.

use std::ops::Index;

use log::trace;

use crate::error::{BvhError, Result};

use super::node::BvhNode;

/// Capacity reserved by the first insertion into an empty arena.
const INITIAL_CAPACITY: usize = 16;

/// Growable store of [`BvhNode`]s addressed by `usize` indices.
///
/// Nodes are only ever appended; an index returned by [`add`](Self::add)
/// stays valid and keeps referring to the same node for the lifetime of the
/// arena. The backing storage may move when it grows, so callers hold
/// indices, never references, across insertions.
///
/// Capacity doubles whenever the arena is full, giving amortized O(1)
/// insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeArena {
    nodes: Vec<BvhNode>,
}

impl NodeArena {
    /// Creates an empty arena without allocating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty arena able to hold `capacity` nodes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Appends a node and returns its index.
    pub fn add(&mut self, node: BvhNode) -> usize {
        let index = self.nodes.len();

        if index == self.nodes.capacity() {
            let additional = index.max(INITIAL_CAPACITY);
            trace!("growing node arena from {} to {} nodes", index, index + additional);
            self.nodes.reserve_exact(additional);
        }

        self.nodes.push(node);
        index
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds; a bad node index means the
    /// hierarchy is corrupt.
    #[inline]
    pub fn get(&self, index: usize) -> &BvhNode {
        match self.try_get(index) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns the node at `index`, or [`BvhError::IndexOutOfBounds`].
    #[inline]
    pub fn try_get(&self, index: usize) -> Result<&BvhNode> {
        self.nodes.get(index).ok_or(BvhError::IndexOutOfBounds {
            index,
            len: self.nodes.len(),
        })
    }

    /// Returns the node at `index` for in-place update during construction.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut BvhNode {
        let len = self.nodes.len();
        match self.nodes.get_mut(index) {
            Some(node) => node,
            None => panic!("{}", BvhError::IndexOutOfBounds { index, len }),
        }
    }

    /// Shrinks the backing storage to the number of stored nodes.
    ///
    /// Indices and node values are unchanged.
    pub fn trim(&mut self) {
        if self.nodes.capacity() != self.nodes.len() {
            self.nodes.shrink_to_fit();
        }
    }

    /// Returns the number of stored nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been added yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of nodes the arena can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns all nodes in index order.
    #[inline]
    pub fn as_slice(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Iterates over all nodes in index order.
    pub fn iter(&self) -> impl Iterator<Item = &BvhNode> {
        self.nodes.iter()
    }

    /// Returns the number of levels below and including the root at index 0
    /// (1 for a single leaf, 0 for an empty arena).
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0;
        let mut stack = vec![(0, 1)];

        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some([first, second]) = self.get(index).children() {
                stack.push((first, depth + 1));
                stack.push((second, depth + 1));
            }
        }

        max_depth
    }
}

impl Index<usize> for NodeArena {
    type Output = BvhNode;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
    }
}
