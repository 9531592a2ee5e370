//! Top-down hierarchy construction.
//!
//! Nodes are appended to the arena in pre-order, so the root is always at
//! index 0 and every child has a larger index than its parent. Each node
//! partitions its slice of the primitive index array in place; the array
//! stays a permutation of `0..n` throughout.

use log::{debug, log_enabled, trace, Level};

use crate::Aabb;

use super::arena::NodeArena;
use super::config::BvhConfig;
use super::node::{node_cost, BvhNode};
use super::split::{BuildPrimitive, SplitCandidate, SplitStrategy};

/// Builds the node arena and primitive index array for `primitives`.
///
/// Zero primitives yield a single empty leaf. The result is fully
/// determined by the input order, the config and the strategy.
pub(crate) fn build<S: SplitStrategy + ?Sized>(
    primitives: &[BuildPrimitive],
    config: &BvhConfig,
    strategy: &S,
) -> (NodeArena, Vec<usize>) {
    let mut builder = Builder {
        primitives,
        config,
        strategy,
        indices: (0..primitives.len()).collect(),
        nodes: NodeArena::new(),
        leaves: 0,
    };

    builder.build_node(0, primitives.len(), 0);
    builder.nodes.trim();

    if log_enabled!(Level::Debug) {
        debug!(
            "built BVH over {} primitives: {} nodes, {} leaves, depth {}",
            primitives.len(),
            builder.nodes.len(),
            builder.leaves,
            builder.nodes.depth()
        );
    }

    (builder.nodes, builder.indices)
}

struct Builder<'a, S: ?Sized> {
    primitives: &'a [BuildPrimitive],
    config: &'a BvhConfig,
    strategy: &'a S,
    indices: Vec<usize>,
    nodes: NodeArena,
    leaves: usize,
}

impl<S: SplitStrategy + ?Sized> Builder<'_, S> {
    /// Builds the subtree over `indices[start..end]` and returns its root index.
    fn build_node(&mut self, start: usize, end: usize, depth: usize) -> usize {
        let length = end - start;
        let (bounds, centroid_bounds) = self.range_bounds(start, end);

        // Reserve the slot now so that the arena stays in pre-order; it is
        // overwritten below if the node ends up internal.
        let index = self.nodes.add(BvhNode::leaf(bounds, start, length));

        if length <= self.config.min_leaf_size.max(1) {
            self.leaves += 1;
            return index;
        }

        if depth >= self.config.max_depth {
            trace!("depth limit reached, leaf of {} primitives at node {}", length, index);
            self.leaves += 1;
            return index;
        }

        let split = self.strategy.find_split(
            self.primitives,
            &self.indices[start..end],
            &centroid_bounds,
            self.config,
        );

        let split = match split {
            Some(split) if split.cost < node_cost(&bounds, length) => split,
            _ => {
                self.leaves += 1;
                return index;
            }
        };

        let mid = self.partition(start, end, &split);

        let first = self.build_node(start, mid, depth + 1);
        let second = self.build_node(mid, end, depth + 1);

        debug_assert_eq!(self.nodes.get(first).start(), start);
        debug_assert_eq!(self.nodes.get(first).end(), self.nodes.get(second).start());
        debug_assert_eq!(self.nodes.get(second).end(), end);

        *self.nodes.get_mut(index) = BvhNode::internal(bounds, start, length, first, second);
        index
    }

    /// Returns the union of primitive bounds and the box around their centroids.
    fn range_bounds(&self, start: usize, end: usize) -> (Aabb, Aabb) {
        self.indices[start..end].iter().fold(
            (Aabb::empty(), Aabb::empty()),
            |(bounds, centroids), &i| {
                let primitive = &self.primitives[i];
                (
                    bounds.join(primitive.bounds()),
                    centroids.grow(&primitive.centroid()),
                )
            },
        )
    }

    /// Partitions `indices[start..end]` by the split and returns the
    /// first index of the second half.
    ///
    /// Both halves are guaranteed non-empty: if the plane leaves one side
    /// empty, the range is sorted by centroid and cut in the middle.
    fn partition(&mut self, start: usize, end: usize, split: &SplitCandidate) -> usize {
        let primitives = self.primitives;
        let axis = split.axis;
        let slice = &mut self.indices[start..end];
        debug_assert!(slice.len() >= 2);

        let mut i = 0;
        let mut j = slice.len();
        while i < j {
            if split.goes_first(&primitives[slice[i]].centroid()) {
                i += 1;
            } else {
                j -= 1;
                slice.swap(i, j);
            }
        }

        if i == 0 || i == slice.len() {
            trace!("degenerate split on axis {} at {}, cutting at median", axis, split.position);

            slice.sort_by(|&a, &b| {
                primitives[a].centroid()[axis]
                    .total_cmp(&primitives[b].centroid()[axis])
                    .then(a.cmp(&b))
            });

            return start + slice.len() / 2;
        }

        start + i
    }
}
