//! BVH container, construction entry points and validation.

use crate::error::{BvhError, Result};
use crate::{Aabb, Triangle};

use super::arena::NodeArena;
use super::builder;
use super::config::BvhConfig;
use super::node::BvhNode;
use super::split::{BinnedSah, BuildPrimitive, SplitStrategy};

/// A Bounding Volume Hierarchy over a list of triangles.
///
/// The hierarchy is two flat arrays: a [`NodeArena`] of nodes linked by
/// index, and a permutation of triangle indices. Each node references a
/// contiguous range of that permutation. Triangles themselves are not
/// stored; queries take the same triangle slice the hierarchy was built
/// from (see [`MeshBvh`](crate::MeshBvh) for an owning wrapper).
///
/// # Construction
///
/// ```ignore
/// use bvh_tree::{Bvh, BvhConfig, CentroidMedian};
///
/// let bvh = Bvh::build(&triangles);
/// let bvh = Bvh::build_with(&triangles, &BvhConfig::default(), &CentroidMedian);
/// ```
///
/// A finished hierarchy is immutable, so queries can run concurrently from
/// any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Bvh {
    nodes: NodeArena,
    indices: Vec<usize>,
}

impl Bvh {
    /// Builds a hierarchy over `triangles` with the default config and [`BinnedSah`].
    pub fn build(triangles: &[Triangle]) -> Self {
        Self::build_with(triangles, &BvhConfig::default(), &BinnedSah)
    }

    /// Builds a hierarchy over `triangles` with a custom config and split strategy.
    pub fn build_with<S: SplitStrategy + ?Sized>(
        triangles: &[Triangle],
        config: &BvhConfig,
        strategy: &S,
    ) -> Self {
        let primitives: Vec<BuildPrimitive> =
            triangles.iter().map(BuildPrimitive::from_triangle).collect();
        Self::from_primitives(&primitives, config, strategy)
    }

    /// Builds a hierarchy from precomputed per-triangle bounding boxes.
    ///
    /// Box centers stand in for triangle centroids.
    pub fn from_bounds(bounds: &[Aabb]) -> Self {
        Self::from_bounds_with(bounds, &BvhConfig::default(), &BinnedSah)
    }

    /// Builds a hierarchy from per-triangle boxes with a custom config and
    /// split strategy.
    pub fn from_bounds_with<S: SplitStrategy + ?Sized>(
        bounds: &[Aabb],
        config: &BvhConfig,
        strategy: &S,
    ) -> Self {
        let primitives: Vec<BuildPrimitive> =
            bounds.iter().copied().map(BuildPrimitive::from_bounds).collect();
        Self::from_primitives(&primitives, config, strategy)
    }

    /// Builds a hierarchy from fully prepared build primitives.
    pub fn from_primitives<S: SplitStrategy + ?Sized>(
        primitives: &[BuildPrimitive],
        config: &BvhConfig,
        strategy: &S,
    ) -> Self {
        let (nodes, indices) = builder::build(primitives, config, strategy);
        Self { nodes, indices }
    }

    /// Returns `true` if the hierarchy indexes no primitives.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of indexed primitives.
    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the root node (always at index 0).
    #[inline]
    pub fn root(&self) -> &BvhNode {
        self.nodes.get(0)
    }

    /// Returns the number of nodes in the arena.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    /// Panics if `index >= node_count()`.
    #[inline]
    pub fn node(&self, index: usize) -> &BvhNode {
        self.nodes.get(index)
    }

    /// Returns the node arena for custom traversals.
    #[inline]
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    /// Returns the primitive index array that node ranges refer to.
    #[inline]
    pub fn primitive_indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the triangle indices referenced by `node`.
    #[inline]
    pub fn node_primitives(&self, node: &BvhNode) -> &[usize] {
        &self.indices[node.range()]
    }

    /// Returns the number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of levels in the tree (1 for a single leaf).
    #[inline]
    pub fn depth(&self) -> usize {
        self.nodes.depth()
    }

    /// Checks every structural invariant against per-primitive bounds.
    ///
    /// Verifies that the index array is a permutation of
    /// `0..primitive_bounds.len()`, that the root covers it, that children
    /// split their parent's range exactly and follow it in the arena, and
    /// that every node's box contains the boxes of its primitives.
    pub fn validate(&self, primitive_bounds: &[Aabb]) -> Result<()> {
        let count = primitive_bounds.len();

        let root = self.nodes.try_get(0)?;
        if root.start() != 0 || root.length() != count {
            return Err(BvhError::InvalidRange {
                node: 0,
                start: root.start(),
                length: root.length(),
                reason: "root does not cover every primitive",
            });
        }

        let mut seen = vec![false; count];
        for &primitive in &self.indices {
            match seen.get_mut(primitive) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(BvhError::NotAPermutation { primitive }),
            }
        }
        if let Some(primitive) = seen.iter().position(|&s| !s) {
            return Err(BvhError::NotAPermutation { primitive });
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let invalid = |reason| BvhError::InvalidRange {
                node: index,
                start: node.start(),
                length: node.length(),
                reason,
            };

            if node.end() > self.indices.len() {
                return Err(invalid("range exceeds primitive index array"));
            }

            for &primitive in &self.indices[node.range()] {
                if !node.bounds().contains_box(&primitive_bounds[primitive]) {
                    return Err(BvhError::UncontainedPrimitive {
                        node: index,
                        primitive,
                    });
                }
            }

            if let Some([first, second]) = node.children() {
                if first <= index || second <= index {
                    return Err(invalid("child does not follow its parent"));
                }

                let first = self.nodes.try_get(first)?;
                let second = self.nodes.try_get(second)?;

                if first.start() != node.start() || second.end() != node.end() {
                    return Err(invalid("children do not span the parent range"));
                }
                if first.end() != second.start() {
                    return Err(invalid("children ranges are not contiguous"));
                }
            }
        }

        Ok(())
    }
}
