//! BVH node implementation.

use std::ops::Range;

use crate::Aabb;

/// Estimated query cost of a node: squared box diagonal times primitive count.
///
/// Monotonic in both box size and primitive count, which is all the
/// split-or-leaf decision needs.
#[inline]
pub fn node_cost(bounds: &Aabb, count: usize) -> f32 {
    bounds.squared_diagonal() * count as f32
}

/// A node in the hierarchy, stored by index in a [`NodeArena`](super::NodeArena).
///
/// Every node owns the contiguous range `[start, start + length)` of the
/// primitive index array and a box enclosing all triangles in that range.
/// A node is either a leaf (no children) or internal (exactly two children);
/// a half-set state cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    /// Box enclosing every primitive in this node's range.
    bounds: Aabb,

    /// First slot of the range in the primitive index array.
    start: usize,

    /// Number of slots in the range.
    length: usize,

    /// Arena indices of the first and second child, for internal nodes.
    children: Option<[usize; 2]>,
}

impl BvhNode {
    /// Creates a leaf node over `[start, start + length)`.
    pub fn leaf(bounds: Aabb, start: usize, length: usize) -> Self {
        Self {
            bounds,
            start,
            length,
            children: None,
        }
    }

    /// Creates an internal node whose two children split `[start, start + length)`.
    pub fn internal(bounds: Aabb, start: usize, length: usize, first: usize, second: usize) -> Self {
        Self {
            bounds,
            start,
            length,
            children: Some([first, second]),
        }
    }

    /// Returns the box around every primitive in the node's range.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Returns the first slot of this node's range.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the number of primitives in this node's range.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// One past the last slot of this node's range.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Returns the node's range in the primitive index array.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Returns [`node_cost`] for this node's bounds and primitive count.
    #[inline]
    pub fn cost(&self) -> f32 {
        node_cost(&self.bounds, self.length)
    }

    /// Returns `true` if the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Returns both child indices, or `None` for a leaf.
    #[inline]
    pub fn children(&self) -> Option<[usize; 2]> {
        self.children
    }

    /// Returns the index of the first child, or `None` for a leaf.
    #[inline]
    pub fn first_child(&self) -> Option<usize> {
        self.children.map(|[first, _]| first)
    }

    /// Returns the index of the second child, or `None` for a leaf.
    #[inline]
    pub fn second_child(&self) -> Option<usize> {
        self.children.map(|[_, second]| second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn leaf_has_no_children() {
        let node = BvhNode::leaf(unit_box(), 3, 4);
        assert!(node.is_leaf());
        assert_eq!(node.children(), None);
        assert_eq!(node.first_child(), None);
        assert_eq!(node.second_child(), None);
        assert_eq!(node.end(), 7);
        assert_eq!(node.range(), 3..7);
    }

    #[test]
    fn internal_has_both_children() {
        let node = BvhNode::internal(unit_box(), 0, 8, 1, 5);
        assert!(!node.is_leaf());
        assert_eq!(node.first_child(), Some(1));
        assert_eq!(node.second_child(), Some(5));
    }

    #[test]
    fn cost_scales_with_count_and_size() {
        let node = BvhNode::leaf(unit_box(), 0, 2);
        assert_relative_eq!(node.cost(), 6.0);
        assert_eq!(node_cost(&Aabb::empty(), 0), 0.0);
    }
}
