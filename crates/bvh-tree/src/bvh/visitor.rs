//! Visitor pattern for custom hierarchy traversals.
//!
//! Visitors let callers run their own culling logic (frustum tests, region
//! queries, statistics) over a finished hierarchy without re-deriving node
//! bounds or child links.

use crate::Aabb;

use super::node::BvhNode;

/// Visitor driven by [`Bvh::traverse`](crate::Bvh::traverse).
///
/// Traversal is depth-first, first child before second child.
pub trait BvhVisitor {
    /// Called for every reached node; return `false` to skip its subtree.
    fn enter(&mut self, node: &BvhNode) -> bool;

    /// Called for every entered leaf with the triangle indices it references.
    fn visit_leaf(&mut self, node: &BvhNode, primitives: &[usize]);
}

/// Collects the triangle indices of every leaf whose box overlaps a query box.
///
/// The result is a conservative candidate set: triangles whose own bounds
/// miss the query box may still be included.
#[derive(Debug)]
pub struct CollectingVisitor {
    query: Aabb,
    collected: Vec<usize>,
}

impl CollectingVisitor {
    /// Creates a visitor collecting leaves that overlap `query`.
    pub fn new(query: Aabb) -> Self {
        Self {
            query,
            collected: Vec::new(),
        }
    }

    /// Returns the collected triangle indices.
    pub fn into_primitives(self) -> Vec<usize> {
        self.collected
    }

    /// Returns a reference to the collected triangle indices.
    pub fn primitives(&self) -> &[usize] {
        &self.collected
    }
}

impl BvhVisitor for CollectingVisitor {
    fn enter(&mut self, node: &BvhNode) -> bool {
        node.bounds().intersects(&self.query)
    }

    fn visit_leaf(&mut self, _node: &BvhNode, primitives: &[usize]) {
        self.collected.extend_from_slice(primitives);
    }
}

/// A visitor built from two closures: a node filter and a leaf callback.
pub struct FnVisitor<E, L>
where
    E: FnMut(&BvhNode) -> bool,
    L: FnMut(&BvhNode, &[usize]),
{
    enter: E,
    leaf: L,
}

impl<E, L> FnVisitor<E, L>
where
    E: FnMut(&BvhNode) -> bool,
    L: FnMut(&BvhNode, &[usize]),
{
    /// Creates a new visitor from a node filter and a leaf callback.
    pub fn new(enter: E, leaf: L) -> Self {
        Self { enter, leaf }
    }
}

impl<E, L> BvhVisitor for FnVisitor<E, L>
where
    E: FnMut(&BvhNode) -> bool,
    L: FnMut(&BvhNode, &[usize]),
{
    fn enter(&mut self, node: &BvhNode) -> bool {
        (self.enter)(node)
    }

    fn visit_leaf(&mut self, node: &BvhNode, primitives: &[usize]) {
        (self.leaf)(node, primitives);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn collecting_visitor_empty() {
        let visitor = CollectingVisitor::new(unit_box());
        assert!(visitor.primitives().is_empty());
    }

    #[test]
    fn collecting_visitor_filters_by_box() {
        let mut visitor = CollectingVisitor::new(unit_box());

        let inside = BvhNode::leaf(unit_box(), 0, 2);
        let far = BvhNode::leaf(
            Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0)),
            2,
            1,
        );

        assert!(visitor.enter(&inside));
        assert!(!visitor.enter(&far));

        visitor.visit_leaf(&inside, &[4, 7]);
        assert_eq!(visitor.into_primitives(), vec![4, 7]);
    }

    #[test]
    fn fn_visitor_calls_closures() {
        let mut entered = 0;
        let mut seen = 0;
        {
            let mut visitor = FnVisitor::new(
                |_: &BvhNode| {
                    entered += 1;
                    true
                },
                |_: &BvhNode, primitives: &[usize]| seen += primitives.len(),
            );

            let node = BvhNode::leaf(unit_box(), 0, 3);
            assert!(visitor.enter(&node));
            visitor.visit_leaf(&node, &[0, 1, 2]);
        }
        assert_eq!(entered, 1);
        assert_eq!(seen, 3);
    }
}
