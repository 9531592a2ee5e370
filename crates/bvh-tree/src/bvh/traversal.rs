//! Ray and box queries over a finished hierarchy.
//!
//! All traversals use an explicit stack, so query cost is bounded by tree
//! depth rather than by the call stack.

use crate::{Aabb, Ray, Triangle};

use super::hit::BvhHitInfo;
use super::tree::Bvh;
use super::visitor::{BvhVisitor, CollectingVisitor};

/// Initial traversal stack capacity; grows if the tree is deeper.
const STACK_CAPACITY: usize = 64;

/// Relative slack on the best distance when pruning boxes. The slab test
/// and the triangle test round differently, so a triangle on a box face can
/// report a distance slightly before the box's computed entry.
const PRUNE_SLACK: f32 = 1.0 + 1e-5;

impl Bvh {
    /// Returns the nearest hit of `ray` among `triangles`, if any.
    ///
    /// `triangles` must be the slice the hierarchy was built from. The
    /// result equals an exhaustive scan over all triangles: subtrees are
    /// only pruned when their box is entered beyond the best hit so far.
    /// Children are visited nearest-box-first to tighten that bound early.
    pub fn closest_hit(&self, triangles: &[Triangle], ray: &Ray) -> Option<BvhHitInfo> {
        debug_assert_eq!(triangles.len(), self.primitive_count());

        let mut best: Option<BvhHitInfo> = None;
        let mut t_best = f32::INFINITY;

        let mut stack: Vec<(usize, f32)> = Vec::with_capacity(STACK_CAPACITY);
        if let Some((t_near, _)) = self.root().bounds().intersect_ray(ray, t_best) {
            stack.push((0, t_near));
        }

        while let Some((index, t_near)) = stack.pop() {
            // The best hit may have improved since this entry was pushed.
            if t_near > t_best * PRUNE_SLACK {
                continue;
            }

            let node = self.node(index);
            match node.children() {
                None => {
                    for &triangle in self.node_primitives(node) {
                        if let Some(t) = triangles[triangle].intersect_ray(ray) {
                            if t < t_best {
                                t_best = t;
                                best = Some(BvhHitInfo::new(t, triangle));
                            }
                        }
                    }
                }
                Some([first, second]) => {
                    let enter = |child: usize| {
                        self.node(child)
                            .bounds()
                            .intersect_ray(ray, t_best * PRUNE_SLACK)
                            .map(|(t, _)| (child, t))
                    };

                    match (enter(first), enter(second)) {
                        (Some(a), Some(b)) => {
                            // Push the farther child first so the nearer one pops next.
                            let (near, far) = if b.1 < a.1 { (b, a) } else { (a, b) };
                            stack.push(far);
                            stack.push(near);
                        }
                        (Some(child), None) | (None, Some(child)) => stack.push(child),
                        (None, None) => {}
                    }
                }
            }
        }

        best
    }

    /// Returns `true` if `ray` hits any triangle.
    pub fn any_hit(&self, triangles: &[Triangle], ray: &Ray) -> bool {
        self.any_hit_within(triangles, ray, f32::INFINITY)
    }

    /// Returns `true` if `ray` hits any triangle at a distance of at most
    /// `max_distance`. Stops at the first such hit.
    pub fn any_hit_within(&self, triangles: &[Triangle], ray: &Ray, max_distance: f32) -> bool {
        debug_assert_eq!(triangles.len(), self.primitive_count());

        let mut stack: Vec<usize> = Vec::with_capacity(STACK_CAPACITY);
        stack.push(0);

        while let Some(index) = stack.pop() {
            let node = self.node(index);
            if node.bounds().intersect_ray(ray, max_distance).is_none() {
                continue;
            }

            match node.children() {
                None => {
                    let hit = self.node_primitives(node).iter().any(|&triangle| {
                        triangles[triangle]
                            .intersect_ray(ray)
                            .is_some_and(|t| t <= max_distance)
                    });
                    if hit {
                        return true;
                    }
                }
                Some([first, second]) => {
                    stack.push(second);
                    stack.push(first);
                }
            }
        }

        false
    }

    /// Returns the indices of all triangles whose bounds overlap `query`,
    /// in ascending order.
    pub fn overlapping(&self, triangles: &[Triangle], query: &Aabb) -> Vec<usize> {
        let mut visitor = CollectingVisitor::new(*query);
        self.traverse(&mut visitor);

        let mut found: Vec<usize> = visitor
            .into_primitives()
            .into_iter()
            .filter(|&triangle| triangles[triangle].bounds().intersects(query))
            .collect();
        found.sort_unstable();
        found
    }

    /// Walks the hierarchy depth-first, first child before second, asking
    /// `visitor` whether to descend into each node.
    pub fn traverse<V: BvhVisitor + ?Sized>(&self, visitor: &mut V) {
        let mut stack: Vec<usize> = Vec::with_capacity(STACK_CAPACITY);
        stack.push(0);

        while let Some(index) = stack.pop() {
            let node = self.node(index);
            if !visitor.enter(node) {
                continue;
            }

            match node.children() {
                None => visitor.visit_leaf(node, self.node_primitives(node)),
                Some([first, second]) => {
                    stack.push(second);
                    stack.push(first);
                }
            }
        }
    }
}
