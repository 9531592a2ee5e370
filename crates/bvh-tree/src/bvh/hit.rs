//! Ray query results.

use nalgebra::Point3;

use crate::Ray;

/// The nearest intersection found by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhHitInfo {
    distance: f32,
    triangle_index: usize,
}

impl BvhHitInfo {
    pub(crate) fn new(distance: f32, triangle_index: usize) -> Self {
        debug_assert!(distance >= 0.0);
        Self {
            distance,
            triangle_index,
        }
    }

    /// Ray parameter of the hit; a distance, since ray directions are unit length.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Index of the hit triangle in the list the hierarchy was built from.
    #[inline]
    pub fn triangle_index(&self) -> usize {
        self.triangle_index
    }

    /// Returns the hit point on `ray`, which must be the ray that was queried.
    #[inline]
    pub fn point(&self, ray: &Ray) -> Point3<f32> {
        ray.at(self.distance)
    }
}
