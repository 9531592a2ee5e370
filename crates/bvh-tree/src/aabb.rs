//! Axis-aligned bounding boxes.

use nalgebra::{Point3, Vector3};

use crate::Ray;

/// Relative padding applied to the far slab distance.
///
/// Three roundings happen per slab (subtract, multiply, compare), so the far
/// distance is widened by `2 * gamma(3)` to keep rays that graze flat boxes
/// from being rejected.
const SLAB_PADDING: f32 = 1.0 + 2.0 * gamma(3);

const fn gamma(n: u32) -> f32 {
    let e = n as f32 * (f32::EPSILON * 0.5);
    e / (1.0 - e)
}

/// An axis-aligned bounding box in 3D space.
///
/// The empty box has `min = +inf` and `max = -inf` on every axis, so that
/// growing it by any point or box yields exactly that point or box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Point3<f32>,
    max: Point3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// The empty box, which contains nothing and is hit by no ray.
    pub const EMPTY: Self = Self {
        min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Creates a box from its two corners.
    ///
    /// The corners are taken component-wise, so their order does not matter.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Returns [`Aabb::EMPTY`].
    #[inline]
    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Creates the tightest box around the given points.
    ///
    /// Returns the empty box if there are no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Self {
        points.into_iter().fold(Self::empty(), |aabb, p| aabb.grow(p))
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min(&self) -> Point3<f32> {
        self.min
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max(&self) -> Point3<f32> {
        self.max
    }

    /// Returns `true` if the box contains no points at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns this box grown to include `point`.
    #[inline]
    pub fn grow(&self, point: &Point3<f32>) -> Self {
        Self {
            min: self.min.inf(point),
            max: self.max.sup(point),
        }
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[inline]
    pub fn join(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Extends this box in place to also cover `other`.
    #[inline]
    pub fn join_mut(&mut self, other: &Self) {
        *self = self.join(other);
    }

    /// Returns the extent of the box along each axis (zero for the empty box).
    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Squared length of the box diagonal; the box term of the node cost.
    #[inline]
    pub fn squared_diagonal(&self) -> f32 {
        self.size().norm_squared()
    }

    /// Returns the total area of the six faces.
    pub fn surface_area(&self) -> f32 {
        let e = self.size();
        2.0 * (e.x * e.y + e.x * e.z + e.y * e.z)
    }

    /// Returns the axis (0, 1 or 2) along which the box is longest.
    ///
    /// Ties resolve to the lower axis.
    pub fn largest_axis(&self) -> usize {
        let e = self.size();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Returns `true` if `point` lies inside the box or on its boundary.
    pub fn contains_point(&self, point: &Point3<f32>) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }

    /// Returns `true` if `other` lies entirely inside this box.
    ///
    /// The empty box is contained in every box.
    pub fn contains_box(&self, other: &Self) -> bool {
        other.is_empty()
            || (0..3).all(|axis| self.min[axis] <= other.min[axis] && other.max[axis] <= self.max[axis])
    }

    /// Returns `true` if the two boxes overlap (touching counts).
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    /// Intersects a ray with this box using the slab method.
    ///
    /// Returns the parametric interval `(t_near, t_far)` where the ray is
    /// inside the box, clipped to `[0, t_max]`, or `None` on a miss.
    ///
    /// A ray lying exactly in one of the slab planes produces NaN bounds for
    /// that axis; that axis is skipped, so such a ray is treated as inside
    /// the slab.
    pub fn intersect_ray(&self, ray: &Ray, t_max: f32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }

        let origin = ray.origin();
        let inv = ray.inv_direction();

        let mut t_near = 0.0_f32;
        let mut t_far = t_max;

        for axis in 0..3 {
            let t0 = (self.min[axis] - origin[axis]) * inv[axis];
            let t1 = (self.max[axis] - origin[axis]) * inv[axis];

            if t0.is_nan() || t1.is_nan() {
                continue;
            }

            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1) * SLAB_PADDING);
        }

        (t_near <= t_far).then_some((t_near, t_far))
    }
}
