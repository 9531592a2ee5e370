//! Ray representation for hierarchy queries.

use nalgebra::{Point3, Vector3};

/// A half-line `origin + t * direction` for `t >= 0`.
///
/// The direction is normalized on construction, so the ray parameter `t`
/// is a Euclidean distance. The reciprocal direction is cached for the slab
/// test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3<f32>,
    direction: Vector3<f32>,
    inv_direction: Vector3<f32>,
}

impl Ray {
    /// Creates a new ray, normalizing `direction`.
    ///
    /// A zero-length direction is kept as-is. Such a ray never reports a hit
    /// because every intersection test fails its containment checks on the
    /// resulting infinities and NaNs.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let direction = direction.try_normalize(0.0).unwrap_or(direction);

        Self {
            origin,
            direction,
            inv_direction: direction.map(|d| 1.0 / d),
        }
    }

    /// Returns the origin of the ray.
    #[inline]
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    /// Returns the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    /// Returns the component-wise reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> Vector3<f32> {
        self.inv_direction
    }

    /// Returns the point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}
