//! Triangle primitive indexed by the hierarchy.

use nalgebra::{Point3, Vector3};

use crate::{Aabb, Ray};

/// Relative threshold below which a ray is considered parallel to a triangle.
///
/// Compared against `|det| / (|e1| * |e2|)`, i.e. the sine-like quantity of
/// the Möller–Trumbore determinant, so it does not depend on triangle scale.
pub const PARALLEL_EPSILON: f32 = 1e-7;

/// Rounding allowance, in units of `f32::EPSILON`, under which the edge
/// cross product of a triangle is indistinguishable from zero.
const DEGENERATE_ULPS: f32 = 8.0;

/// A triangle in 3D space, defined by three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the normal direction via the right-hand rule:
    /// normal = (b - a) × (c - a)
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    ///
    /// Its length is twice the triangle's area.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        let ab = b - a;
        let ac = c - a;
        ab.cross(&ac)
    }

    /// Computes the unit normal vector of the triangle.
    ///
    /// Returns `None` if the triangle is [degenerate](Self::is_degenerate).
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.normal().normalize())
    }

    /// Returns `true` if the vertices are collinear up to `f32` rounding.
    ///
    /// Rounding a vertex moves it by up to an ulp of the largest coordinate,
    /// which tilts each edge by that much; the edge cross product of truly
    /// collinear input therefore stays below
    /// `DEGENERATE_ULPS * EPSILON * max|coord| * (|e1| + |e2|)`.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = &self.vertices;
        let e1 = b - a;
        let e2 = c - a;
        let magnitude = a.coords.amax().max(b.coords.amax()).max(c.coords.amax());
        let tolerance = DEGENERATE_ULPS * f32::EPSILON * magnitude * (e1.norm() + e2.norm());

        // Negated so that NaN vertices count as degenerate.
        !(e1.cross(&e2).norm() > tolerance)
    }

    /// Returns the triangle's area.
    pub fn area(&self) -> f32 {
        self.normal().norm() * 0.5
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Returns the tightest axis-aligned box around the triangle.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Intersects a ray with this triangle (Möller–Trumbore).
    ///
    /// Returns the ray parameter `t >= 0` of the hit point. Edges and
    /// vertices count as inside. Rays parallel to the triangle's plane,
    /// degenerate triangles and NaN-producing rays never hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }

        let [a, b, c] = &self.vertices;
        let e1 = b - a;
        let e2 = c - a;
        let dir = ray.direction();

        let p = dir.cross(&e2);
        let det = e1.dot(&p);

        // Negated so that a NaN determinant is rejected as well.
        if !(det.abs() > PARALLEL_EPSILON * e1.norm() * e2.norm()) {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - a;

        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&e1);
        let v = dir.dot(&q) * inv_det;
        if !(v >= 0.0 && u + v <= 1.0) {
            return None;
        }

        let t = e2.dot(&q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}
