//! Triangle mesh paired with its hierarchy.

use crate::bvh::{Bvh, BvhConfig, BvhHitInfo, SplitStrategy};
use crate::error::Result;
use crate::{Aabb, Ray, Triangle};

/// Owns a triangle list together with the [`Bvh`] built over it.
///
/// This is the usual entry point: it keeps the triangles and the hierarchy
/// in sync, so queries need only a ray.
///
/// ```ignore
/// use bvh_tree::{MeshBvh, Ray};
///
/// let mesh = MeshBvh::from_triangles(triangles);
/// if let Some(hit) = mesh.query(&ray) {
///     println!("hit triangle {} at {}", hit.triangle_index(), hit.distance());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MeshBvh {
    triangles: Vec<Triangle>,
    bvh: Bvh,
}

impl MeshBvh {
    /// Builds the hierarchy with the default config and split strategy.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let bvh = Bvh::build(&triangles);
        Self { triangles, bvh }
    }

    /// Builds the hierarchy with a custom config and split strategy.
    pub fn from_triangles_with<S: SplitStrategy + ?Sized>(
        triangles: Vec<Triangle>,
        config: &BvhConfig,
        strategy: &S,
    ) -> Self {
        let bvh = Bvh::build_with(&triangles, config, strategy);
        Self { triangles, bvh }
    }

    /// Returns the triangles, in the order hits refer to them.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the hierarchy built over the triangles.
    #[inline]
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Returns the box around the whole mesh (empty for an empty mesh).
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        self.bvh.root().bounds()
    }

    /// Returns the nearest hit of `ray`, if any.
    pub fn query(&self, ray: &Ray) -> Option<BvhHitInfo> {
        self.bvh.closest_hit(&self.triangles, ray)
    }

    /// Returns `true` if `ray` hits any triangle.
    pub fn query_any(&self, ray: &Ray) -> bool {
        self.bvh.any_hit(&self.triangles, ray)
    }

    /// Returns `true` if `ray` hits any triangle within `max_distance`.
    pub fn query_any_within(&self, ray: &Ray, max_distance: f32) -> bool {
        self.bvh.any_hit_within(&self.triangles, ray, max_distance)
    }

    /// Returns the sorted indices of triangles whose bounds overlap `query`.
    pub fn overlapping(&self, query: &Aabb) -> Vec<usize> {
        self.bvh.overlapping(&self.triangles, query)
    }

    /// Checks the hierarchy's structural invariants against the triangles.
    pub fn validate(&self) -> Result<()> {
        let bounds: Vec<Aabb> = self.triangles.iter().map(Triangle::bounds).collect();
        self.bvh.validate(&bounds)
    }
}
