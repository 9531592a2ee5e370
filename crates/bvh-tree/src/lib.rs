//! BVH (Bounding Volume Hierarchy) implementation for triangle meshes.

mod aabb;
pub mod bvh;
mod error;
mod mesh;
mod ray;
mod triangle;

pub use aabb::Aabb;
pub use bvh::{
    BinnedSah, Bvh, BvhConfig, BvhHitInfo, BvhNode, BvhVisitor, CentroidMedian, CollectingVisitor,
    FnVisitor, NodeArena, SplitStrategy,
};
pub use error::{BvhError, Result};
pub use mesh::MeshBvh;
pub use ray::Ray;
pub use triangle::{Triangle, PARALLEL_EPSILON};
