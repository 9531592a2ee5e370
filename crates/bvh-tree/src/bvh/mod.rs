//! Bounding Volume Hierarchy over triangle meshes.
//!
//! This module provides a BVH that indexes triangles by recursively
//! splitting them into boxes. The hierarchy enables:
//!
//! - Nearest-hit ray queries with ordered, pruned descent
//! - Any-hit (occlusion) ray queries
//! - Box overlap queries and custom visitor traversals
//!
//! # Example
//!
//! ```ignore
//! use bvh_tree::{Bvh, Ray, Triangle};
//! use nalgebra::{Point3, Vector3};
//!
//! let triangles: Vec<Triangle> = /* create triangles */;
//! let bvh = Bvh::build(&triangles);
//!
//! let ray = Ray::new(Point3::new(0.2, 0.2, 5.0), Vector3::new(0.0, 0.0, -1.0));
//! if let Some(hit) = bvh.closest_hit(&triangles, &ray) {
//!     println!("triangle {} at distance {}", hit.triangle_index(), hit.distance());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Bvh`]: The container holding the node arena and primitive index array
//! - [`NodeArena`]: Append-only node storage addressed by index
//! - [`BvhNode`]: A box plus a range of the primitive index array, and
//!   optionally two children
//! - [`SplitStrategy`]: Strategy trait for choosing split planes
//! - [`BvhVisitor`]: Visitor trait for custom traversal behavior

mod arena;
mod builder;
mod config;
mod hit;
mod node;
mod split;
mod traversal;
mod tree;
mod visitor;

// Re-export main types
pub use arena::NodeArena;
pub use config::BvhConfig;
pub use hit::BvhHitInfo;
pub use node::{node_cost, BvhNode};
pub use split::{BinnedSah, BuildPrimitive, CentroidMedian, SplitCandidate, SplitStrategy};
pub use tree::Bvh;
pub use visitor::{BvhVisitor, CollectingVisitor, FnVisitor};
