//! Error types for hierarchy access and validation.
//!
//! Every variant describes a broken internal invariant: an out-of-range
//! index or a node whose range or bounds do not match its primitives.
//! Degenerate input (no triangles, zero-area triangles) is not an error.

use thiserror::Error;

/// Errors reported by checked arena access and [`Bvh::validate`](crate::Bvh::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BvhError {
    /// An arena or primitive-array index was outside `0..len`.
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the indexed storage.
        len: usize,
    },

    /// A node's `[start, start + length)` range breaks the partition invariant.
    #[error("node {node} has invalid range [{start}, {start} + {length}): {reason}")]
    InvalidRange {
        /// Arena index of the node.
        node: usize,
        /// First primitive slot of the range.
        start: usize,
        /// Number of primitive slots in the range.
        length: usize,
        /// Which part of the invariant failed.
        reason: &'static str,
    },

    /// A node's bounds do not contain the bounds of one of its primitives.
    #[error("node {node} does not contain primitive {primitive}")]
    UncontainedPrimitive {
        /// Arena index of the node.
        node: usize,
        /// Index of the primitive in the original triangle list.
        primitive: usize,
    },

    /// The primitive index array is missing or duplicating a primitive.
    #[error("primitive index array is not a permutation: primitive {primitive} is missing or repeated")]
    NotAPermutation {
        /// The primitive that is missing, repeated, or out of range.
        primitive: usize,
    },
}

/// Result type alias for hierarchy operations.
pub type Result<T> = std::result::Result<T, BvhError>;
