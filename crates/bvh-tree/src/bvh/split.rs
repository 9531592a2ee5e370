//! Split selection strategies for hierarchy construction.
//!
//! The choice of split plane affects traversal cost but never correctness:
//! the builder falls back to a median cut whenever a chosen plane fails to
//! separate the primitives, and rejects any split whose cost does not beat
//! keeping the node as a leaf.

use nalgebra::Point3;

use crate::{Aabb, Triangle};

use super::config::BvhConfig;
use super::node::node_cost;

/// Per-primitive data the builder works from, computed once up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildPrimitive {
    bounds: Aabb,
    centroid: Point3<f32>,
}

impl BuildPrimitive {
    /// Creates a build primitive from a box and a representative point.
    pub fn new(bounds: Aabb, centroid: Point3<f32>) -> Self {
        Self { bounds, centroid }
    }

    /// Uses the triangle's bounds and vertex centroid.
    pub fn from_triangle(triangle: &Triangle) -> Self {
        Self::new(triangle.bounds(), triangle.centroid())
    }

    /// Uses the box and its center, for callers that only have bounds.
    pub fn from_bounds(bounds: Aabb) -> Self {
        Self::new(bounds, bounds.center())
    }

    /// Returns the primitive's bounding box.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Returns the point used to bin and partition the primitive.
    #[inline]
    pub fn centroid(&self) -> Point3<f32> {
        self.centroid
    }
}

/// A proposed split of a node's primitives along one axis.
///
/// [`goes_first`](Self::goes_first) decides which child each primitive
/// lands in. For candidates built with [`new`](Self::new) that is a plain
/// `centroid[axis] < position` test; candidates from [`BinnedSah`] instead
/// reuse the exact bin assignment their cost was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    /// Axis (0, 1 or 2) the split plane is perpendicular to.
    pub axis: usize,
    /// Coordinate of the split plane on `axis`.
    pub position: f32,
    /// Sum of the two children's [`node_cost`].
    pub cost: f32,
    boundary: Option<BinBoundary>,
}

impl SplitCandidate {
    /// Creates a candidate that sends centroids below `position` on `axis`
    /// to the first child.
    pub fn new(axis: usize, position: f32, cost: f32) -> Self {
        Self {
            axis,
            position,
            cost,
            boundary: None,
        }
    }

    /// Returns `true` if a primitive with this centroid belongs to the
    /// first child.
    #[inline]
    pub fn goes_first(&self, centroid: &Point3<f32>) -> bool {
        let coord = centroid[self.axis];
        match &self.boundary {
            Some(boundary) => boundary.bin_of(coord) < boundary.first_right,
            None => coord < self.position,
        }
    }
}

/// Equal-width centroid bins on one axis, and the first bin of the right side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BinBoundary {
    min: f32,
    scale: f32,
    last: usize,
    first_right: usize,
}

impl BinBoundary {
    #[inline]
    fn bin_of(&self, coord: f32) -> usize {
        (((coord - self.min) * self.scale) as usize).min(self.last)
    }
}

/// Strategy for choosing where to split a node's primitive range.
pub trait SplitStrategy {
    /// Proposes a split for the primitives referenced by `indices`.
    ///
    /// `centroid_bounds` is the box around their centroids. Returns `None`
    /// when no candidate puts primitives on both sides. Must be
    /// deterministic for identical input.
    fn find_split(
        &self,
        primitives: &[BuildPrimitive],
        indices: &[usize],
        centroid_bounds: &Aabb,
        config: &BvhConfig,
    ) -> Option<SplitCandidate>;
}

/// Binned surface-area-style heuristic, the default strategy.
///
/// On each axis the centroid extent is cut into `bin_count` equal bins and
/// every bin boundary is scored with `cost(left) + cost(right)`. The
/// cheapest boundary over all three axes wins; ties keep the lower axis and
/// the lower boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinnedSah;

#[derive(Debug, Clone, Copy)]
struct Bin {
    bounds: Aabb,
    count: usize,
}

impl Bin {
    const EMPTY: Self = Self {
        bounds: Aabb::EMPTY,
        count: 0,
    };

    fn add(&mut self, bounds: &Aabb, count: usize) {
        self.bounds.join_mut(bounds);
        self.count += count;
    }

    fn cost(&self) -> f32 {
        node_cost(&self.bounds, self.count)
    }
}

impl SplitStrategy for BinnedSah {
    fn find_split(
        &self,
        primitives: &[BuildPrimitive],
        indices: &[usize],
        centroid_bounds: &Aabb,
        config: &BvhConfig,
    ) -> Option<SplitCandidate> {
        let bin_count = config.bin_count.clamp(BvhConfig::MIN_BINS, BvhConfig::MAX_BINS);
        let mut best: Option<SplitCandidate> = None;

        for axis in 0..3 {
            let min = centroid_bounds.min()[axis];
            let extent = centroid_bounds.max()[axis] - min;
            if !(extent > 0.0) {
                continue;
            }

            let grid = BinBoundary {
                min,
                scale: bin_count as f32 / extent,
                last: bin_count - 1,
                first_right: 0,
            };
            let mut bins = [Bin::EMPTY; BvhConfig::MAX_BINS];

            for &index in indices {
                let primitive = &primitives[index];
                bins[grid.bin_of(primitive.centroid[axis])].add(&primitive.bounds, 1);
            }

            // suffix[b] covers bins b..bin_count
            let mut suffix = [Bin::EMPTY; BvhConfig::MAX_BINS];
            let mut acc = Bin::EMPTY;
            for b in (1..bin_count).rev() {
                acc.add(&bins[b].bounds, bins[b].count);
                suffix[b] = acc;
            }

            let mut left = Bin::EMPTY;
            for b in 0..bin_count - 1 {
                left.add(&bins[b].bounds, bins[b].count);
                let right = &suffix[b + 1];

                if left.count == 0 || right.count == 0 {
                    continue;
                }

                let cost = left.cost() + right.cost();
                if best.is_none_or(|best| cost < best.cost) {
                    best = Some(SplitCandidate {
                        axis,
                        position: min + (b + 1) as f32 / grid.scale,
                        cost,
                        boundary: Some(BinBoundary {
                            first_right: b + 1,
                            ..grid
                        }),
                    });
                }
            }
        }

        best
    }
}

/// Splits at the median centroid along the axis of largest centroid extent.
///
/// Cheaper to evaluate than [`BinnedSah`] and always balanced, at the price
/// of looser boxes on uneven geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidMedian;

impl SplitStrategy for CentroidMedian {
    fn find_split(
        &self,
        primitives: &[BuildPrimitive],
        indices: &[usize],
        centroid_bounds: &Aabb,
        _config: &BvhConfig,
    ) -> Option<SplitCandidate> {
        let axis = centroid_bounds.largest_axis();
        if !(centroid_bounds.size()[axis] > 0.0) {
            return None;
        }

        let mut coords: Vec<f32> = indices
            .iter()
            .map(|&i| primitives[i].centroid[axis])
            .collect();
        coords.sort_by(f32::total_cmp);

        // First strict increase at or after the middle, else the last one before it.
        let mid = coords.len() / 2;
        let cut = (mid.max(1)..coords.len())
            .find(|&k| coords[k] > coords[k - 1])
            .or_else(|| (1..mid).rev().find(|&k| coords[k] > coords[k - 1]))?;
        let position = coords[cut];

        let mut left = Bin::EMPTY;
        let mut right = Bin::EMPTY;
        for &index in indices {
            let primitive = &primitives[index];
            if primitive.centroid[axis] < position {
                left.add(&primitive.bounds, 1);
            } else {
                right.add(&primitive.bounds, 1);
            }
        }

        Some(SplitCandidate::new(axis, position, left.cost() + right.cost()))
    }
}
