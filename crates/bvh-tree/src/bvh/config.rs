//! Build configuration.

/// Parameters controlling hierarchy construction.
///
/// ```ignore
/// use bvh_tree::BvhConfig;
///
/// let config = BvhConfig::default().with_min_leaf_size(4).with_bin_count(16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvhConfig {
    /// Ranges of at most this many primitives always become leaves.
    pub min_leaf_size: usize,

    /// Nodes at this depth (root is depth 0) always become leaves, so a
    /// finished tree has at most `max_depth + 1` levels (see
    /// [`Bvh::depth`](super::Bvh::depth)).
    pub max_depth: usize,

    /// Number of centroid bins per axis evaluated by [`BinnedSah`](super::BinnedSah).
    pub bin_count: usize,
}

impl BvhConfig {
    /// Smallest accepted [`bin_count`](Self::bin_count).
    pub const MIN_BINS: usize = 2;
    /// Largest accepted [`bin_count`](Self::bin_count).
    pub const MAX_BINS: usize = 64;

    /// Sets the leaf size threshold, raised to at least 1.
    pub fn with_min_leaf_size(mut self, min_leaf_size: usize) -> Self {
        self.min_leaf_size = min_leaf_size.max(1);
        self
    }

    /// Sets the depth at which nodes are forced to be leaves.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the bin count, clamped to `MIN_BINS..=MAX_BINS`.
    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count.clamp(Self::MIN_BINS, Self::MAX_BINS);
        self
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            min_leaf_size: 2,
            max_depth: 64,
            bin_count: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BvhConfig::default();
        assert_eq!(config.min_leaf_size, 2);
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.bin_count, 12);
    }

    #[test]
    fn setters_clamp() {
        let config = BvhConfig::default()
            .with_min_leaf_size(0)
            .with_bin_count(1000)
            .with_max_depth(3);
        assert_eq!(config.min_leaf_size, 1);
        assert_eq!(config.bin_count, BvhConfig::MAX_BINS);
        assert_eq!(config.max_depth, 3);

        assert_eq!(BvhConfig::default().with_bin_count(0).bin_count, BvhConfig::MIN_BINS);
    }
}
