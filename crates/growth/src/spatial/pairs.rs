//! Candidate pair discovery for proximity constraints.
//!
//! Two strategies produce the same set of pairs: an all-pairs scan and an
//! octree radius query per vertex. Either way each unordered pair is reported
//! exactly once, as an [`OrderedPair`] with the lower index first.

use glam::Vec3;
use halfedge::VertexId;

use super::{OctreeConfig, VertexOctree};

/// An unordered vertex pair, stored lower index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderedPair {
    low: VertexId,
    high: VertexId,
}

impl OrderedPair {
    /// `Some` only when `i < j`. Discovering (j, i) as well yields `None`,
    /// which is what keeps every pair from being counted twice.
    #[inline]
    pub fn new(i: VertexId, j: VertexId) -> Option<Self> {
        (i < j).then_some(Self { low: i, high: j })
    }

    #[inline]
    pub fn low(self) -> VertexId {
        self.low
    }

    #[inline]
    pub fn high(self) -> VertexId {
        self.high
    }
}

/// Source of vertex pairs that may be closer than a radius.
pub trait PairSource {
    /// Every pair whose positions are within `radius` of each other
    /// (boundary inclusive), sorted ascending.
    fn candidate_pairs(&self, positions: &[Vec3], radius: f32) -> Vec<OrderedPair>;

    fn name(&self) -> &'static str;
}

/// All-pairs scan, O(n²).
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForcePairs;

impl PairSource for BruteForcePairs {
    fn candidate_pairs(&self, positions: &[Vec3], radius: f32) -> Vec<OrderedPair> {
        let radius_sq = radius * radius;
        let mut pairs = Vec::new();
        for (i, &pi) in positions.iter().enumerate() {
            for (j, &pj) in positions.iter().enumerate().skip(i + 1) {
                if pi.distance_squared(pj) <= radius_sq {
                    pairs.extend(OrderedPair::new(VertexId(i as u32), VertexId(j as u32)));
                }
            }
        }
        pairs
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}

/// One octree radius query per vertex over a freshly built octree.
#[derive(Debug, Clone, Default)]
pub struct OctreePairs {
    pub config: OctreeConfig,
}

impl PairSource for OctreePairs {
    fn candidate_pairs(&self, positions: &[Vec3], radius: f32) -> Vec<OrderedPair> {
        let octree = VertexOctree::from_positions_with_config(positions, self.config.clone());

        let mut pairs = Vec::new();
        for (i, &pi) in positions.iter().enumerate() {
            let vi = VertexId(i as u32);
            pairs.extend(
                octree
                    .query_sphere(pi, radius)
                    .into_iter()
                    .filter_map(|vj| OrderedPair::new(vi, vj)),
            );
        }
        // Same order as the scan, so both strategies accumulate identically.
        pairs.sort_unstable();
        pairs
    }

    fn name(&self) -> &'static str {
        "octree"
    }
}

/// Strategy selected by the `use_spatial_index` switch.
pub fn pair_source(use_spatial_index: bool) -> Box<dyn PairSource> {
    if use_spatial_index {
        Box::new(OctreePairs::default())
    } else {
        Box::new(BruteForcePairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random cloud (64-bit LCG).
    fn point_cloud(count: usize, extent: f32) -> Vec<Vec3> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * extent
        };
        (0..count).map(|_| Vec3::new(next(), next(), next())).collect()
    }

    #[test]
    fn test_ordered_pair_rejects_reverse_and_self() {
        assert!(OrderedPair::new(VertexId(1), VertexId(2)).is_some());
        assert!(OrderedPair::new(VertexId(2), VertexId(1)).is_none());
        assert!(OrderedPair::new(VertexId(3), VertexId(3)).is_none());
    }

    #[test]
    fn test_brute_force_finds_close_pairs_once() {
        let positions = [
            Vec3::ZERO,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
        ];
        let pairs = BruteForcePairs.candidate_pairs(&positions, 1.0);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].low(), VertexId(0));
        assert_eq!(pairs[0].high(), VertexId(1));
    }

    #[test]
    fn test_strategies_agree() {
        let positions = point_cloud(300, 10.0);

        let brute = BruteForcePairs.candidate_pairs(&positions, 1.2);
        let octree = OctreePairs::default().candidate_pairs(&positions, 1.2);

        assert!(!brute.is_empty());
        assert_eq!(brute, octree);
    }

    #[test]
    fn test_strategies_agree_on_coincident_points() {
        let mut positions = vec![Vec3::ONE; 20];
        positions.push(Vec3::new(1.5, 1.0, 1.0));

        let brute = BruteForcePairs.candidate_pairs(&positions, 1.0);
        let octree = OctreePairs::default().candidate_pairs(&positions, 1.0);

        assert_eq!(brute.len(), 21 * 20 / 2);
        assert_eq!(brute, octree);
    }

    #[test]
    fn test_pair_source_selection() {
        assert_eq!(pair_source(true).name(), "octree");
        assert_eq!(pair_source(false).name(), "brute-force");
    }
}
