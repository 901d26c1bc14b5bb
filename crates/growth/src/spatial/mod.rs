//! Spatial indexing for proximity queries.
//!
//! The octree here is built from a snapshot of vertex positions at the start
//! of the relaxation phase and thrown away afterwards. Vertices move every
//! step, so there is no incremental update or removal.
//!
//! Nodes live in one arena (`Vec<Node>`) and refer to their children by
//! index. Leaves hold vertex indices into the snapshot, never positions.

mod pairs;

pub use pairs::{pair_source, BruteForcePairs, OctreePairs, OrderedPair, PairSource};

use glam::Vec3;
use halfedge::VertexId;

/// Octree subdivision limits.
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Levels below the root a leaf may sit at
    pub max_depth: u32,
    /// A leaf holding more than this many vertices splits
    pub max_items_per_leaf: usize,
    /// Leaves smaller than twice this edge length never split
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_items_per_leaf: 16,
            min_node_size: 0.001,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`, or `None` for an empty slice.
    pub fn around(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |b, &p| {
            Self::new(b.min.min(p), b.max.max(p))
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Squared distance from `point` to the closest point of the box.
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        point.clamp(self.min, self.max).distance_squared(point)
    }

    /// Smallest cube sharing this box's center that contains it.
    ///
    /// A flat starting sheet would otherwise give a box too thin to ever split.
    pub fn to_cube(&self) -> Aabb {
        let half = Vec3::splat(self.size().max_element() * 0.5);
        let center = self.center();
        Aabb::new(center - half, center + half)
    }

    /// Octant of `point` relative to the center: bit 0 = x, 1 = y, 2 = z.
    fn octant_of(&self, point: Vec3) -> usize {
        let above = point.cmpge(self.center());
        (above.test(0) as usize) | (above.test(1) as usize) << 1 | (above.test(2) as usize) << 2
    }

    fn octant(&self, octant: usize) -> Aabb {
        let center = self.center();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if octant & bit != 0 { (mid, hi) } else { (lo, mid) }
        };
        let (x0, x1) = pick(1, self.min.x, center.x, self.max.x);
        let (y0, y1) = pick(2, self.min.y, center.y, self.max.y);
        let (z0, z1) = pick(4, self.min.z, center.z, self.max.z);
        Aabb::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }
}

#[derive(Debug)]
enum NodeKind {
    Leaf(Vec<u32>),
    /// Arena index of each octant's child; `None` for empty octants.
    Branch([Option<u32>; 8]),
}

#[derive(Debug)]
struct Node {
    bounds: Aabb,
    depth: u32,
    kind: NodeKind,
}

/// Octree over a fixed snapshot of vertex positions.
///
/// Item `i` of the snapshot is reported as `VertexId(i)`.
#[derive(Debug)]
pub struct VertexOctree {
    positions: Vec<Vec3>,
    nodes: Vec<Node>,
    config: OctreeConfig,
}

impl VertexOctree {
    pub fn from_positions(positions: &[Vec3]) -> Self {
        Self::from_positions_with_config(positions, OctreeConfig::default())
    }

    pub fn from_positions_with_config(positions: &[Vec3], config: OctreeConfig) -> Self {
        let bounds = Aabb::around(positions)
            .unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO))
            .to_cube();
        // Pad so points on the faces of the box fall strictly inside.
        let padding = bounds.size() * 0.01 + Vec3::splat(0.001);

        let mut octree = Self {
            positions: positions.to_vec(),
            nodes: vec![Node {
                bounds: Aabb::new(bounds.min - padding, bounds.max + padding),
                depth: 0,
                kind: NodeKind::Leaf(Vec::new()),
            }],
            config,
        };
        for i in 0..positions.len() as u32 {
            octree.insert(0, i);
        }
        octree
    }

    fn insert(&mut self, mut node: usize, item: u32) {
        let position = self.positions[item as usize];

        // Descend to the leaf covering `position`, creating it if needed.
        loop {
            let bounds = self.nodes[node].bounds;
            let depth = self.nodes[node].depth;
            let octant = bounds.octant_of(position);
            let next_free = self.nodes.len() as u32;
            match &mut self.nodes[node].kind {
                NodeKind::Leaf(_) => break,
                NodeKind::Branch(children) => match children[octant] {
                    Some(child) => node = child as usize,
                    None => {
                        children[octant] = Some(next_free);
                        self.nodes.push(Node {
                            bounds: bounds.octant(octant),
                            depth: depth + 1,
                            kind: NodeKind::Leaf(Vec::new()),
                        });
                        node = next_free as usize;
                    }
                },
            }
        }

        let can_split = {
            let n = &self.nodes[node];
            n.depth < self.config.max_depth
                && n.bounds.size().min_element() > self.config.min_node_size * 2.0
        };
        let NodeKind::Leaf(items) = &mut self.nodes[node].kind else {
            return;
        };
        items.push(item);

        if can_split && items.len() > self.config.max_items_per_leaf {
            let items = std::mem::take(items);
            self.nodes[node].kind = NodeKind::Branch([None; 8]);
            for moved in items {
                self.insert(node, moved);
            }
        }
    }

    /// Every vertex within `radius` of `center`, boundary inclusive.
    ///
    /// A vertex stored at `center` is part of the result; callers that want
    /// neighbors only filter it out themselves.
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<VertexId> {
        let radius_sq = radius * radius;
        let mut found = Vec::new();
        let mut stack = vec![0usize];

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.bounds.distance_squared_to(center) > radius_sq {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf(items) => found.extend(
                    items
                        .iter()
                        .filter(|&&i| self.positions[i as usize].distance_squared(center) <= radius_sq)
                        .map(|&i| VertexId(i)),
                ),
                NodeKind::Branch(children) => {
                    stack.extend(children.iter().flatten().map(|&c| c as usize))
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Deepest leaf level, 0 for a tree that never split.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
