//! Growth phase: subdivide edges that have stretched past the split threshold.
//!
//! Candidates are gathered once per step, so edges created by a split are
//! never revisited in the same pass. Splitting stops as soon as the mesh
//! reaches the vertex cap.

use std::cmp::Ordering;

use halfedge::{HalfEdgeId, HalfEdgeMesh};
use tracing::trace;

use crate::error::GrowthError;

/// Outcome of one growth pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthStats {
    /// Edges longer than the threshold when the pass started
    pub candidates: usize,
    /// Edges actually split
    pub edges_split: usize,
    /// The pass stopped early at the vertex cap
    pub capped: bool,
}

/// Canonical half-edges of every edge longer than `threshold`, longest first.
/// Equal lengths keep allocation order.
pub fn collect_split_candidates(mesh: &HalfEdgeMesh, threshold: f32) -> Vec<HalfEdgeId> {
    let mut candidates: Vec<(HalfEdgeId, f32)> = mesh
        .edges()
        .map(|edge| (edge, mesh.edge_length(edge)))
        .filter(|&(_, length)| length > threshold)
        .collect();

    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    candidates.into_iter().map(|(edge, _)| edge).collect()
}

/// Split every edge longer than `threshold` while the vertex count stays below
/// `max_vertex_count`.
pub fn split_long_edges(
    mesh: &mut HalfEdgeMesh,
    threshold: f32,
    max_vertex_count: usize,
) -> Result<GrowthStats, GrowthError> {
    let mut stats = GrowthStats::default();
    if mesh.vertex_count() >= max_vertex_count {
        stats.capped = true;
        return Ok(stats);
    }

    let candidates = collect_split_candidates(mesh, threshold);
    stats.candidates = candidates.len();

    for edge in candidates {
        if mesh.vertex_count() >= max_vertex_count {
            stats.capped = true;
            break;
        }

        let split = mesh.split_edge(edge)?;
        trace!(
            "grow: split edge {:?}, new vertex {:?}, {} new faces",
            edge,
            split.new_vertex,
            split.new_faces.len()
        );
        stats.edges_split += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use halfedge::{IndexedMesh, VertexId};

    fn right_triangle() -> HalfEdgeMesh {
        HalfEdgeMesh::from_indexed(&IndexedMesh::from_triangles(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            &[[0, 1, 2]],
        ))
        .unwrap()
    }

    /// An n-by-n grid of unit quads, each cut into two triangles.
    fn grid(n: u32) -> HalfEdgeMesh {
        let mut positions = Vec::new();
        for y in 0..=n {
            for x in 0..=n {
                positions.push(Vec3::new(x as f32, y as f32, 0.0));
            }
        }
        let row = n + 1;
        let mut triangles = Vec::new();
        for y in 0..n {
            for x in 0..n {
                let a = y * row + x;
                triangles.push([a, a + 1, a + row + 1]);
                triangles.push([a, a + row + 1, a + row]);
            }
        }
        HalfEdgeMesh::from_indexed(&IndexedMesh::from_triangles(positions, &triangles)).unwrap()
    }

    #[test]
    fn test_candidates_are_longest_first() {
        let mesh = right_triangle();
        let candidates = collect_split_candidates(&mesh, 0.5);

        assert_eq!(candidates.len(), 3);
        assert!((mesh.edge_length(candidates[0]) - 2f32.sqrt()).abs() < 1e-6);
        // The two unit legs keep allocation order.
        assert!(candidates[1] < candidates[2]);
    }

    #[test]
    fn test_cap_limits_splits_to_longest_edge() {
        let mut mesh = right_triangle();
        let stats = split_long_edges(&mut mesh, 0.495, 4).unwrap();

        assert_eq!(stats.edges_split, 1);
        assert!(stats.capped);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.position(VertexId(3)), Vec3::new(0.5, 0.5, 0.0));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_short_edges_are_left_alone() {
        let mut mesh = right_triangle();
        let stats = split_long_edges(&mut mesh, 2.0, 100).unwrap();

        assert_eq!(stats, GrowthStats::default());
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_single_pass_does_not_revisit_new_edges() {
        let mut mesh = grid(2);
        let edges_before = mesh.edge_count();
        let stats = split_long_edges(&mut mesh, 0.1, 10_000).unwrap();

        // Every original edge is split exactly once, and nothing else.
        assert_eq!(stats.candidates, edges_before);
        assert_eq!(stats.edges_split, edges_before);
        assert_eq!(mesh.vertex_count(), 9 + edges_before);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_already_at_cap_is_a_no_op() {
        let mut mesh = grid(1);
        let stats = split_long_edges(&mut mesh, 0.1, 4).unwrap();

        assert!(stats.capped);
        assert_eq!(stats.edges_split, 0);
        assert_eq!(mesh.vertex_count(), 4);
    }
}
