//! Bending resistance: flatten the two triangles around each interior edge.

use glam::Vec3;
use growth_config::SimulationConfig;
use halfedge::HalfEdgeMesh;
use tracing::trace;

use super::Contributions;
use crate::accumulator::MoveAccumulator;

/// For an interior edge i-j with opposite corners p and q, fit a plane
/// through the centroid of {i, j, p, q} whose normal is the sum of the two
/// triangle normals, then move each of the four vertices toward its
/// projection onto that plane.
///
/// Boundary edges have only one triangle and are skipped. A fold so sharp
/// that the two normals cancel has no plane and is counted as degenerate.
pub fn accumulate_bending_resistance(
    mesh: &HalfEdgeMesh,
    config: &SimulationConfig,
    acc: &mut MoveAccumulator,
) -> Contributions {
    let weight = config.bending_resistance_weight;
    let mut result = Contributions::default();

    for edge in mesh.edges() {
        if mesh.is_boundary_edge(edge) {
            continue;
        }
        let twin = mesh.twin(edge);

        let i = mesh.origin(edge);
        let j = mesh.origin(twin);
        let p = mesh.origin(mesh.prev(edge));
        let q = mesh.origin(mesh.prev(twin));

        let (vi, vj, vp, vq) = (
            mesh.position(i),
            mesh.position(j),
            mesh.position(p),
            mesh.position(q),
        );

        let normal_p = (vj - vi).cross(vp - vi);
        let normal_q = (vq - vi).cross(vj - vi);
        let Some(normal) = (normal_p + normal_q).try_normalize() else {
            trace!("bending: edge {:?} has no fitting plane, skipped", edge);
            result.degenerate += 1;
            continue;
        };

        let origin = (vi + vj + vp + vq) * 0.25;
        for (vertex, position) in [(i, vi), (j, vj), (p, vp), (q, vq)] {
            acc.add(vertex, project_onto_plane(position, origin, normal) - position, weight);
        }
        result.applied += 1;
    }

    result
}

/// Orthogonal projection of `point` onto the plane through `origin` with unit `normal`.
#[inline]
fn project_onto_plane(point: Vec3, origin: Vec3, normal: Vec3) -> Vec3 {
    point - normal * normal.dot(point - origin)
}
