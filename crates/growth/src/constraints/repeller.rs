//! Repellers: push vertices out of spherical zones.

use glam::Vec3;
use growth_config::SimulationConfig;
use halfedge::{HalfEdgeMesh, VertexId};

use crate::accumulator::MoveAccumulator;

/// For every vertex strictly inside a repeller, add `position - center` with
/// the repeller radius as weight. Returns the number of (vertex, repeller)
/// hits.
///
/// A vertex sitting exactly on the center has no offset to push along; it is
/// pushed a full radius along its vertex normal instead, or +Z when the
/// vertex has no faces.
pub fn accumulate_repellers(
    mesh: &HalfEdgeMesh,
    config: &SimulationConfig,
    acc: &mut MoveAccumulator,
) -> usize {
    if config.repellers.is_empty() {
        return 0;
    }

    let mut hits = 0;
    for i in 0..mesh.vertex_count() {
        let v = VertexId(i as u32);
        let position = mesh.position(v);

        for repeller in &config.repellers {
            if !repeller.contains(position) {
                continue;
            }

            let offset = position - repeller.center;
            let repulsion = if offset == Vec3::ZERO {
                let normal = mesh.vertex_normal(v);
                let direction = if normal == Vec3::ZERO { Vec3::Z } else { normal };
                direction * repeller.radius
            } else {
                offset
            };

            acc.add(v, repulsion, repeller.radius);
            hits += 1;
        }
    }
    hits
}
