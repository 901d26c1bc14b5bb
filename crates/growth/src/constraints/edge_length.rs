//! Edge length: pull together the endpoints of over-stretched edges.

use growth_config::SimulationConfig;
use halfedge::HalfEdgeMesh;

use crate::accumulator::MoveAccumulator;

/// Returns the number of edges that contributed.
///
/// An edge no longer than the collision distance contributes nothing, so an
/// edge at rest at exactly that length stays put. Compression is resisted by
/// the collision constraint, not here. Coincident endpoints fall under the
/// same rule, which keeps the evaluator free of divisions.
pub fn accumulate_edge_length(
    mesh: &HalfEdgeMesh,
    config: &SimulationConfig,
    acc: &mut MoveAccumulator,
) -> usize {
    let weight = config.edge_length_weight;
    let limit = config.collision_distance;

    let mut stretched = 0;
    for edge in mesh.edges() {
        let (i, j) = mesh.edge_endpoints(edge);
        let (pi, pj) = (mesh.position(i), mesh.position(j));
        if pi.distance(pj) <= limit {
            continue;
        }

        let movement = (pj - pi) * 0.5;
        acc.add(i, movement, weight);
        acc.add(j, -movement, weight);
        stretched += 1;
    }
    stretched
}
