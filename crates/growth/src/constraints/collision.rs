//! Collision: push apart vertices closer than the collision distance.

use growth_config::SimulationConfig;
use halfedge::HalfEdgeMesh;
use tracing::trace;

use super::Contributions;
use crate::accumulator::MoveAccumulator;
use crate::spatial::PairSource;

/// For each pair (i, j) at distance `d < collision_distance`, move both
/// halfway toward separation `collision_distance`:
///
/// `move = (pj - pi) * 0.5 * (d - collision_distance) / d`
///
/// `+move` goes to i and `-move` to j, each with `collision_weight`. Pairs at
/// exactly zero distance have no separating direction and are skipped.
pub fn accumulate_collision(
    mesh: &HalfEdgeMesh,
    config: &SimulationConfig,
    pairs: &dyn PairSource,
    acc: &mut MoveAccumulator,
) -> Contributions {
    let limit = config.collision_distance;
    let weight = config.collision_weight;
    let positions = mesh.positions();

    let mut result = Contributions::default();
    for pair in pairs.candidate_pairs(&positions, limit) {
        let (i, j) = (pair.low(), pair.high());
        let delta = positions[j.index()] - positions[i.index()];
        let distance = delta.length();

        if distance >= limit {
            continue;
        }
        if distance <= 0.0 {
            trace!("collision: vertices {:?} and {:?} coincide, skipped", i, j);
            result.degenerate += 1;
            continue;
        }

        let movement = delta * (0.5 * (distance - limit) / distance);
        acc.add(i, movement, weight);
        acc.add(j, -movement, weight);
        result.applied += 1;
    }

    result
}
