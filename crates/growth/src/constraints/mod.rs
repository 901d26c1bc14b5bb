//! Constraint evaluators for the relaxation phase.
//!
//! Each evaluator reads the mesh and configuration and writes only into the
//! shared [`MoveAccumulator`]. They never see each other's output, so the
//! order they run in does not matter.
//!
//! | constraint      | touches                         | weight                     |
//! |-----------------|---------------------------------|----------------------------|
//! | collision       | vertex pairs closer than limit  | `collision_weight`         |
//! | edge length     | endpoints of stretched edges    | `edge_length_weight`       |
//! | bending         | the 4 vertices around an edge   | `bending_resistance_weight`|
//! | repeller        | vertices inside a repeller      | repeller radius            |

mod bending;
mod collision;
mod edge_length;
mod repeller;

pub use bending::accumulate_bending_resistance;
pub use collision::accumulate_collision;
pub use edge_length::accumulate_edge_length;
pub use repeller::accumulate_repellers;

use growth_config::SimulationConfig;
use halfedge::HalfEdgeMesh;

use crate::accumulator::MoveAccumulator;
use crate::spatial::PairSource;

/// Counters gathered while evaluating constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintStats {
    /// Vertex pairs closer than the collision distance that contributed
    pub collision_pairs: usize,
    /// Stretched edges pulled together
    pub stretched_edges: usize,
    /// Interior edges that received a bending contribution
    pub bent_edges: usize,
    /// (vertex, repeller) hits
    pub repelled_vertices: usize,
    /// Contributions dropped because their geometry was degenerate
    pub degenerate: usize,
}

/// Contributions made by one evaluator pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contributions {
    pub applied: usize,
    pub degenerate: usize,
}

/// Run every constraint against the current mesh.
pub fn accumulate_all(
    mesh: &HalfEdgeMesh,
    config: &SimulationConfig,
    pairs: &dyn PairSource,
    acc: &mut MoveAccumulator,
) -> ConstraintStats {
    let mut stats = ConstraintStats::default();

    let collision = accumulate_collision(mesh, config, pairs, acc);
    stats.collision_pairs = collision.applied;
    stats.degenerate += collision.degenerate;

    let bending = accumulate_bending_resistance(mesh, config, acc);
    stats.bent_edges = bending.applied;
    stats.degenerate += bending.degenerate;

    stats.stretched_edges = accumulate_edge_length(mesh, config, acc);
    stats.repelled_vertices = accumulate_repellers(mesh, config, acc);

    stats
}
