//! Differential growth on triangle meshes.
//!
//! A [`GrowthEngine`] owns a [`halfedge::HalfEdgeMesh`] and advances it in
//! discrete steps. Each step splits edges that have stretched past the
//! collision distance, then relaxes every vertex toward the weighted average
//! of four constraints:
//!
//! - **Collision**: vertices closer than the collision distance push apart
//! - **Edge length**: stretched edges pull their endpoints together
//! - **Bending resistance**: the two triangles around an edge flatten
//! - **Repellers**: vertices inside a repeller zone are pushed out
//!
//! Collision candidates come from a [`PairSource`]; the octree and the
//! all-pairs scan find the same pairs, so toggling the spatial index changes
//! only the cost of a step.
//!
//! [`GrowthSession`] wraps an engine with the per-frame contract a host
//! drives: reset flag, starting mesh and configuration in, mesh out.

pub mod accumulator;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod grow;
pub mod session;
pub mod spatial;

pub use accumulator::MoveAccumulator;
pub use constraints::{ConstraintStats, Contributions};
pub use engine::{GrowthEngine, StepReport};
pub use error::GrowthError;
pub use grow::GrowthStats;
pub use session::{FrameInputs, GrowthSession};
pub use spatial::{BruteForcePairs, OctreePairs, PairSource, VertexOctree};

pub use growth_config::{Repeller, SimulationConfig};
pub use halfedge::{HalfEdgeMesh, IndexedMesh};
