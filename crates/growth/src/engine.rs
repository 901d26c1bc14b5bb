//! The growth engine: one owned mesh advanced one step at a time.
//!
//! A step runs four phases in order and exposes nothing in between:
//!
//! 1. grow: split edges longer than the split threshold, up to the vertex cap
//! 2. reset: a fresh [`MoveAccumulator`] sized to the grown mesh
//! 3. evaluate: every constraint adds into the accumulator
//! 4. integrate: move each weighted vertex by its averaged move

use growth_config::SimulationConfig;
use halfedge::{HalfEdgeId, HalfEdgeMesh, IndexedMesh, SplitResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accumulator::MoveAccumulator;
use crate::constraints::{self, ConstraintStats};
use crate::error::GrowthError;
use crate::grow::{self, GrowthStats};
use crate::spatial::pair_source;

/// What one step (or an aggregate of steps) did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Vertices created by edge splits
    pub vertices_added: usize,
    /// Vertex count after the last step
    pub vertex_count: usize,
    /// Vertex pairs that received a collision contribution
    pub collision_pairs: usize,
    /// Contributions dropped for degenerate geometry
    pub degenerate_pairs: usize,
    /// Vertices whose position changed during integration
    pub moved_vertices: usize,
}

impl StepReport {
    /// Fold a later report into this one: counters add up, the vertex count is
    /// taken from the later report.
    pub fn absorb(&mut self, later: StepReport) {
        self.vertices_added += later.vertices_added;
        self.vertex_count = later.vertex_count;
        self.collision_pairs += later.collision_pairs;
        self.degenerate_pairs += later.degenerate_pairs;
        self.moved_vertices += later.moved_vertices;
    }
}

/// Owns the mesh and the configuration the next step will use.
#[derive(Debug, Clone)]
pub struct GrowthEngine {
    mesh: HalfEdgeMesh,
    config: SimulationConfig,
    steps: u64,
}

impl GrowthEngine {
    pub fn new(mesh: HalfEdgeMesh, config: SimulationConfig) -> Result<Self, GrowthError> {
        config.validate()?;
        Ok(Self {
            mesh,
            config,
            steps: 0,
        })
    }

    /// Build an engine from an indexed triangle mesh.
    pub fn from_indexed(source: &IndexedMesh, config: SimulationConfig) -> Result<Self, GrowthError> {
        let mesh = HalfEdgeMesh::from_indexed(source)?;
        Self::new(mesh, config)
    }

    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Steps completed since the engine was built or last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Replace the configuration used by the following steps.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), GrowthError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Discard the current mesh and start over from `source`.
    ///
    /// On error the engine keeps its current mesh.
    pub fn reset(&mut self, source: &IndexedMesh) -> Result<(), GrowthError> {
        self.mesh = HalfEdgeMesh::from_indexed(source)?;
        self.steps = 0;
        Ok(())
    }

    /// Export the current mesh.
    pub fn to_indexed(&self) -> IndexedMesh {
        self.mesh.to_indexed()
    }

    /// Split a single edge, refusing once the vertex cap is reached.
    pub fn split_edge(&mut self, edge: HalfEdgeId) -> Result<SplitResult, GrowthError> {
        let max = self.config.max_vertex_count;
        if self.mesh.vertex_count() >= max {
            return Err(GrowthError::VertexLimitReached { max });
        }
        Ok(self.mesh.split_edge(edge)?)
    }

    /// Run only the growth phase.
    pub fn grow(&mut self) -> Result<GrowthStats, GrowthError> {
        grow::split_long_edges(
            &mut self.mesh,
            self.config.split_threshold(),
            self.config.max_vertex_count,
        )
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self) -> Result<StepReport, GrowthError> {
        let vertices_before = self.mesh.vertex_count();

        if self.config.grow {
            self.grow()?;
        }

        let mut acc = MoveAccumulator::new(self.mesh.vertex_count());
        let pairs = pair_source(self.config.use_spatial_index);
        let stats: ConstraintStats =
            constraints::accumulate_all(&self.mesh, &self.config, pairs.as_ref(), &mut acc);
        let moved_vertices = acc.integrate(&mut self.mesh);

        self.steps += 1;
        let report = StepReport {
            vertices_added: self.mesh.vertex_count() - vertices_before,
            vertex_count: self.mesh.vertex_count(),
            collision_pairs: stats.collision_pairs,
            degenerate_pairs: stats.degenerate,
            moved_vertices,
        };

        debug!(
            "step {}: +{} vertices ({} total), {} collision pairs via {}, {} stretched, {} bent, {} repelled, {} degenerate, {} moved",
            self.steps,
            report.vertices_added,
            report.vertex_count,
            stats.collision_pairs,
            pairs.name(),
            stats.stretched_edges,
            stats.bent_edges,
            stats.repelled_vertices,
            stats.degenerate,
            moved_vertices
        );

        Ok(report)
    }

    /// Run `config.subiterations` steps and return their combined report.
    pub fn advance(&mut self) -> Result<StepReport, GrowthError> {
        let mut total = StepReport {
            vertex_count: self.mesh.vertex_count(),
            ..Default::default()
        };
        for _ in 0..self.config.subiterations {
            total.absorb(self.step()?);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use growth_config::Repeller;
    use halfedge::VertexId;

    fn right_triangle() -> IndexedMesh {
        IndexedMesh::from_triangles(vec![Vec3::ZERO, Vec3::X, Vec3::Y], &[[0, 1, 2]])
    }

    /// Only collisions act; every other constraint is switched off.
    fn collision_only(distance: f32) -> SimulationConfig {
        SimulationConfig {
            grow: false,
            collision_distance: distance,
            collision_weight: 1.0,
            edge_length_weight: 0.0,
            bending_resistance_weight: 0.0,
            ..Default::default()
        }
    }

    /// A gently curved sheet of `n * n` quads with edges of length `spacing`.
    fn sheet(n: u32, spacing: f32) -> IndexedMesh {
        let mut positions = Vec::new();
        for y in 0..=n {
            for x in 0..=n {
                let (fx, fy) = (x as f32 * spacing, y as f32 * spacing);
                positions.push(Vec3::new(fx, fy, 0.05 * (fx * 1.3).sin() * (fy * 0.7).cos()));
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
        IndexedMesh::from_triangles(positions, &triangles)
    }

    #[test]
    fn test_first_step_splits_hypotenuse_at_midpoint() {
        let config = SimulationConfig {
            collision_distance: 0.5,
            max_vertex_count: 4,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&right_triangle(), config).unwrap();

        let grown = engine.grow().unwrap();
        assert_eq!(grown.edges_split, 1);
        assert_eq!(engine.mesh().vertex_count(), 4);
        assert_eq!(engine.mesh().position(VertexId(3)), Vec3::new(0.5, 0.5, 0.0));

        let report = engine.step().unwrap();
        assert_eq!(report.vertices_added, 0);
        assert_eq!(report.vertex_count, 4);
        assert!(engine.mesh().validate().is_ok());
    }

    #[test]
    fn test_step_reports_growth() {
        let config = SimulationConfig {
            collision_distance: 0.5,
            max_vertex_count: 4,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&right_triangle(), config).unwrap();

        let report = engine.step().unwrap();
        assert_eq!(report.vertices_added, 1);
        assert_eq!(report.vertex_count, 4);
        assert_eq!(engine.steps(), 1);
    }

    #[test]
    fn test_close_pair_separates_symmetrically() {
        let source = IndexedMesh::new(vec![Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0)], vec![]);
        let mut engine = GrowthEngine::from_indexed(&source, collision_only(1.0)).unwrap();

        let report = engine.step().unwrap();

        let a = engine.mesh().position(VertexId(0));
        let b = engine.mesh().position(VertexId(1));
        assert_eq!(report.collision_pairs, 1);
        assert_eq!(report.moved_vertices, 2);
        assert!(a.distance(b) > 0.1);
        assert!(((a + b) * 0.5 - Vec3::new(0.05, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_spatial_index_does_not_change_results() {
        let base = SimulationConfig {
            collision_distance: 0.8,
            max_vertex_count: 400,
            ..Default::default()
        };
        let mut with_index = GrowthEngine::from_indexed(
            &sheet(4, 1.0),
            SimulationConfig {
                use_spatial_index: true,
                ..base.clone()
            },
        )
        .unwrap();
        let mut without_index = GrowthEngine::from_indexed(
            &sheet(4, 1.0),
            SimulationConfig {
                use_spatial_index: false,
                ..base
            },
        )
        .unwrap();

        for _ in 0..3 {
            let a = with_index.step().unwrap();
            let b = without_index.step().unwrap();
            assert_eq!(a, b);
        }

        let a = with_index.mesh().positions();
        let b = without_index.mesh().positions();
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert!(pa.distance(*pb) < 1e-5);
        }
    }

    #[test]
    fn test_vertex_at_repeller_center_moves_away() {
        let source = IndexedMesh::new(vec![Vec3::new(2.0, 1.0, 0.0)], vec![]);
        let config = SimulationConfig {
            grow: false,
            collision_weight: 0.0,
            edge_length_weight: 0.0,
            bending_resistance_weight: 0.0,
            repellers: vec![Repeller::new(Vec3::new(2.0, 1.0, 0.0), 1.5)],
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&source, config).unwrap();

        engine.step().unwrap();

        let distance = engine.mesh().position(VertexId(0)).distance(Vec3::new(2.0, 1.0, 0.0));
        assert!(distance > 0.0);
    }

    #[test]
    fn test_growth_is_monotonic_and_capped() {
        // 16 vertices and 33 edges, all longer than the split threshold.
        let config = SimulationConfig {
            collision_distance: 0.6,
            max_vertex_count: 30,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&sheet(3, 1.0), config).unwrap();

        let first = engine.step().unwrap();
        assert_eq!(first.vertices_added, 14);
        assert_eq!(first.vertex_count, 30);

        let mut previous = first.vertex_count;
        for _ in 0..5 {
            let report = engine.step().unwrap();
            assert!(report.vertex_count >= previous);
            assert!(report.vertex_count <= 30);
            assert_eq!(report.vertices_added, 0);
            previous = report.vertex_count;
        }
    }

    #[test]
    fn test_topology_survives_many_steps() {
        let config = SimulationConfig {
            collision_distance: 0.7,
            max_vertex_count: 300,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&sheet(3, 1.0), config).unwrap();

        for _ in 0..15 {
            engine.step().unwrap();
            assert!(engine.mesh().validate().is_ok());
        }

        let exported = engine.to_indexed();
        assert!(exported.faces.iter().all(|f| f.len() == 3));
        assert!(exported.positions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_grow_disabled_keeps_vertex_count() {
        let config = SimulationConfig {
            grow: false,
            collision_distance: 0.3,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&sheet(2, 1.0), config).unwrap();

        let report = engine.step().unwrap();
        assert_eq!(report.vertices_added, 0);
        assert_eq!(report.vertex_count, 9);
    }

    #[test]
    fn test_advance_runs_subiterations() {
        let config = SimulationConfig {
            collision_distance: 0.5,
            max_vertex_count: 50,
            subiterations: 3,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&right_triangle(), config).unwrap();

        let report = engine.advance().unwrap();
        assert_eq!(engine.steps(), 3);
        assert_eq!(report.vertex_count, engine.mesh().vertex_count());
        assert_eq!(report.vertices_added, engine.mesh().vertex_count() - 3);
    }

    #[test]
    fn test_split_edge_refuses_at_cap() {
        let config = SimulationConfig {
            max_vertex_count: 3,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&right_triangle(), config).unwrap();

        let err = engine.split_edge(HalfEdgeId(0)).unwrap_err();
        assert!(matches!(err, GrowthError::VertexLimitReached { max: 3 }));
        assert_eq!(engine.mesh().vertex_count(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut engine =
            GrowthEngine::from_indexed(&right_triangle(), SimulationConfig::default()).unwrap();

        let err = engine
            .set_config(SimulationConfig {
                collision_distance: -1.0,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, GrowthError::Config(_)));
        assert_eq!(engine.config().collision_distance, 1.0);
    }

    #[test]
    fn test_reset_restarts_from_source() {
        let config = SimulationConfig {
            collision_distance: 0.5,
            ..Default::default()
        };
        let mut engine = GrowthEngine::from_indexed(&right_triangle(), config).unwrap();
        engine.step().unwrap();
        assert!(engine.mesh().vertex_count() > 3);

        engine.reset(&right_triangle()).unwrap();
        assert_eq!(engine.mesh().vertex_count(), 3);
        assert_eq!(engine.steps(), 0);
    }

    #[test]
    fn test_reset_with_bad_mesh_keeps_current() {
        let mut engine =
            GrowthEngine::from_indexed(&right_triangle(), SimulationConfig::default()).unwrap();
        let quad = IndexedMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y],
            vec![vec![0, 1, 2, 3]],
        );

        assert!(matches!(engine.reset(&quad), Err(GrowthError::Mesh(_))));
        assert_eq!(engine.mesh().vertex_count(), 3);
    }
}
