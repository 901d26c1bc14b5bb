//! Host-facing session: per-frame inputs in, current mesh out.

use growth_config::SimulationConfig;
use halfedge::IndexedMesh;
use tracing::{info, warn};

use crate::engine::{GrowthEngine, StepReport};
use crate::error::GrowthError;

/// Everything a host supplies for one solve.
#[derive(Debug, Clone)]
pub struct FrameInputs<'a> {
    /// Rebuild the mesh from `starting_mesh` before stepping
    pub reset: bool,
    pub starting_mesh: Option<&'a IndexedMesh>,
    pub config: SimulationConfig,
}

/// Keeps one engine alive across solves.
#[derive(Debug, Default)]
pub struct GrowthSession {
    engine: Option<GrowthEngine>,
}

impl GrowthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> Option<&GrowthEngine> {
        self.engine.as_ref()
    }

    /// Rebuild when asked to (or when nothing has been built yet), apply the
    /// configuration, advance by `config.subiterations` steps and return the
    /// current mesh.
    ///
    /// A starting mesh that fails to convert is reported and the simulation
    /// is not advanced. A failed rebuild leaves the session empty.
    pub fn solve(&mut self, inputs: FrameInputs<'_>) -> Result<(IndexedMesh, StepReport), GrowthError> {
        inputs.config.validate()?;

        if inputs.reset || self.engine.is_none() {
            self.engine = None;
            let source = inputs.starting_mesh.ok_or(GrowthError::MissingStartingMesh)?;
            let engine = GrowthEngine::from_indexed(source, inputs.config).inspect_err(|e| {
                warn!("session: starting mesh rejected: {}", e);
            })?;
            info!(
                "session: reset with {} vertices, {} faces",
                source.vertex_count(),
                source.face_count()
            );
            self.engine = Some(engine);
        } else if let Some(engine) = self.engine.as_mut() {
            engine.set_config(inputs.config)?;
        }

        let engine = self.engine.as_mut().ok_or(GrowthError::MissingStartingMesh)?;
        let report = engine.advance()?;
        Ok((engine.to_indexed(), report))
    }
}
