//! Error types for the growth engine.

use growth_config::ConfigError;
use halfedge::HalfEdgeError;

/// Errors that stop a step or a session solve.
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    #[error("mesh error: {0}")]
    Mesh(#[from] HalfEdgeError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("vertex limit of {max} reached")]
    VertexLimitReached { max: usize },
    #[error("no starting mesh was supplied")]
    MissingStartingMesh,
}
