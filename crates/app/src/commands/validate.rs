//! Check a starting mesh and configuration before running.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use halfedge::HalfEdgeMesh;
use tracing::{error, info, warn};

use super::{load_config, load_mesh};

#[derive(Args)]
pub struct ValidateArgs {
    /// Starting mesh (IndexedMesh JSON)
    #[arg(short, long)]
    pub mesh: PathBuf,

    /// Simulation configuration JSON
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = load_mesh(&args.mesh)?;

    let mesh = match HalfEdgeMesh::from_indexed(&source) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Mesh rejected: {}", e);
            bail!("{} is not a usable starting mesh: {}", args.mesh.display(), e);
        }
    };
    if let Err(e) = mesh.validate() {
        error!("Mesh topology invalid: {}", e);
        bail!("{} failed topology validation: {}", args.mesh.display(), e);
    }

    let boundary_vertices = (0..mesh.vertex_count())
        .filter(|&i| mesh.is_boundary_vertex(halfedge::VertexId(i as u32)))
        .count();
    info!(
        "Mesh OK: {} vertices, {} edges, {} faces, {} on the boundary",
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.face_count(),
        boundary_vertices
    );

    if mesh.vertex_count() > config.max_vertex_count {
        warn!(
            "Starting mesh already has {} vertices, above max_vertex_count {}; it will not grow",
            mesh.vertex_count(),
            config.max_vertex_count
        );
    }
    info!("Configuration OK: {:?}", config);

    Ok(())
}
