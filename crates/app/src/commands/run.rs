//! Run a growth session and write the resulting mesh.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use growth::{FrameInputs, GrowthSession, StepReport};
use tracing::{debug, info};

use super::{load_config, load_mesh};

#[derive(Args)]
pub struct RunArgs {
    /// Starting mesh (IndexedMesh JSON)
    #[arg(short, long)]
    pub mesh: PathBuf,

    /// Simulation configuration JSON; defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of solves; each runs `subiterations` steps
    #[arg(short, long, default_value = "10")]
    pub steps: u32,

    /// Output file; the mesh is written to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let start = load_mesh(&args.mesh)?;
    let config = load_config(args.config.as_deref())?;
    info!(
        "Starting mesh: {} vertices, {} faces; {} solves x {} subiterations",
        start.vertex_count(),
        start.face_count(),
        args.steps,
        config.subiterations
    );

    let started = Instant::now();
    let mut session = GrowthSession::new();
    let mut total = StepReport::default();
    let mut mesh = start.clone();

    for solve in 0..args.steps {
        let (current, report) = session
            .solve(FrameInputs {
                reset: solve == 0,
                starting_mesh: Some(&start),
                config: config.clone(),
            })
            .with_context(|| format!("solve {} failed", solve))?;

        debug!(
            "solve {}: +{} vertices, {} total, {} collision pairs, {} moved",
            solve,
            report.vertices_added,
            report.vertex_count,
            report.collision_pairs,
            report.moved_vertices
        );
        total.absorb(report);
        mesh = current;
    }

    info!(
        "Finished in {:.2?}: {} vertices (+{}), {} faces, {} degenerate contributions dropped",
        started.elapsed(),
        mesh.vertex_count(),
        total.vertices_added,
        mesh.face_count(),
        total.degenerate_pairs
    );

    debug!("Totals: {}", serde_json::to_string(&total)?);

    let json = serde_json::to_string_pretty(&mesh)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
