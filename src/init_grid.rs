use anyhow::{Context, Result};
use lattice_mc::init::{random_heisenberg, random_potts};
use lattice_mc::Boundary;
use tracing::info;

use crate::cli::{InitArgs, InitModel};

/// Build the random grid `args` describes and write it out.
pub fn write_initial(args: &InitArgs) -> Result<()> {
    let dimension = args.extents.len();
    let boundaries = vec![Boundary::Periodic; dimension];
    let grid = match args.model {
        InitModel::Potts => random_potts(args.extents.clone(), boundaries, args.grains, args.seed),
        InitModel::Heisenberg => random_heisenberg(
            args.extents.clone(),
            boundaries,
            args.arity.unwrap_or(dimension),
            args.seed,
        ),
    }
    .context("could not build initial grid")?;

    grid.save(&args.output)
        .with_context(|| format!("could not write {}", args.output.display()))?;
    info!(
        output = %args.output.display(),
        kind = %grid.kind(),
        extents = ?grid.extents(),
        "wrote initial grid"
    );
    Ok(())
}
