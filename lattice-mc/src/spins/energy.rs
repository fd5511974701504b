use crate::error::GridError;
use crate::geometry::Lattice;
use crate::grid::{Field, Grid, TypeTag};

use super::heisenberg::dot;

/// Visit every bond once as `(i, j)`, walking forward offsets only.
fn for_each_bond(lattice: &Lattice, mut f: impl FnMut(usize, usize)) {
    for i in 0..lattice.n_sites {
        for d in 0..lattice.n_neighbors {
            if let Some(j) = lattice.neighbor(i, d, true) {
                f(i, j);
            }
        }
    }
}

/// Total energy of a grid, each neighbor bond counted once.
///
/// Potts grids count unlike-id bonds (grain boundary length). Heisenberg grids
/// sum `-coupling * s_i . s_j`. Wrap duplicates on short periodic axes count
/// with the same multiplicity the update kernel sees.
pub fn total_energy(grid: &Grid, coupling: f64) -> Result<f64, GridError> {
    let lattice = grid.lattice();
    match grid.field() {
        Field::ScalarInt(spins) => {
            let mut boundary = 0usize;
            for_each_bond(lattice, |i, j| boundary += usize::from(spins[i] != spins[j]));
            Ok(boundary as f64)
        }
        Field::VectorReal { arity, values } => {
            let k = *arity;
            let mut total = 0.0f64;
            for_each_bond(lattice, |i, j| {
                total += dot(&values[i * k..(i + 1) * k], &values[j * k..(j + 1) * k]);
            });
            Ok(-coupling * total)
        }
        Field::ScalarReal(_) => Err(GridError::UnsupportedType(format!(
            "no energy model for {}",
            TypeTag::ScalarReal
        ))),
    }
}

/// Energy per site. The executables log it when a grid is loaded and
/// again when the evolved grid is written.
pub fn energy_per_site(grid: &Grid, coupling: f64) -> Result<f64, GridError> {
    Ok(total_energy(grid, coupling)? / grid.n_sites() as f64)
}
