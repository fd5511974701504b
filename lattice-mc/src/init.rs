use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::error::GridError;
use crate::geometry::Boundary;
use crate::grid::{Grid, SiteKind};
use crate::spins::heisenberg::random_unit;

/// Potts grid with every site an independent uniform id in `0..n_grains`.
pub fn random_potts(
    shape: Vec<usize>,
    boundaries: Vec<Boundary>,
    n_grains: i32,
    seed: u64,
) -> Result<Grid, GridError> {
    if n_grains < 1 {
        return Err(GridError::Config(format!(
            "grain count must be at least 1, got {n_grains}"
        )));
    }
    let mut grid = Grid::new(shape, boundaries, SiteKind::ScalarInt)?;
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    if let Some(ids) = grid.ids_mut() {
        for s in ids.iter_mut() {
            *s = rng.gen_range(0..n_grains);
        }
    }
    Ok(grid)
}

/// Heisenberg grid with every site an independent uniform unit vector.
pub fn random_heisenberg(
    shape: Vec<usize>,
    boundaries: Vec<Boundary>,
    arity: usize,
    seed: u64,
) -> Result<Grid, GridError> {
    let mut grid = Grid::new(shape, boundaries, SiteKind::Vector { arity })?;
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    if let Some(spins) = grid.spins_mut() {
        for spin in spins.chunks_exact_mut(arity) {
            random_unit(&mut rng, spin);
        }
    }
    Ok(grid)
}
