use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;
use validator::Validate;

use crate::config::{SweepPolicy, UpdateConfig};
use crate::error::GridError;
use crate::geometry::Lattice;
use crate::grid::{Field, Grid, TypeTag};
use crate::parallel::par_over_color;
use crate::spins::{Heisenberg, Potts, Scratch, SiteModel};

/// One sweep of `n_sites` uniformly random site visits from a single stream.
#[cfg_attr(feature = "profile", inline(never))]
pub fn random_sweep<M: SiteModel>(
    lattice: &Lattice,
    values: &mut [M::Value],
    model: &M,
    rng: &mut Xoshiro256StarStar,
    scratch: &mut Scratch,
) -> usize {
    let n_sites = lattice.n_sites;
    let mut accepted = 0;
    for _ in 0..n_sites {
        let i = rng.gen_range(0..n_sites);
        if let Some(p) = model.attempt(lattice, values, i, rng, scratch) {
            model.commit(values, i, p);
            accepted += 1;
        }
    }
    accepted
}

/// One sweep over every site, color by color.
#[cfg_attr(feature = "profile", inline(never))]
pub fn checkerboard_sweep<M: SiteModel>(
    lattice: &Lattice,
    values: &mut [M::Value],
    model: &M,
    colors: &[Vec<usize>],
    seed: u64,
    sweep_id: usize,
    sequential: bool,
) -> usize {
    let mut accepted = 0;
    for sites in colors {
        accepted += par_over_color(lattice, values, model, sites, seed, sweep_id, sequential);
    }
    accepted
}

fn run_sweeps<M: SiteModel>(
    lattice: &Lattice,
    values: &mut [M::Value],
    model: &M,
    steps: usize,
    config: &UpdateConfig,
    on_sweep: &(dyn Fn() + Sync),
) {
    let n_sites = lattice.n_sites;
    let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
    let mut scratch = Scratch::default();

    let colors: Vec<Vec<usize>> = match config.policy {
        SweepPolicy::Random => Vec::new(),
        SweepPolicy::Checkerboard => (0..lattice.n_colors())
            .map(|c| lattice.sites_of_color(c))
            .collect(),
    };
    let sequential = config.sequential || !lattice.coloring_is_independent();

    for sweep_id in 0..steps {
        let accepted = match config.policy {
            SweepPolicy::Random => random_sweep(lattice, values, model, &mut rng, &mut scratch),
            SweepPolicy::Checkerboard => checkerboard_sweep(
                lattice,
                values,
                model,
                &colors,
                config.seed,
                sweep_id,
                sequential,
            ),
        };
        debug!(
            sweep = sweep_id,
            accepted,
            acceptance = accepted as f64 / n_sites as f64,
            "sweep done"
        );
        on_sweep();
    }
}

/// Advance `grid` by `steps` Monte Carlo sweeps in place.
///
/// The model follows the site type: `scalar:int` grids run the grain-growth
/// Potts model, `vector:double` grids the Heisenberg model. `steps = 0`
/// leaves the grid untouched.
pub fn update(grid: &mut Grid, steps: usize, config: &UpdateConfig) -> Result<(), GridError> {
    update_with_progress(grid, steps, config, &|| {})
}

/// [`update`], calling `on_sweep` after every completed sweep.
pub fn update_with_progress(
    grid: &mut Grid,
    steps: usize,
    config: &UpdateConfig,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<(), GridError> {
    config
        .validate()
        .map_err(|e| GridError::Config(format!("{e}")))?;

    let Grid { lattice, field } = grid;
    match field {
        Field::ScalarInt(spins) => {
            let model = Potts {
                temperature: config.temperature,
            };
            run_sweeps(lattice, spins.as_mut_slice(), &model, steps, config, on_sweep);
        }
        Field::VectorReal { arity, values } => {
            let model = Heisenberg {
                arity: *arity,
                coupling: config.coupling,
                temperature: config.temperature,
            };
            run_sweeps(lattice, values.as_mut_slice(), &model, steps, config, on_sweep);
        }
        Field::ScalarReal(_) => {
            return Err(GridError::UnsupportedType(format!(
                "no Monte Carlo model for {}",
                TypeTag::ScalarReal
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Site, SiteKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn striped_potts() -> Grid {
        let mut grid = Grid::periodic(vec![6, 6], SiteKind::ScalarInt).unwrap();
        for x in 0..6 {
            for y in 0..6 {
                grid.set(&[x, y], Site::Int((x / 2) as i32)).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_zero_steps_is_noop() {
        let mut grid = striped_potts();
        let before = grid.field().clone();
        update(&mut grid, 0, &UpdateConfig::new(0.5)).unwrap();
        assert_eq!(grid.field(), &before);
    }

    #[test]
    fn test_real_scalar_grid_rejected() {
        let mut grid = Grid::periodic(vec![3, 3], SiteKind::ScalarReal).unwrap();
        let err = update(&mut grid, 1, &UpdateConfig::new(0.5)).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedType(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut grid = striped_potts();
        let err = update(&mut grid, 1, &UpdateConfig::new(-1.0)).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn test_progress_called_once_per_sweep() {
        let mut grid = striped_potts();
        let count = AtomicUsize::new(0);
        update_with_progress(&mut grid, 7, &UpdateConfig::new(0.5), &|| {
            count.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn test_potts_ids_stay_in_initial_set() {
        let mut grid = striped_potts();
        update(&mut grid, 20, &UpdateConfig::new(1.0)).unwrap();
        let Field::ScalarInt(spins) = grid.field() else {
            panic!("site type changed");
        };
        assert!(spins.iter().all(|&s| (0..3).contains(&s)));
    }

    #[test]
    fn test_same_seed_same_result() {
        for policy in [SweepPolicy::Random, SweepPolicy::Checkerboard] {
            let cfg = UpdateConfig::new(0.8).with_seed(17).with_policy(policy);
            let mut a = striped_potts();
            let mut b = striped_potts();
            update(&mut a, 5, &cfg).unwrap();
            update(&mut b, 5, &cfg).unwrap();
            assert_eq!(a.field(), b.field());
        }
    }
}
