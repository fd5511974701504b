use std::time::Instant;

use lattice_mc::init::{random_heisenberg, random_potts};
use lattice_mc::{update, Boundary, Grid, SweepPolicy, UpdateConfig};

const L: usize = 256;
const L3: usize = 48;
const N_GRAINS: i32 = 64;
const N_SWEEPS: usize = 20;

fn time_sweeps(label: &str, grid: &mut Grid, config: &UpdateConfig) {
    let t0 = Instant::now();
    update(grid, N_SWEEPS, config).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    let per_sweep = elapsed / N_SWEEPS as f64 * 1000.0;
    println!(
        "{:<34} {:>8.3} s  |  {:>8.3} ms/sweep",
        label, elapsed, per_sweep
    );
}

fn main() {
    println!(
        "Potts {}x{} ({} grains)  |  Heisenberg {}^3  |  Sweeps: {}",
        L, L, N_GRAINS, L3, N_SWEEPS
    );
    println!("{}", "-".repeat(70));

    for (label, policy, sequential) in [
        ("random", SweepPolicy::Random, false),
        ("checkerboard, sequential", SweepPolicy::Checkerboard, true),
        ("checkerboard, rayon", SweepPolicy::Checkerboard, false),
    ] {
        let mut config = UpdateConfig::new(0.5).with_policy(policy);
        config.sequential = sequential;

        let mut potts = random_potts(vec![L, L], vec![Boundary::Periodic; 2], N_GRAINS, 42).unwrap();
        time_sweeps(&format!("potts 2d, {label}"), &mut potts, &config);

        config.temperature = 0.75;
        let mut heis = random_heisenberg(vec![L3, L3, L3], vec![Boundary::Periodic; 3], 3, 42).unwrap();
        time_sweeps(&format!("heisenberg 3d, {label}"), &mut heis, &config);
    }
}
