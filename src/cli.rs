use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lattice_mc::{Boundary, SweepPolicy};

fn parse_policy(s: &str) -> Result<SweepPolicy, String> {
    SweepPolicy::try_from(s)
}

fn parse_boundary(s: &str) -> Result<Boundary, String> {
    Boundary::try_from(s)
}

/// Arguments shared by the `potts` and `heisenberg` executables.
#[derive(Debug, Clone, Parser)]
pub struct Cli {
    /// Grid file to evolve
    pub input: PathBuf,

    /// Where to write the evolved grid
    pub output: PathBuf,

    /// Number of Monte Carlo sweeps
    pub timesteps: usize,

    /// Temperature kT (defaults to the model's own)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Heisenberg exchange constant J
    #[arg(long, default_value_t = 1.0)]
    pub coupling: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Site visiting order: random or checkerboard
    #[arg(long, default_value = "random", value_parser = parse_policy)]
    pub policy: SweepPolicy,

    /// Run checkerboard colors on the current thread only
    #[arg(long)]
    pub sequential: bool,

    /// Boundary condition applied to every axis: periodic or fixed
    #[arg(long, default_value = "periodic", value_parser = parse_boundary)]
    pub boundary: Boundary,

    /// Draw a progress bar on stderr
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitModel {
    Potts,
    Heisenberg,
}

/// Arguments of the `lattice-init` executable.
#[derive(Debug, Clone, Parser)]
#[command(name = "lattice-init", about = "Write a random initial grid")]
pub struct InitArgs {
    #[arg(value_enum)]
    pub model: InitModel,

    pub output: PathBuf,

    /// Extent along each axis, e.g. `--extents 64 64`
    #[arg(long, num_args = 1..=3, required = true)]
    pub extents: Vec<usize>,

    /// Number of distinct grain ids (Potts)
    #[arg(long, default_value_t = 16)]
    pub grains: i32,

    /// Spin components per site (Heisenberg); defaults to the dimension
    #[arg(long)]
    pub arity: Option<usize>,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
