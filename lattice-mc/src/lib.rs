//! Lattice grids and Metropolis Monte Carlo for grain growth (Potts) and
//! classical spins (Heisenberg).
//!
//! A [`Grid`] pairs a [`Lattice`] (shape, boundaries, Moore stencil) with flat
//! per-site storage. [`codec`] reads and writes the on-disk grid format;
//! [`update`] advances a grid in place by whole sweeps.

pub mod codec;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod init;
pub mod mcmc;
pub mod parallel;
pub mod spins;

pub use config::{SweepPolicy, UpdateConfig};
pub use error::GridError;
pub use geometry::{Boundary, Lattice};
pub use grid::{Field, Grid, Site, SiteKind, TypeTag, MAX_DIMENSION};
pub use mcmc::{update, update_with_progress};
pub use spins::energy::{energy_per_site, total_energy};
