//! Command-line front end for `lattice_mc`: argument parsing, logging setup,
//! the (site type, dimension) dispatch table and progress reporting.

pub mod cli;
pub mod driver;
pub mod init_grid;

pub use cli::{Cli, InitArgs, InitModel};
pub use driver::{describe, lookup, run, run_cli, Model, DISPATCH};
pub use init_grid::write_initial;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
