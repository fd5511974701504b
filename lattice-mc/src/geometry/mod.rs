pub mod lattice;
pub mod offsets;

pub use lattice::{Boundary, Lattice};
pub use offsets::moore;
