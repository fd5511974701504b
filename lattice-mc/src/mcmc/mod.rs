pub mod metropolis;
pub mod sweep;

pub use sweep::{update, update_with_progress};
