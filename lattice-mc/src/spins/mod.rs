pub mod energy;
pub mod heisenberg;
pub mod potts;

pub use heisenberg::Heisenberg;
pub use potts::Potts;

use crate::geometry::Lattice;
use rand_xoshiro::Xoshiro256StarStar;

/// Reusable per-thread buffers for single-site moves.
#[derive(Debug, Default)]
pub struct Scratch {
    pub neighbors: Vec<usize>,
    pub field: Vec<f64>,
    pub trial: Vec<f64>,
}

/// A single-site Monte Carlo move over flat site storage.
///
/// `attempt` only reads `values`, so the checkerboard policy can evaluate a
/// whole color against a frozen snapshot before committing.
pub trait SiteModel: Sync {
    /// Scalar stored per component (`i32` ids, `f64` spin components).
    type Value: Send + Sync;
    /// Accepted replacement for one site.
    type Proposal: Send;

    /// Propose a new value for site `i` and run the acceptance test.
    /// `Some` means the proposal was accepted and must be committed.
    fn attempt(
        &self,
        lattice: &Lattice,
        values: &[Self::Value],
        i: usize,
        rng: &mut Xoshiro256StarStar,
        scratch: &mut Scratch,
    ) -> Option<Self::Proposal>;

    fn commit(&self, values: &mut [Self::Value], i: usize, proposal: Self::Proposal);
}
