use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use super::{Scratch, SiteModel};
use crate::geometry::Lattice;
use crate::mcmc::metropolis;

/// Interfacial energy of grain id `id` at a site: the number of neighbors
/// (with multiplicity) carrying a different id.
#[inline]
pub fn mismatches(spins: &[i32], neighbors: &[usize], id: i32) -> usize {
    neighbors.iter().filter(|&&j| spins[j] != id).count()
}

/// Grain-growth Potts model. Candidate ids are drawn from the neighbors of
/// the chosen site, so a grain can only grow into adjacent territory.
#[derive(Debug, Clone, Copy)]
pub struct Potts {
    pub temperature: f64,
}

impl SiteModel for Potts {
    type Value = i32;
    type Proposal = i32;

    #[inline]
    fn attempt(
        &self,
        lattice: &Lattice,
        spins: &[i32],
        i: usize,
        rng: &mut Xoshiro256StarStar,
        scratch: &mut Scratch,
    ) -> Option<i32> {
        lattice.neighbors_into(i, &mut scratch.neighbors);
        let neighbors = &scratch.neighbors;
        if neighbors.is_empty() {
            return None;
        }

        let current = spins[i];
        let candidate = spins[neighbors[rng.gen_range(0..neighbors.len())]];
        if candidate == current {
            return None;
        }

        let delta = mismatches(spins, neighbors, candidate) as f64
            - mismatches(spins, neighbors, current) as f64;
        metropolis::accept(delta, self.temperature, rng).then_some(candidate)
    }

    #[inline]
    fn commit(&self, spins: &mut [i32], i: usize, id: i32) {
        spins[i] = id;
    }
}
