use rand::Rng;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256StarStar;

use super::{Scratch, SiteModel};
use crate::geometry::Lattice;
use crate::mcmc::metropolis;

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Sum of the neighbor spins of a site, written into `h` (length `arity`).
#[inline]
pub fn local_field(values: &[f64], arity: usize, neighbors: &[usize], h: &mut [f64]) {
    h.fill(0.0);
    for &j in neighbors {
        for (hc, &s) in h.iter_mut().zip(&values[j * arity..(j + 1) * arity]) {
            *hc += s;
        }
    }
}

/// Fill `out` with a vector drawn uniformly from the unit sphere.
///
/// Gaussian components normalized to unit length; the draw is repeated in the
/// measure-zero case of a vanishing norm.
pub fn random_unit(rng: &mut Xoshiro256StarStar, out: &mut [f64]) {
    loop {
        for x in out.iter_mut() {
            *x = rng.sample(StandardNormal);
        }
        let norm = out.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > f64::MIN_POSITIVE {
            for x in out.iter_mut() {
                *x /= norm;
            }
            return;
        }
    }
}

/// Classical Heisenberg model with exchange energy `-J s_i . s_j` per bond.
/// Proposals are fresh uniform orientations, independent of the old spin.
#[derive(Debug, Clone, Copy)]
pub struct Heisenberg {
    pub arity: usize,
    pub coupling: f64,
    pub temperature: f64,
}

impl SiteModel for Heisenberg {
    type Value = f64;
    type Proposal = Vec<f64>;

    #[inline]
    fn attempt(
        &self,
        lattice: &Lattice,
        values: &[f64],
        i: usize,
        rng: &mut Xoshiro256StarStar,
        scratch: &mut Scratch,
    ) -> Option<Vec<f64>> {
        let k = self.arity;
        lattice.neighbors_into(i, &mut scratch.neighbors);
        if scratch.neighbors.is_empty() || k == 0 {
            return None;
        }

        scratch.field.resize(k, 0.0);
        scratch.trial.resize(k, 0.0);
        local_field(values, k, &scratch.neighbors, &mut scratch.field);
        random_unit(rng, &mut scratch.trial);

        let current = &values[i * k..(i + 1) * k];
        let delta = -self.coupling * (dot(&scratch.trial, &scratch.field) - dot(current, &scratch.field));
        metropolis::accept(delta, self.temperature, rng).then(|| scratch.trial.clone())
    }

    #[inline]
    fn commit(&self, values: &mut [f64], i: usize, spin: Vec<f64>) {
        let k = self.arity;
        values[i * k..(i + 1) * k].copy_from_slice(&spin);
    }
}
