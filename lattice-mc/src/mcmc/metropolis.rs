use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

/// Metropolis acceptance for an energy change `delta` at temperature `temp`.
///
/// Moves that do not raise the energy are always taken. Uphill moves consume
/// one uniform draw and pass with probability `exp(-delta / temp)`; at
/// `temp = 0` they never pass.
#[inline]
pub fn accept(delta: f64, temp: f64, rng: &mut Xoshiro256StarStar) -> bool {
    if delta <= 0.0 {
        return true;
    }
    if temp <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < (-delta / temp).exp()
}
