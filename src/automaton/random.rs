//! Injected random stream for the stochastic growth rules.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{AutomataError, Result};

/// Source of uniform draws consumed by the stochastic rules.
///
/// Implemented for every [`RngCore`]; tests can supply scripted streams.
pub trait RandomStream {
    /// A uniform draw, expected in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// A uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RngCore> RandomStream for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Seeded stream used by [`crate::Simulation`].
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw once and reject values outside `[0, 1)`.
pub(crate) fn draw<S: RandomStream + ?Sized>(stream: &mut S) -> Result<f64> {
    let u = stream.next_unit();
    if !(0.0..1.0).contains(&u) {
        return Err(AutomataError::RandomSource(u));
    }
    Ok(u)
}

/// Pick an index and reject values outside `0..len`.
pub(crate) fn pick<S: RandomStream + ?Sized>(stream: &mut S, len: usize) -> Result<usize> {
    let i = stream.pick(len);
    if i >= len {
        return Err(AutomataError::RandomSource(i as f64));
    }
    Ok(i)
}
