//! Perturbation sources for the degenerate-distance path.
//!
//! When two nodes are closer than [`COINCIDENCE_THRESHOLD`], the force laws
//! replace their separation with a small random vector so that the direction
//! is defined and the pair does not stay stuck together. The random stream is
//! an explicit dependency of every force evaluation: a seeded source makes
//! runs reproducible, an entropy-seeded source is meant for production use.
//!
//! Every component is drawn from `[PERTURBATION_MIN, PERTURBATION_MAX)`, so a
//! perturbation vector is never shorter than `PERTURBATION_MIN`.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Separations shorter than this take the perturbation path.
pub const COINCIDENCE_THRESHOLD: f32 = 0.1;

/// Lower bound (inclusive) of each perturbation component.
pub const PERTURBATION_MIN: f32 = 0.1;

/// Upper bound (exclusive) of each perturbation component.
pub const PERTURBATION_MAX: f32 = 0.2;

/// A source of perturbation components.
pub trait PerturbationSource: Send + Sync {
    /// Draw one component in `[PERTURBATION_MIN, PERTURBATION_MAX)`.
    fn sample(&mut self) -> f32;

    /// Derive an independent source for `stream`.
    ///
    /// The same `self` and `stream` always produce the same sequence, which
    /// keeps parallel runs independent of thread scheduling.
    fn fork(&self, stream: u64) -> Self
    where
        Self: Sized;

    /// Draw a full perturbation vector.
    fn vector<const D: usize>(&mut self) -> [f32; D]
    where
        Self: Sized,
    {
        std::array::from_fn(|_| self.sample())
    }
}

fn band() -> Uniform<f32> {
    Uniform::new(PERTURBATION_MIN, PERTURBATION_MAX)
}

/// Reproducible perturbations from a ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct SeededPerturbation {
    seed: u64,
    rng: ChaCha8Rng,
    band: Uniform<f32>,
}

impl SeededPerturbation {
    /// Create a source; equal seeds yield equal sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            band: band(),
        }
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PerturbationSource for SeededPerturbation {
    fn sample(&mut self) -> f32 {
        self.band.sample(&mut self.rng)
    }

    fn fork(&self, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        // Stream 0 belongs to the parent.
        rng.set_stream(stream.wrapping_add(1));
        Self {
            seed: self.seed,
            rng,
            band: band(),
        }
    }
}

/// Perturbations seeded from operating-system entropy.
#[derive(Debug, Clone)]
pub struct EntropyPerturbation {
    base: u64,
    rng: SmallRng,
    band: Uniform<f32>,
}

impl EntropyPerturbation {
    /// Create a source from fresh entropy.
    pub fn new() -> Self {
        let mut rng = SmallRng::from_entropy();
        let base = rng.next_u64();
        Self {
            base,
            rng,
            band: band(),
        }
    }
}

impl Default for EntropyPerturbation {
    fn default() -> Self {
        Self::new()
    }
}

impl PerturbationSource for EntropyPerturbation {
    fn sample(&mut self) -> f32 {
        self.band.sample(&mut self.rng)
    }

    fn fork(&self, stream: u64) -> Self {
        let seed = self.base ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self {
            base: self.base,
            rng: SmallRng::seed_from_u64(seed),
            band: band(),
        }
    }
}
