//! Randomness injected into the simulator.
//!
//! The simulator draws every value through a boxed [`RngCore`], so callers
//! choose between an OS-seeded generator for normal runs and a fixed seed for
//! reproducible payloads.

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// The generator handle owned by a simulator.
pub type SharedRng = Box<dyn RngCore + Send>;

/// Generator seeded from the operating system.
pub fn from_os() -> SharedRng {
    Box::new(StdRng::from_os_rng())
}

/// Generator with a fixed seed. Same seed, same sequence.
pub fn seeded(seed: u64) -> SharedRng {
    Box::new(StdRng::seed_from_u64(seed))
}

/// `seeded` when a seed is given, `from_os` otherwise.
pub fn from_seed(seed: Option<u64>) -> SharedRng {
    match seed {
        Some(seed) => seeded(seed),
        None => from_os(),
    }
}

/// `len` characters drawn from `[A-Za-z0-9]`, upper-cased.
pub fn alphanumeric_upper<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
        .collect()
}
