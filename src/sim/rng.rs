//! Random source construction.
//!
//! Without a fixed seed, two runs over identical input produce different
//! (but equally bounded) flows. Pass a seed to get reproducible output.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Builds the run's random source: seeded when `seed` is given, otherwise
/// seeded from the operating system.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
