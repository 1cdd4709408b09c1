//! Reproducible random input arrays.
//!
//! Given the same seed, the same array is produced, so a generated trace
//! can be regenerated exactly.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Smallest value drawn by [`random_values`].
pub const MIN_VALUE: i64 = 1;
/// Largest value drawn by [`random_values`].
pub const MAX_VALUE: i64 = 99;

/// Draws `len` values in `MIN_VALUE..=MAX_VALUE` from a ChaCha8 stream
/// seeded with `seed`.
pub fn random_values(len: usize, seed: u64) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.gen_range(MIN_VALUE..=MAX_VALUE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        assert_eq!(random_values(16, 7), random_values(16, 7));
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(random_values(32, 1), random_values(32, 2));
    }

    #[test]
    fn test_values_in_range() {
        let values = random_values(200, 99);
        assert_eq!(values.len(), 200);
        assert!(values.iter().all(|v| (MIN_VALUE..=MAX_VALUE).contains(v)));
    }
}
