//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected so shuffles produce exact permutations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by `StdRng`.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Creates an RNG seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates an RNG with a fixed seed, for reproducible rehearsals.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}

/// Shuffles `items` in place with Fisher–Yates.
///
/// Draws one value in `[0, i]` for each `i` from `len - 1` down to `1`, so a
/// scripted RNG returning `i` at every step leaves the slice untouched.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn DeterministicRng) {
    for i in (1..items.len()).rev() {
        let upper = u32::try_from(i).unwrap_or(u32::MAX);
        let drawn = rng.next_u32_range(0, upper);
        let j = usize::try_from(drawn).map_or(i, |j| j.min(i));
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedRng(Vec<u32>);

    impl DeterministicRng for ScriptedRng {
        fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
            self.0.remove(0)
        }
    }

    #[test]
    fn test_shuffle_with_upper_bound_draws_keeps_order() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        let mut rng = ScriptedRng(vec![3, 2, 1]);

        shuffle(&mut items, &mut rng);

        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn test_shuffle_with_zero_draws_rotates() {
        let mut items = vec!['a', 'b', 'c'];
        let mut rng = ScriptedRng(vec![0, 0]);

        shuffle(&mut items, &mut rng);

        // [a,b,c] -> [c,b,a] -> [b,c,a]
        assert_eq!(items, vec!['b', 'c', 'a']);
    }

    #[test]
    fn test_shuffle_of_empty_and_single_draws_nothing() {
        let mut rng = ScriptedRng(Vec::new());
        let mut empty: Vec<u8> = Vec::new();
        let mut single = vec![7];

        shuffle(&mut empty, &mut rng);
        shuffle(&mut single, &mut rng);

        assert!(empty.is_empty());
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn test_seeded_system_rng_is_a_permutation() {
        let mut items: Vec<u32> = (0..20).collect();
        let mut rng = SystemRng::seeded(42);

        shuffle(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_system_rng_is_reproducible() {
        let mut first: Vec<u32> = (0..10).collect();
        let mut second = first.clone();

        shuffle(&mut first, &mut SystemRng::seeded(7));
        shuffle(&mut second, &mut SystemRng::seeded(7));

        assert_eq!(first, second);
    }
}
