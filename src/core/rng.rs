//! Deterministic random number generation for deck building.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical boards
//! - **Uniform**: Fisher-Yates shuffles, every permutation equally likely
//! - **Observable**: the stream position shows whether randomness was used
//!
//! ```
//! use rust_memory::core::GameRng;
//!
//! let mut rng1 = GameRng::new(42);
//! let mut rng2 = GameRng::new(42);
//!
//! let mut a = vec![1, 2, 3, 4, 5, 6];
//! let mut b = a.clone();
//! rng1.shuffle(&mut a);
//! rng2.shuffle(&mut b);
//! assert_eq!(a, b);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Pick `amount` distinct elements, uniformly, in random order.
    ///
    /// Returns `None` if the slice has fewer than `amount` elements.
    pub fn sample<T: Clone>(&mut self, slice: &[T], amount: usize) -> Option<Vec<T>> {
        if amount > slice.len() {
            return None;
        }
        Some(
            slice
                .choose_multiple(&mut self.inner, amount)
                .cloned()
                .collect(),
        )
    }

    /// Words drawn from the ChaCha8 stream so far.
    #[must_use]
    pub fn word_pos(&self) -> u128 {
        self.inner.get_word_pos()
    }
}
