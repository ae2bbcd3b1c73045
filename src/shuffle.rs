//! Randomized ordering shared by every game.
//!
//! All randomness flows through a caller-supplied [`Rng`] so sessions can be
//! seeded for reproducible play and deterministic tests.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` in place. `SliceRandom::shuffle` is a swap-based
/// Fisher–Yates pass, so every permutation is equally likely.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Return a shuffled copy, leaving the input untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}
