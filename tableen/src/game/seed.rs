//! Deterministic seeds derived from a match seed.
//!
//! A match is reproducible from its settings, its seed and the actions
//! played: every round reshuffles from a seed that depends only on the match
//! seed and the round number.

use rand::{SeedableRng, rngs::StdRng};

use super::{
    cards::{Deck, DeckVariant},
    seat::Seat,
};

/// Seed for shuffling the deck of `round` (1-based).
#[must_use]
pub const fn derive_dealing_seed(match_seed: u64, round: u32) -> u64 {
    match_seed
        .wrapping_add((round as u64).wrapping_mul(1_000_000))
        .wrapping_add(2)
}

/// Seed for a scripted player sitting in `seat`.
#[must_use]
pub const fn derive_player_seed(match_seed: u64, seat: Seat) -> u64 {
    let offset = match seat {
        Seat::A => 100,
        Seat::B => 200,
    };
    match_seed.wrapping_add(offset).wrapping_add(1)
}

/// The shuffled deck for `round` of a match.
#[must_use]
pub fn round_deck(variant: DeckVariant, match_seed: u64, round: u32) -> Deck {
    let mut rng = StdRng::seed_from_u64(derive_dealing_seed(match_seed, round));
    Deck::shuffled(variant, &mut rng)
}
