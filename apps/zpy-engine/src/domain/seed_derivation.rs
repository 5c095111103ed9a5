//! RNG seed derivation for deterministic dealing.
//!
//! A game holds one base seed; every shuffle derives its own seed from it so
//! that a replay with the same base seed reproduces every deal.

/// Seed for shuffling the seat order when the game starts.
pub fn derive_seating_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1)
}

/// Seed for the deck of one round.
///
/// `redeal_no` counts redeals within the round so a redeal never reproduces
/// the hand it replaced.
pub fn derive_dealing_seed(game_seed: u64, round_no: u32, redeal_no: u32) -> u64 {
    game_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add((redeal_no as u64).wrapping_mul(1_000))
        .wrapping_add(2)
}
