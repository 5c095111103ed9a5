//! Deck construction, seeded shuffles and deal sizing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::cards_logic::SINGLE_DECK;
use super::cards_types::CardBase;
use super::state::PlayerId;

/// Smallest kitty the deal may leave.
pub const MIN_KITTY: usize = 5;

/// `ndecks` physical decks, unshuffled.
pub fn build_deck(ndecks: usize) -> Vec<CardBase> {
    let mut deck = Vec::with_capacity(SINGLE_DECK.len() * ndecks);
    for _ in 0..ndecks {
        deck.extend(SINGLE_DECK.iter().copied());
    }
    deck
}

pub fn shuffled_deck(ndecks: usize, seed: u64) -> Vec<CardBase> {
    let mut deck = build_deck(ndecks);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    deck
}

pub fn shuffle_seats(players: &[PlayerId], seed: u64) -> Vec<PlayerId> {
    let mut order = players.to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

/// Cards held out of the draw: the deal remainder, grown by whole rounds of
/// the table until it reaches `MIN_KITTY`.
pub fn kitty_size(ndecks: usize, nplayers: usize) -> usize {
    let total = SINGLE_DECK.len() * ndecks;
    let mut kitty = total % nplayers;
    while kitty < MIN_KITTY && kitty + nplayers <= total {
        kitty += nplayers;
    }
    kitty
}

pub fn hand_size(ndecks: usize, nplayers: usize) -> usize {
    (SINGLE_DECK.len() * ndecks - kitty_size(ndecks, nplayers)) / nplayers
}
