// Proptest generators for domain types.

use proptest::prelude::*;

use super::cards_logic::SINGLE_DECK;
use super::cards_types::{CardBase, Rank, Suit, TrumpMeta};

/// A natural suit
pub fn natural_suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::NATURAL.to_vec())
}

/// A natural rank, 2 through ace
pub fn natural_rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(Rank::NATURAL.to_vec())
}

/// Any physical card, jokers included
pub fn card_base() -> impl Strategy<Value = CardBase> {
    prop::sample::select(SINGLE_DECK.to_vec())
}

/// Any trump designation: a trump suit or none, a natural rank or none.
pub fn trump_meta() -> impl Strategy<Value = TrumpMeta> {
    prop_oneof![
        4 => (natural_suit(), natural_rank()).prop_map(|(s, r)| TrumpMeta::new(s, r)),
        2 => natural_rank().prop_map(TrumpMeta::undetermined),
        1 => Just(TrumpMeta::new(Suit::Trump, Rank::BigJoker)),
    ]
}

/// Up to `max` physical cards drawn from two decks' worth of copies.
pub fn card_bases(max: usize) -> impl Strategy<Value = Vec<CardBase>> {
    prop::collection::vec(card_base(), 0..=max)
}
