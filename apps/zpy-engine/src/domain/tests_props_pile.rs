//! Property tests for `CardPile`.
//!
//! - rehash preserves size and stays consistent
//! - rehash agrees with building the pile afresh under the new trump
//! - rehash round-trips
//! - removing what was inserted restores the pile

use proptest::prelude::*;

use super::pile::CardPile;
use super::test_gens::{card_bases, trump_meta};
use super::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_rehash_preserves_size(
        cards in card_bases(60),
        from in trump_meta(),
        to in trump_meta(),
    ) {
        let mut pile = CardPile::from_cards(cards.clone(), from);
        pile.rehash(to);
        prop_assert_eq!(pile.size(), cards.len());
        prop_assert!(pile.is_consistent());
        prop_assert_eq!(pile.tr(), to);
    }

    #[test]
    fn prop_rehash_matches_fresh_build(
        cards in card_bases(60),
        from in trump_meta(),
        to in trump_meta(),
    ) {
        let mut pile = CardPile::from_cards(cards.clone(), from);
        pile.rehash(to);
        prop_assert_eq!(pile, CardPile::from_cards(cards, to));
    }

    #[test]
    fn prop_rehash_round_trips(
        cards in card_bases(60),
        from in trump_meta(),
        to in trump_meta(),
    ) {
        let original = CardPile::from_cards(cards, from);
        let mut pile = original.clone();
        pile.rehash(to);
        pile.rehash(from);
        prop_assert_eq!(pile, original);
    }

    #[test]
    fn prop_insert_then_remove_restores(
        base in card_bases(30),
        extra in card_bases(10),
        tr in trump_meta(),
    ) {
        let original = CardPile::from_cards(base, tr);
        let mut pile = original.clone();
        pile.insert_all(extra.iter().copied());
        prop_assert!(pile.contains_cards(&extra));
        prop_assert!(pile.remove_all(&extra));
        prop_assert_eq!(pile, original);
    }
}
