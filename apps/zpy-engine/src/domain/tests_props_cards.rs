//! Property tests for the card model.
//!
//! - devirt(virt(card)) is the identity, given the native suit of off-suit naturals
//! - comparison is reflexive and antisymmetric
//! - trump always beats non-trump

use std::cmp::Ordering;

use proptest::prelude::*;

use super::cards_logic::compare;
use super::cards_types::{Card, Rank};
use super::test_gens::{card_base, trump_meta};
use super::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_devirt_inverts_virt(base in card_base(), tr in trump_meta()) {
        let (v_suit, v_rank) = tr.virt(base.suit, base.rank);
        let osnt = (v_rank == Rank::OffSuitNatural).then_some(base.suit);
        prop_assert_eq!(tr.devirt(v_suit, v_rank, osnt), (base.suit, base.rank));

        let card = base.virtualize(tr);
        let rebuilt = Card::from_virt(card.v_suit, card.v_rank, card.osnt_suit(), tr);
        prop_assert!(rebuilt.identical(&card));
    }

    #[test]
    fn prop_compare_is_reflexive(base in card_base(), tr in trump_meta()) {
        let card = base.virtualize(tr);
        prop_assert_eq!(compare(&card, &card), Some(Ordering::Equal));
    }

    #[test]
    fn prop_compare_is_antisymmetric(
        a in card_base(),
        b in card_base(),
        tr in trump_meta(),
    ) {
        let (a, b) = (a.virtualize(tr), b.virtualize(tr));
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).map(Ordering::reverse));
    }

    #[test]
    fn prop_trump_beats_plain(a in card_base(), b in card_base(), tr in trump_meta()) {
        let (a, b) = (a.virtualize(tr), b.virtualize(tr));
        if a.is_trump() && !b.is_trump() {
            prop_assert_eq!(compare(&a, &b), Some(Ordering::Greater));
        }
    }
}
