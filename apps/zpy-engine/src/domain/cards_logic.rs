//! Card game logic: comparing card strength, point values, deck construction

use std::cmp::Ordering;

use once_cell::sync::Lazy;

use super::cards_types::{Card, CardBase, Rank, Suit};

/// One physical deck: 52 naturals followed by the two jokers.
pub static SINGLE_DECK: Lazy<Vec<CardBase>> = Lazy::new(|| {
    let mut deck = Vec::with_capacity(54);
    for suit in Suit::NATURAL {
        for rank in Rank::NATURAL {
            deck.push(CardBase::new(suit, rank));
        }
    }
    deck.push(CardBase::SMALL_JOKER);
    deck.push(CardBase::BIG_JOKER);
    deck
});

/// Trick strength of `l` relative to `r`.
///
/// Trump beats non-trump unconditionally. Two non-trump cards of different
/// suits are incomparable and yield `None`.
pub fn compare(l: &Card, r: &Card) -> Option<Ordering> {
    if l.v_suit == r.v_suit {
        return Some(l.v_rank.cmp(&r.v_rank));
    }
    match (l.is_trump(), r.is_trump()) {
        (true, false) => Some(Ordering::Greater),
        (false, true) => Some(Ordering::Less),
        _ => None,
    }
}

/// Whether `a` strictly beats `b`.
pub fn card_beats(a: &Card, b: &Card) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

pub fn point_value(rank: Rank) -> u32 {
    match rank {
        Rank::Five => 5,
        Rank::Ten | Rank::King => 10,
        _ => 0,
    }
}

/// Total points across a set of physical cards.
pub fn total_points<'a, I>(cards: I) -> u32
where
    I: IntoIterator<Item = &'a CardBase>,
{
    cards.into_iter().map(|c| point_value(c.rank)).sum()
}
