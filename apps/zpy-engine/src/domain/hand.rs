//! Hand queries: held tractors and follow legality.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank, Suit, TrumpMeta};
use super::combos::{Flight, Play, Shape, Tractor};
use super::pile::CardPile;

/// A pile owned by one player.
pub type Hand = CardPile;

/// Why a follow does not honor the lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FollowViolation {
    SizeMismatch { expected: usize, got: usize },
    /// Cards of the led suit were held but not played.
    SuitNotFollowed { suit: Suit },
    /// A tractor of a led shape was held in the led suit but not played.
    StructureNotFollowed { shape: Shape },
}

impl CardPile {
    /// Cards of one virtual suit as their own pile.
    pub fn suit_pile(&self, v_suit: Suit) -> CardPile {
        CardPile::from_cards(self.cards_in(v_suit).into_iter().map(|c| c.base()), self.tr())
    }

    /// Every held tractor of `shape` in `v_suit`, ascending by anchor.
    pub fn find_tractors(&self, v_suit: Suit, shape: Shape) -> Vec<Tractor> {
        let tr = self.tr();
        let ranks = tr.ranks_in(v_suit);
        let arity = shape.arity;
        let mut out = Vec::new();
        if shape.len == 0 || ranks.len() < shape.len {
            return out;
        }
        for run in ranks.windows(shape.len) {
            let mut natives: Option<Vec<Suit>> = None;
            let mut held = true;
            for &rank in run {
                if rank == Rank::OffSuitNatural {
                    let options: Vec<Suit> = Suit::NATURAL
                        .into_iter()
                        .filter(|&s| s != tr.suit)
                        .filter(|&s| {
                            self.count(Card::from_virt(v_suit, rank, Some(s), tr).base()) >= arity
                        })
                        .collect();
                    held &= !options.is_empty();
                    natives = Some(options);
                } else {
                    held &= self.count_slot(v_suit, rank) >= arity;
                }
                if !held {
                    break;
                }
            }
            if !held {
                continue;
            }
            let choices: Vec<Option<Suit>> = match natives {
                Some(options) => options.into_iter().map(Some).collect(),
                None => vec![None],
            };
            for osnt in choices {
                let anchor_osnt = (run[0] == Rank::OffSuitNatural).then_some(osnt).flatten();
                let anchor = Card::from_virt(v_suit, run[0], anchor_osnt, tr);
                if let Ok(t) = Tractor::new(shape, anchor, osnt, tr) {
                    out.push(t);
                }
            }
        }
        out
    }

    pub fn has_tractor(&self, v_suit: Suit, shape: Shape) -> bool {
        !self.find_tractors(v_suit, shape).is_empty()
    }

    fn take_tractor(&mut self, t: &Tractor) {
        let removed = self.remove_all(&t.bases(self.tr()));
        debug_assert!(removed, "took an unheld tractor");
    }

    /// Check `play` against `lead` for a player holding `self` before the play.
    ///
    /// Size is matched exactly. Led-suit cards must be played while held. Led
    /// shapes must be reproduced while a matching tractor is held, decaying to
    /// smaller shapes otherwise.
    pub fn follow_violation(&self, lead: &Flight, play: &Play) -> Option<FollowViolation> {
        let tr = self.tr();
        if play.size() != lead.size() {
            return Some(FollowViolation::SizeMismatch {
                expected: lead.size(),
                got: play.size(),
            });
        }
        let suit = lead.v_suit();
        let played_cards: Vec<Card> = play
            .cards(tr)
            .into_iter()
            .filter(|c| c.v_suit == suit)
            .collect();
        let required = self.count_suit(suit).min(lead.size());
        if played_cards.len() < required {
            return Some(FollowViolation::SuitNotFollowed { suit });
        }

        let mut held = self.suit_pile(suit);
        let mut played = CardPile::from_cards(played_cards.iter().map(|c| c.base()), tr);
        let mut pending: VecDeque<Shape> = lead.shapes().into();
        while let Some(shape) = pending.pop_front() {
            if let Some(t) = played.find_tractors(suit, shape).pop() {
                played.take_tractor(&t);
                held.take_tractor(&t);
                continue;
            }
            if held.has_tractor(suit, shape) {
                return Some(FollowViolation::StructureNotFollowed { shape });
            }
            // singles carry no structure beyond suit following
            if let Some((big, small)) = shape.decay() {
                for part in [small, big] {
                    if part.size() > 1 {
                        pending.push_front(part);
                    }
                }
            }
        }
        None
    }
}

/// Read a set of cards as a flight shaped like `lead`, if one exists.
///
/// Picks the highest tractor for each led shape in canonical order.
pub fn match_structure(cards: &[Card], lead: &Flight, tr: TrumpMeta) -> Option<Flight> {
    let first = cards.first()?;
    if cards.iter().any(|c| c.v_suit != first.v_suit) || cards.len() != lead.size() {
        return None;
    }
    let mut pile = CardPile::from_cards(cards.iter().map(|c| c.base()), tr);
    let mut tractors = Vec::with_capacity(lead.tractors().len());
    for shape in lead.shapes() {
        let t = pile.find_tractors(first.v_suit, shape).pop()?;
        pile.take_tractor(&t);
        tractors.push(t);
    }
    if !pile.is_empty() {
        return None;
    }
    Flight::new(tractors, tr).ok()
}
