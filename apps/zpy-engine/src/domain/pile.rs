//! CardPile: a multiset of cards indexed by virtual (suit, rank).
//!
//! Slot layout: one row of `ROW_WIDTH` slots per natural suit (ranks 2..=A),
//! then the trump row, which extends past the ace with the off-suit natural,
//! on-suit natural and joker slots. Off-suit naturals from different native
//! suits share one slot; `counts_osnt` keeps the per-suit breakdown.

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, CardBase, Rank, Suit, TrumpMeta};

pub const ROW_WIDTH: usize = 13;
pub const TRUMP_ROW: usize = 4 * ROW_WIDTH;
pub const IDX_OFF_SUIT_NATURAL: usize = TRUMP_ROW + ROW_WIDTH;
pub const IDX_ON_SUIT_NATURAL: usize = IDX_OFF_SUIT_NATURAL + 1;
pub const IDX_SMALL_JOKER: usize = IDX_ON_SUIT_NATURAL + 1;
pub const IDX_BIG_JOKER: usize = IDX_SMALL_JOKER + 1;
pub const SLOTS: usize = IDX_BIG_JOKER + 1;

/// Slot index of a virtual (suit, rank).
#[inline]
pub fn slot_of(v_suit: Suit, v_rank: Rank) -> usize {
    v_suit.index() * ROW_WIDTH + (v_rank.value() - Rank::MIN) as usize
}

#[inline]
fn row_slot(suit: Suit, rank: Rank) -> usize {
    debug_assert!(rank.is_natural());
    slot_of(suit, rank)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PileRepr", into = "PileRepr")]
pub struct CardPile {
    tr: TrumpMeta,
    counts: [u32; SLOTS],
    counts_osnt: [u32; 4],
    suit_counts: [u32; Suit::COUNT],
    size: usize,
}

#[derive(Serialize, Deserialize)]
struct PileRepr {
    tr: TrumpMeta,
    cards: Vec<CardBase>,
}

impl From<PileRepr> for CardPile {
    fn from(repr: PileRepr) -> Self {
        CardPile::from_cards(repr.cards, repr.tr)
    }
}

impl From<CardPile> for PileRepr {
    fn from(pile: CardPile) -> Self {
        PileRepr {
            tr: pile.tr,
            cards: pile.bases(),
        }
    }
}

impl CardPile {
    pub fn new(tr: TrumpMeta) -> Self {
        Self {
            tr,
            counts: [0; SLOTS],
            counts_osnt: [0; 4],
            suit_counts: [0; Suit::COUNT],
            size: 0,
        }
    }

    pub fn from_cards<I>(cards: I, tr: TrumpMeta) -> Self
    where
        I: IntoIterator<Item = CardBase>,
    {
        let mut pile = Self::new(tr);
        for card in cards {
            pile.insert(card);
        }
        pile
    }

    #[inline]
    pub fn tr(&self) -> TrumpMeta {
        self.tr
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Virtualize a physical card under this pile's trump.
    #[inline]
    pub fn card(&self, base: CardBase) -> Card {
        base.virtualize(self.tr)
    }

    pub fn insert(&mut self, base: CardBase) {
        self.insert_n(base, 1);
    }

    pub fn insert_n(&mut self, base: CardBase, n: u32) {
        if n == 0 {
            return;
        }
        let card = self.card(base);
        self.counts[slot_of(card.v_suit, card.v_rank)] += n;
        if let Some(native) = card.osnt_suit() {
            self.counts_osnt[native.index()] += n;
        }
        self.suit_counts[card.v_suit.index()] += n;
        self.size += n as usize;
    }

    pub fn insert_all<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = CardBase>,
    {
        for card in cards {
            self.insert(card);
        }
    }

    /// Remove `n` copies of `base`. Leaves the pile untouched and returns
    /// false when fewer than `n` are held.
    pub fn remove_n(&mut self, base: CardBase, n: u32) -> bool {
        if self.count(base) < n as usize {
            return false;
        }
        let card = self.card(base);
        self.counts[slot_of(card.v_suit, card.v_rank)] -= n;
        if let Some(native) = card.osnt_suit() {
            self.counts_osnt[native.index()] -= n;
        }
        self.suit_counts[card.v_suit.index()] -= n;
        self.size -= n as usize;
        true
    }

    pub fn remove(&mut self, base: CardBase) -> bool {
        self.remove_n(base, 1)
    }

    /// Remove every card in `cards`, all or nothing.
    pub fn remove_all(&mut self, cards: &[CardBase]) -> bool {
        if !self.contains_cards(cards) {
            return false;
        }
        for &card in cards {
            let removed = self.remove(card);
            debug_assert!(removed);
        }
        true
    }

    /// Number of copies of one physical card.
    pub fn count(&self, base: CardBase) -> usize {
        let card = self.card(base);
        match card.osnt_suit() {
            Some(native) => self.counts_osnt[native.index()] as usize,
            None => self.counts[slot_of(card.v_suit, card.v_rank)] as usize,
        }
    }

    /// Number of cards in one virtual slot, across native suits.
    #[inline]
    pub fn count_slot(&self, v_suit: Suit, v_rank: Rank) -> usize {
        self.counts[slot_of(v_suit, v_rank)] as usize
    }

    #[inline]
    pub fn count_suit(&self, v_suit: Suit) -> usize {
        self.suit_counts[v_suit.index()] as usize
    }

    /// True iff every (card, n) requirement is covered.
    pub fn contains(&self, required: &[(CardBase, usize)]) -> bool {
        let mut tally: Vec<(CardBase, usize)> = Vec::with_capacity(required.len());
        for &(card, n) in required {
            match tally.iter_mut().find(|(c, _)| *c == card) {
                Some((_, total)) => *total += n,
                None => tally.push((card, n)),
            }
        }
        tally.iter().all(|&(card, n)| self.count(card) >= n)
    }

    /// Multiset containment of a list of physical cards.
    pub fn contains_cards(&self, cards: &[CardBase]) -> bool {
        let required: Vec<(CardBase, usize)> = cards.iter().map(|&c| (c, 1)).collect();
        self.contains(&required)
    }

    /// (card, count) for every held physical card, ascending and grouped by
    /// virtual suit.
    pub fn gen_counts(&self) -> Vec<(Card, usize)> {
        let mut out = Vec::new();
        for v_suit in Suit::NATURAL.into_iter().chain([Suit::Trump]) {
            if self.count_suit(v_suit) == 0 {
                continue;
            }
            for v_rank in self.tr.ranks_in(v_suit) {
                let n = self.count_slot(v_suit, v_rank);
                if n == 0 {
                    continue;
                }
                if v_rank == Rank::OffSuitNatural {
                    for native in Suit::NATURAL {
                        let k = self.counts_osnt[native.index()] as usize;
                        if k > 0 {
                            out.push((Card::from_virt(v_suit, v_rank, Some(native), self.tr), k));
                        }
                    }
                } else {
                    out.push((Card::from_virt(v_suit, v_rank, None, self.tr), n));
                }
            }
        }
        out
    }

    /// Every held card, expanded, in `gen_counts` order.
    pub fn gen_cards(&self) -> Vec<Card> {
        self.gen_counts()
            .into_iter()
            .flat_map(|(card, n)| std::iter::repeat(card).take(n))
            .collect()
    }

    pub fn bases(&self) -> Vec<CardBase> {
        self.gen_cards().into_iter().map(|c| c.base()).collect()
    }

    /// Held cards of one virtual suit.
    pub fn cards_in(&self, v_suit: Suit) -> Vec<Card> {
        self.gen_cards()
            .into_iter()
            .filter(|c| c.v_suit == v_suit)
            .collect()
    }

    fn shift(&mut self, from: usize, to: usize) -> u32 {
        let n = self.counts[from];
        self.counts[from] = 0;
        self.counts[to] += n;
        n
    }

    fn move_suit_total(&mut self, from: Suit, to: Suit, n: u32) {
        self.suit_counts[from.index()] -= n;
        self.suit_counts[to.index()] += n;
    }

    /// Reclassify every held card for a new trump, in place.
    pub fn rehash(&mut self, new: TrumpMeta) {
        let old = self.tr;
        if old == new {
            return;
        }
        let suit_moved = old.suit != new.suit;
        let natural_moved = suit_moved || old.rank != new.rank;

        // 1. old trump suit returns to its native row
        if suit_moved && old.has_trump_suit() {
            for rank in Rank::NATURAL {
                let n = self.shift(slot_of(Suit::Trump, rank), row_slot(old.suit, rank));
                self.move_suit_total(Suit::Trump, old.suit, n);
            }
        }

        // 2. old natural trumps return to their native rows
        if natural_moved && old.has_natural_rank() {
            if old.has_trump_suit() {
                if suit_moved {
                    let n = self.shift(IDX_ON_SUIT_NATURAL, row_slot(old.suit, old.rank));
                    self.move_suit_total(Suit::Trump, old.suit, n);
                } else {
                    self.shift(IDX_ON_SUIT_NATURAL, slot_of(Suit::Trump, old.rank));
                }
            }
            for native in Suit::NATURAL {
                let n = std::mem::take(&mut self.counts_osnt[native.index()]);
                self.counts[row_slot(native, old.rank)] += n;
                self.move_suit_total(Suit::Trump, native, n);
            }
            self.counts[IDX_OFF_SUIT_NATURAL] = 0;
        }

        // 3. new trump suit moves into the trump row
        if suit_moved && new.has_trump_suit() {
            for rank in Rank::NATURAL {
                let n = self.shift(row_slot(new.suit, rank), slot_of(Suit::Trump, rank));
                self.move_suit_total(new.suit, Suit::Trump, n);
            }
        }

        // 4. new natural trumps split into on-suit and off-suit
        if natural_moved && new.has_natural_rank() {
            if new.has_trump_suit() {
                self.shift(slot_of(Suit::Trump, new.rank), IDX_ON_SUIT_NATURAL);
            }
            for native in Suit::NATURAL {
                if native == new.suit {
                    continue;
                }
                let n = self.shift(row_slot(native, new.rank), IDX_OFF_SUIT_NATURAL);
                self.counts_osnt[native.index()] += n;
                self.move_suit_total(native, Suit::Trump, n);
            }
        }

        self.tr = new;
        debug_assert!(self.is_consistent(), "rehash broke pile invariants");
    }

    /// Slot totals agree with suit totals, the off-suit breakdown and size.
    pub fn is_consistent(&self) -> bool {
        let total: u32 = self.counts.iter().sum();
        if total as usize != self.size {
            return false;
        }
        let suits_ok = Suit::NATURAL.into_iter().chain([Suit::Trump]).all(|s| {
            let row = s.index() * ROW_WIDTH;
            let width = if s == Suit::Trump { SLOTS - TRUMP_ROW } else { ROW_WIDTH };
            let sum: u32 = self.counts[row..row + width].iter().sum();
            sum == self.suit_counts[s.index()]
        });
        let osnt: u32 = self.counts_osnt.iter().sum();
        suits_ok && osnt == self.counts[IDX_OFF_SUIT_NATURAL]
    }
}
