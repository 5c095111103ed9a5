//! Core card-related types: Suit, Rank, TrumpMeta, CardBase, Card
//!
//! A `CardBase` is a physical card. A `Card` additionally carries its virtual
//! (trump-relative) suit and rank under one `TrumpMeta`; all comparisons and
//! combo detection happen in virtual space.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Spades,
    Hearts,
    /// Virtual trump suit; also the physical suit of jokers.
    Trump,
}

impl Suit {
    pub const NATURAL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Spades, Suit::Hearts];
    pub const COUNT: usize = 5;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_natural(self) -> bool {
        self != Suit::Trump
    }
}

/// Card rank.
///
/// Values 2..=14 are natural ranks. The two natural-trump ranks are virtual
/// only and never appear on a physical card; jokers are physical cards of
/// suit `Trump`.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    OffSuitNatural,
    OnSuitNatural,
    SmallJoker,
    BigJoker,
}

impl Rank {
    pub const NATURAL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];
    pub const MIN: u8 = Rank::Two as u8;
    pub const MAX: u8 = Rank::BigJoker as u8;

    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(v: u8) -> Option<Rank> {
        use Rank as R;
        let rank = match v {
            2 => R::Two,
            3 => R::Three,
            4 => R::Four,
            5 => R::Five,
            6 => R::Six,
            7 => R::Seven,
            8 => R::Eight,
            9 => R::Nine,
            10 => R::Ten,
            11 => R::Jack,
            12 => R::Queen,
            13 => R::King,
            14 => R::Ace,
            15 => R::OffSuitNatural,
            16 => R::OnSuitNatural,
            17 => R::SmallJoker,
            18 => R::BigJoker,
            _ => return None,
        };
        Some(rank)
    }

    #[inline]
    pub fn is_natural(self) -> bool {
        self <= Rank::Ace
    }

    #[inline]
    pub fn is_joker(self) -> bool {
        matches!(self, Rank::SmallJoker | Rank::BigJoker)
    }

    #[inline]
    pub fn is_natural_trump_marker(self) -> bool {
        matches!(self, Rank::OffSuitNatural | Rank::OnSuitNatural)
    }
}

/// Trump selection for a round.
///
/// - `(Hearts, Two)`: normal round, rank 2, hearts trump
/// - `(Trump, Queen)`: no trump suit, natural trumps (queens) and jokers only
/// - `(Trump, BigJoker)`: only jokers are trump
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TrumpMeta {
    pub suit: Suit,
    pub rank: Rank,
}

impl TrumpMeta {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Trump while no suit has been fixed: natural trumps and jokers only.
    pub const fn undetermined(rank: Rank) -> Self {
        Self::new(Suit::Trump, rank)
    }

    #[inline]
    pub fn has_trump_suit(&self) -> bool {
        self.suit.is_natural()
    }

    #[inline]
    pub fn has_natural_rank(&self) -> bool {
        self.rank.is_natural()
    }

    /// Map a physical (suit, rank) to its virtual (suit, rank).
    pub fn virt(&self, suit: Suit, rank: Rank) -> (Suit, Rank) {
        if rank.is_joker() {
            return (Suit::Trump, rank);
        }
        if suit == self.suit {
            if rank == self.rank {
                (Suit::Trump, Rank::OnSuitNatural)
            } else {
                (Suit::Trump, rank)
            }
        } else if rank == self.rank {
            (Suit::Trump, Rank::OffSuitNatural)
        } else {
            (suit, rank)
        }
    }

    /// Inverse of `virt`.
    ///
    /// # Panics
    ///
    /// Panics when asked to devirtualize an off-suit natural trump without its
    /// native suit; the virtual slot is shared by several physical cards.
    pub fn devirt(&self, v_suit: Suit, v_rank: Rank, osnt_suit: Option<Suit>) -> (Suit, Rank) {
        match v_rank {
            Rank::OffSuitNatural => {
                let suit = osnt_suit.unwrap_or_else(|| {
                    panic!("devirt of off-suit natural trump requires its native suit ({self:?})")
                });
                return (suit, self.rank);
            }
            Rank::OnSuitNatural => return (self.suit, self.rank),
            _ => {}
        }
        if v_suit == Suit::Trump && !v_rank.is_joker() {
            (self.suit, v_rank)
        } else {
            (v_suit, v_rank)
        }
    }

    /// Increment a virtual rank, hopping over the trump rank's hole.
    ///
    /// Keeps counting through the synthetic ranks; `None` past the big joker.
    pub fn inc_rank(&self, rank: Rank) -> Option<Rank> {
        let mut next = rank.value() + 1;
        if next == self.rank.value() && self.has_natural_rank() {
            next += 1;
        }
        Rank::from_value(next)
    }

    /// Whether virtual rank `rank` can hold cards in virtual suit `v_suit`.
    pub fn rank_exists_in(&self, v_suit: Suit, rank: Rank) -> bool {
        if v_suit.is_natural() {
            return v_suit != self.suit && rank.is_natural() && rank != self.rank;
        }
        match rank {
            Rank::OffSuitNatural => self.has_natural_rank(),
            Rank::OnSuitNatural => self.has_natural_rank() && self.has_trump_suit(),
            Rank::SmallJoker | Rank::BigJoker => true,
            natural => self.has_trump_suit() && natural != self.rank,
        }
    }

    /// Next virtual rank after `rank` that exists in `v_suit`.
    pub fn succ(&self, v_suit: Suit, rank: Rank) -> Option<Rank> {
        let mut next = self.inc_rank(rank)?;
        while !self.rank_exists_in(v_suit, next) {
            next = self.inc_rank(next)?;
        }
        Some(next)
    }

    /// All virtual ranks of `v_suit`, ascending.
    pub fn ranks_in(&self, v_suit: Suit) -> Vec<Rank> {
        (Rank::MIN..=Rank::MAX)
            .filter_map(Rank::from_value)
            .filter(|&r| self.rank_exists_in(v_suit, r))
            .collect()
    }
}

/// A trump-agnostic physical playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CardBase {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardBase {
    /// # Panics
    ///
    /// Panics on an impossible physical card; use `CardBase::validate` on
    /// untrusted input first.
    pub fn new(suit: Suit, rank: Rank) -> Self {
        assert!(
            Self::validate(suit, rank),
            "invalid physical card ({suit:?}, {rank:?})"
        );
        Self { suit, rank }
    }

    /// Jokers are exactly the trump-suited cards; natural-trump ranks are virtual.
    pub fn validate(suit: Suit, rank: Rank) -> bool {
        if rank.is_natural_trump_marker() {
            return false;
        }
        (suit == Suit::Trump) == rank.is_joker()
    }

    pub const SMALL_JOKER: CardBase = CardBase {
        suit: Suit::Trump,
        rank: Rank::SmallJoker,
    };
    pub const BIG_JOKER: CardBase = CardBase {
        suit: Suit::Trump,
        rank: Rank::BigJoker,
    };

    pub fn virtualize(self, tr: TrumpMeta) -> Card {
        Card::new(self.suit, self.rank, tr)
    }
}

/// A ZPY-context-sensitive card: a physical card with "trumpiness" baked in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    /// Virtual (trump-aware) suit
    pub v_suit: Suit,
    /// Virtual (trump-aware) rank
    pub v_rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank, tr: TrumpMeta) -> Self {
        let base = CardBase::new(suit, rank);
        let (v_suit, v_rank) = tr.virt(base.suit, base.rank);
        Self {
            suit,
            rank,
            v_suit,
            v_rank,
        }
    }

    /// Rebuild a card from a virtual slot.
    pub fn from_virt(v_suit: Suit, v_rank: Rank, osnt_suit: Option<Suit>, tr: TrumpMeta) -> Self {
        let (suit, rank) = tr.devirt(v_suit, v_rank, osnt_suit);
        Self::new(suit, rank, tr)
    }

    #[inline]
    pub fn base(&self) -> CardBase {
        CardBase {
            suit: self.suit,
            rank: self.rank,
        }
    }

    /// The native suit, only for off-suit natural trumps.
    #[inline]
    pub fn osnt_suit(&self) -> Option<Suit> {
        (self.v_rank == Rank::OffSuitNatural).then_some(self.suit)
    }

    /// Whether two cards are the literal same physical card.
    #[inline]
    pub fn identical(&self, other: &Card) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }

    #[inline]
    pub fn is_trump(&self) -> bool {
        self.v_suit == Suit::Trump
    }
}
