//! Combo model: tuples, tractors, flights, tosses and plays.
//!
//! Everything here lives in virtual space under one `TrumpMeta`. The `*Spec`
//! types are the wire forms; they carry physical cards only and are
//! virtualized against the receiver's trump.

use serde::{Deserialize, Serialize};

use super::cards_logic::card_beats;
use super::cards_types::{Card, CardBase, Rank, Suit, TrumpMeta};
use super::rules::MAX_DECKS;
use crate::errors::domain::{DomainError, ValidationKind};

/// (len, arity): `len` consecutive ranks, `arity` copies each.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shape {
    pub len: usize,
    pub arity: usize,
}

impl Shape {
    pub const fn new(len: usize, arity: usize) -> Self {
        Self { len, arity }
    }

    pub const fn single() -> Self {
        Self::new(1, 1)
    }

    /// Saturates; validated shapes never get near the bound.
    #[inline]
    pub fn size(&self) -> usize {
        self.len.saturating_mul(self.arity)
    }

    /// Next weaker pair of obligations: a run sheds one rank, a lone tuple
    /// sheds one copy.
    pub fn decay(&self) -> Option<(Shape, Shape)> {
        if self.len > 1 {
            Some((
                Shape::new(self.len - 1, self.arity),
                Shape::new(1, self.arity),
            ))
        } else if self.arity > 1 {
            Some((Shape::new(1, self.arity - 1), Shape::single()))
        } else {
            None
        }
    }
}

fn invalid_tractor(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidTractor, detail)
}

/// A run of tuples anchored at its lowest card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tractor {
    pub shape: Shape,
    pub card: Card,
    /// Native suit of the off-suit natural tuple, when the run includes one.
    pub osnt_suit: Option<Suit>,
}

impl Tractor {
    pub fn new(
        shape: Shape,
        card: Card,
        osnt_suit: Option<Suit>,
        tr: TrumpMeta,
    ) -> Result<Self, DomainError> {
        let tractor = Self {
            shape,
            card,
            osnt_suit,
        };
        tractor.validate(tr)?;
        Ok(tractor)
    }

    /// A lone tuple of `arity` copies of `card`.
    pub fn tuple(card: Card, arity: usize) -> Self {
        Self {
            shape: Shape::new(1, arity),
            card,
            osnt_suit: card.osnt_suit(),
        }
    }

    pub fn validate(&self, tr: TrumpMeta) -> Result<(), DomainError> {
        let Shape { len, arity } = self.shape;
        if len == 0 || arity == 0 {
            return Err(invalid_tractor(format!("empty shape {:?}", self.shape)));
        }
        if len > 1 && arity < 2 {
            return Err(invalid_tractor("runs of single cards are not tractors"));
        }
        if arity > MAX_DECKS {
            return Err(invalid_tractor(format!(
                "{arity} copies exceed the {MAX_DECKS}-deck limit"
            )));
        }
        if Card::new(self.card.suit, self.card.rank, tr) != self.card {
            return Err(DomainError::validation(
                ValidationKind::InvalidCard,
                format!("{} is not classified under {tr:?}", self.card.base()),
            ));
        }
        let span = tr.ranks_in(self.card.v_suit).len();
        if len > span {
            return Err(invalid_tractor(format!(
                "run of {len} is longer than {:?} with {span} ranks",
                self.card.v_suit
            )));
        }
        let ranks = self.try_ranks(tr)?;
        let spans_osnt = ranks.contains(&Rank::OffSuitNatural);
        match (spans_osnt, self.osnt_suit) {
            (false, None) => Ok(()),
            (false, Some(_)) => Err(invalid_tractor(
                "native suit recorded for a run without off-suit naturals",
            )),
            (true, None) => Err(invalid_tractor(
                "off-suit natural trumps need their native suit",
            )),
            (true, Some(native)) => {
                if !native.is_natural() || native == tr.suit {
                    return Err(invalid_tractor(format!(
                        "{native:?} cannot hold off-suit natural trumps"
                    )));
                }
                if self.card.v_rank == Rank::OffSuitNatural && self.card.suit != native {
                    return Err(invalid_tractor("anchor disagrees with recorded native suit"));
                }
                Ok(())
            }
        }
    }

    fn try_ranks(&self, tr: TrumpMeta) -> Result<Vec<Rank>, DomainError> {
        let v_suit = self.card.v_suit;
        let mut rank = self.card.v_rank;
        let mut ranks = Vec::with_capacity(self.shape.len);
        ranks.push(rank);
        for _ in 1..self.shape.len {
            rank = tr.succ(v_suit, rank).ok_or_else(|| {
                invalid_tractor(format!(
                    "run of {} from {} leaves {v_suit:?}",
                    self.shape.len,
                    self.card.base()
                ))
            })?;
            ranks.push(rank);
        }
        Ok(ranks)
    }

    #[inline]
    pub fn v_suit(&self) -> Suit {
        self.card.v_suit
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// One card per rank of the run, ascending.
    pub fn tuple_cards(&self, tr: TrumpMeta) -> Vec<Card> {
        let mut out = Vec::with_capacity(self.shape.len);
        let mut rank = self.card.v_rank;
        out.push(self.card);
        for _ in 1..self.shape.len {
            let Some(next) = tr.succ(self.v_suit(), rank) else {
                panic!("tractor {self:?} was not validated under {tr:?}");
            };
            rank = next;
            let osnt = (rank == Rank::OffSuitNatural).then_some(self.osnt_suit).flatten();
            out.push(Card::from_virt(self.v_suit(), rank, osnt, tr));
        }
        out
    }

    pub fn cards(&self, tr: TrumpMeta) -> Vec<Card> {
        self.tuple_cards(tr)
            .into_iter()
            .flat_map(|c| std::iter::repeat(c).take(self.shape.arity))
            .collect()
    }

    pub fn bases(&self, tr: TrumpMeta) -> Vec<CardBase> {
        self.cards(tr).into_iter().map(|c| c.base()).collect()
    }

    /// Classify a card set as exactly one tractor.
    pub fn recognize(cards: &[Card], tr: TrumpMeta) -> Option<Tractor> {
        let first = cards.first()?;
        if cards.iter().any(|c| c.v_suit != first.v_suit) {
            return None;
        }
        let mut groups: Vec<(Card, usize)> = Vec::new();
        for card in cards {
            match groups.iter_mut().find(|(g, _)| g.identical(card)) {
                Some((_, n)) => *n += 1,
                None => groups.push((*card, 1)),
            }
        }
        let arity = groups[0].1;
        if groups.iter().any(|&(_, n)| n != arity) {
            return None;
        }
        groups.sort_by_key(|(c, _)| c.v_rank);
        for pair in groups.windows(2) {
            if tr.succ(first.v_suit, pair[0].0.v_rank) != Some(pair[1].0.v_rank) {
                return None;
            }
        }
        let osnt_suit = groups.iter().find_map(|(c, _)| c.osnt_suit());
        Tractor::new(Shape::new(groups.len(), arity), groups[0].0, osnt_suit, tr).ok()
    }

    /// Strictly stronger anchor; tractors of other shapes never compare.
    pub fn beats(&self, other: &Tractor) -> bool {
        self.shape == other.shape && card_beats(&self.card, &other.card)
    }
}

/// One lead: an ordered, non-empty set of tractors in one virtual suit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    tractors: Vec<Tractor>,
}

impl Flight {
    /// Validates and sorts into canonical order (largest, widest, highest first).
    pub fn new(mut tractors: Vec<Tractor>, tr: TrumpMeta) -> Result<Self, DomainError> {
        let invalid = |detail: &str| DomainError::validation(ValidationKind::InvalidFlight, detail);
        let Some(first) = tractors.first() else {
            return Err(invalid("empty flight"));
        };
        let v_suit = first.v_suit();
        for t in &tractors {
            t.validate(tr)?;
            if t.v_suit() != v_suit {
                return Err(invalid("flight spans several suits"));
            }
        }
        let mut seen: Vec<CardBase> = Vec::new();
        for t in &tractors {
            let own: Vec<CardBase> = t.tuple_cards(tr).iter().map(|c| c.base()).collect();
            if own.iter().any(|c| seen.contains(c)) {
                return Err(invalid("tractors in a flight overlap"));
            }
            seen.extend(own);
        }
        tractors.sort_by(|a, b| {
            b.size()
                .cmp(&a.size())
                .then(b.shape.arity.cmp(&a.shape.arity))
                .then(b.card.v_rank.cmp(&a.card.v_rank))
        });
        Ok(Self { tractors })
    }

    pub fn single(tractor: Tractor) -> Self {
        Self {
            tractors: vec![tractor],
        }
    }

    #[inline]
    pub fn tractors(&self) -> &[Tractor] {
        &self.tractors
    }

    /// Highest-priority component; trick comparisons use it.
    #[inline]
    pub fn leading(&self) -> &Tractor {
        &self.tractors[0]
    }

    #[inline]
    pub fn v_suit(&self) -> Suit {
        self.leading().v_suit()
    }

    #[inline]
    pub fn is_fly(&self) -> bool {
        self.tractors.len() > 1
    }

    pub fn size(&self) -> usize {
        self.tractors.iter().map(Tractor::size).sum()
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.tractors.iter().map(|t| t.shape).collect()
    }

    pub fn cards(&self, tr: TrumpMeta) -> Vec<Card> {
        self.tractors.iter().flat_map(|t| t.cards(tr)).collect()
    }

    pub fn bases(&self, tr: TrumpMeta) -> Vec<CardBase> {
        self.cards(tr).into_iter().map(|c| c.base()).collect()
    }
}

/// Unstructured cards played when the lead's structure cannot be matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    cards: Vec<Card>,
}

impl Toss {
    pub fn new(cards: Vec<Card>) -> Result<Self, DomainError> {
        if cards.is_empty() {
            return Err(DomainError::validation(ValidationKind::InvalidPlay, "empty toss"));
        }
        Ok(Self { cards })
    }

    #[inline]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Play {
    Flight(Flight),
    Toss(Toss),
}

impl Play {
    pub fn size(&self) -> usize {
        match self {
            Play::Flight(fl) => fl.size(),
            Play::Toss(ts) => ts.cards().len(),
        }
    }

    pub fn cards(&self, tr: TrumpMeta) -> Vec<Card> {
        match self {
            Play::Flight(fl) => fl.cards(tr),
            Play::Toss(ts) => ts.cards().to_vec(),
        }
    }

    pub fn bases(&self, tr: TrumpMeta) -> Vec<CardBase> {
        self.cards(tr).into_iter().map(|c| c.base()).collect()
    }

    pub fn flight(&self) -> Option<&Flight> {
        match self {
            Play::Flight(fl) => Some(fl),
            Play::Toss(_) => None,
        }
    }
}

// Wire forms

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TractorSpec {
    pub len: usize,
    pub arity: usize,
    pub card: CardBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osnt_suit: Option<Suit>,
}

impl TractorSpec {
    pub fn resolve(&self, tr: TrumpMeta) -> Result<Tractor, DomainError> {
        if !CardBase::validate(self.card.suit, self.card.rank) {
            return Err(DomainError::validation(
                ValidationKind::InvalidCard,
                format!("{:?}", self.card),
            ));
        }
        Tractor::new(
            Shape::new(self.len, self.arity),
            self.card.virtualize(tr),
            self.osnt_suit,
            tr,
        )
    }
}

impl From<&Tractor> for TractorSpec {
    fn from(t: &Tractor) -> Self {
        Self {
            len: t.shape.len,
            arity: t.shape.arity,
            card: t.card.base(),
            osnt_suit: t.osnt_suit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSpec {
    pub tractors: Vec<TractorSpec>,
}

impl FlightSpec {
    pub fn resolve(&self, tr: TrumpMeta) -> Result<Flight, DomainError> {
        let tractors = self
            .tractors
            .iter()
            .map(|t| t.resolve(tr))
            .collect::<Result<Vec<_>, _>>()?;
        Flight::new(tractors, tr)
    }
}

impl From<&Flight> for FlightSpec {
    fn from(fl: &Flight) -> Self {
        Self {
            tractors: fl.tractors().iter().map(TractorSpec::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaySpec {
    Flight(FlightSpec),
    Toss { cards: Vec<CardBase> },
}

impl PlaySpec {
    pub fn resolve(&self, tr: TrumpMeta) -> Result<Play, DomainError> {
        match self {
            PlaySpec::Flight(fl) => Ok(Play::Flight(fl.resolve(tr)?)),
            PlaySpec::Toss { cards } => Ok(Play::Toss(Toss::new(
                cards.iter().map(|c| c.virtualize(tr)).collect(),
            )?)),
        }
    }
}

impl From<&Play> for PlaySpec {
    fn from(play: &Play) -> Self {
        match play {
            Play::Flight(fl) => PlaySpec::Flight(FlightSpec::from(fl)),
            Play::Toss(ts) => PlaySpec::Toss {
                cards: ts.cards().iter().map(|c| c.base()).collect(),
            },
        }
    }
}
