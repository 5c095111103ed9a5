//! Round and game state shared by the server and every client view.
//!
//! Server state knows everything. A client view holds the same structure with
//! other players' hands, the deck and the unrevealed kitty `Hidden`, so the
//! same effect-application code runs on both sides.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::cards_types::{CardBase, Rank, TrumpMeta};
use super::dealing::{hand_size, kitty_size};
use super::hand::FollowViolation;
use super::pile::CardPile;
use super::rules::{default_decks, friend_count, RankOutcome, RuleConfig};
use super::scoring::RoundResult;
use super::trick::Trick;
use crate::errors::domain::{DomainError, ValidationKind};

/// Transport-assigned player identity.
pub type PlayerId = u32;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Players join; the owner picks the deck count and starts.
    Lobby,
    /// Players take turns drawing; bids may be placed.
    Draw,
    /// Draw over, kitty set aside; last bids, redeals and readiness.
    Prepare,
    /// Host holds the kitty and must bury the same number of cards.
    Kitty,
    /// Host calls friends (tables of more than four).
    Friend,
    /// Leader to play.
    Lead,
    /// A multi-tractor lead awaits contests.
    Fly,
    /// Remaining players follow in seat order.
    Follow,
    /// All tricks played; waiting for the round to be ended.
    Finish,
    /// Round scored; waiting for the next round.
    Wait,
    GameOver,
}

/// Sized container that may hide its contents from a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Concealed<T> {
    Known(T),
    Hidden { size: usize },
}

/// Anything with a card count.
pub trait CardCount {
    fn card_count(&self) -> usize;
}

impl CardCount for CardPile {
    fn card_count(&self) -> usize {
        self.size()
    }
}

impl CardCount for Vec<CardBase> {
    fn card_count(&self) -> usize {
        self.len()
    }
}

impl<T: CardCount> Concealed<T> {
    pub fn size(&self) -> usize {
        match self {
            Concealed::Known(t) => t.card_count(),
            Concealed::Hidden { size } => *size,
        }
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Concealed::Known(t) => Some(t),
            Concealed::Hidden { .. } => None,
        }
    }

    pub fn known_mut(&mut self) -> Option<&mut T> {
        match self {
            Concealed::Known(t) => Some(t),
            Concealed::Hidden { .. } => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Concealed::Known(_))
    }

    pub fn hidden(&self) -> Self {
        Concealed::Hidden { size: self.size() }
    }
}

impl Concealed<CardPile> {
    pub fn empty(tr: TrumpMeta) -> Self {
        Concealed::Known(CardPile::new(tr))
    }

    pub fn insert_all(&mut self, cards: &[CardBase]) {
        match self {
            Concealed::Known(pile) => pile.insert_all(cards.iter().copied()),
            Concealed::Hidden { size } => *size += cards.len(),
        }
    }

    /// Remove cards, all or nothing. Hidden piles only shrink.
    pub fn remove_all(&mut self, cards: &[CardBase]) -> bool {
        match self {
            Concealed::Known(pile) => pile.remove_all(cards),
            Concealed::Hidden { size } => match size.checked_sub(cards.len()) {
                Some(rest) => {
                    *size = rest;
                    true
                }
                None => false,
            },
        }
    }

    pub fn rehash(&mut self, tr: TrumpMeta) {
        if let Concealed::Known(pile) = self {
            pile.rehash(tr);
        }
    }
}

/// A standing trump claim: `n` copies of `card`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub player: PlayerId,
    pub card: CardBase,
    pub n: usize,
}

/// "The `nth` time `card` is played, its player joins the host."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendCall {
    pub card: CardBase,
    pub nth: usize,
    pub seen: usize,
    pub found: Option<PlayerId>,
}

/// A recorded illegal follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renege {
    pub player: PlayerId,
    pub trick_no: u32,
    pub violation: FollowViolation,
}

/// A player's standing across rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRank {
    pub rank: Rank,
    /// Breakpoint ranks this player has hosted at.
    pub hosted: BTreeSet<Rank>,
    pub won: bool,
}

impl Default for PlayerRank {
    fn default() -> Self {
        Self {
            rank: Rank::Two,
            hosted: BTreeSet::new(),
            won: false,
        }
    }
}

impl PlayerRank {
    pub fn apply(&mut self, outcome: RankOutcome) {
        match outcome {
            RankOutcome::Rank(rank) => self.rank = rank,
            RankOutcome::Won => self.won = true,
        }
    }
}

/// Entire game container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zpy {
    pub rules: RuleConfig,
    pub phase: Phase,
    /// First player to join; starts the game and sets the deck count.
    pub owner: Option<PlayerId>,
    /// Players in join order.
    pub players: Vec<PlayerId>,
    /// Deck count chosen in the lobby; `None` means the table default.
    pub ndecks: Option<usize>,
    /// Seating order, fixed at game start.
    pub order: Vec<PlayerId>,
    /// Base RNG seed. Server only.
    pub seed: Option<u64>,
    /// Whose view this is; `None` for the omniscient server state.
    pub viewer: Option<PlayerId>,
    /// 0-based round number.
    pub round: u32,
    /// Redeals within the current round.
    pub redeals: u32,
    pub ranks: BTreeMap<PlayerId, PlayerRank>,
    pub tr: TrumpMeta,
    /// Undrawn cards; drawn from the back.
    pub deck: Concealed<Vec<CardBase>>,
    pub hands: BTreeMap<PlayerId, Concealed<CardPile>>,
    pub kitty: Concealed<CardPile>,
    /// Seat index of the next drawer.
    pub draw_seat: usize,
    pub bids: Vec<Bid>,
    pub ready: BTreeSet<PlayerId>,
    pub host: Option<PlayerId>,
    pub host_team: BTreeSet<PlayerId>,
    pub friends: Vec<FriendCall>,
    pub leader: Option<PlayerId>,
    /// Player expected to follow next.
    pub current: Option<PlayerId>,
    pub trick: Option<Trick>,
    pub last_trick: Option<Trick>,
    /// Completed tricks this round.
    pub trick_no: u32,
    /// Players who passed on the current fly.
    pub passed: BTreeSet<PlayerId>,
    /// Points captured this round, per player.
    pub points: BTreeMap<PlayerId, u32>,
    pub reneges: Vec<Renege>,
    pub result: Option<RoundResult>,
}

impl Zpy {
    pub fn new(rules: RuleConfig, seed: Option<u64>) -> Self {
        Self {
            rules,
            phase: Phase::Lobby,
            owner: None,
            players: Vec::new(),
            ndecks: None,
            order: Vec::new(),
            seed,
            viewer: None,
            round: 0,
            redeals: 0,
            ranks: BTreeMap::new(),
            tr: TrumpMeta::undetermined(Rank::Two),
            deck: Concealed::Known(Vec::new()),
            hands: BTreeMap::new(),
            kitty: Concealed::empty(TrumpMeta::undetermined(Rank::Two)),
            draw_seat: 0,
            bids: Vec::new(),
            ready: BTreeSet::new(),
            host: None,
            host_team: BTreeSet::new(),
            friends: Vec::new(),
            leader: None,
            current: None,
            trick: None,
            last_trick: None,
            trick_no: 0,
            passed: BTreeSet::new(),
            points: BTreeMap::new(),
            reneges: Vec::new(),
            result: None,
        }
    }

    pub fn nplayers(&self) -> usize {
        self.players.len()
    }

    pub fn ndecks(&self) -> usize {
        self.ndecks.unwrap_or_else(|| default_decks(self.nplayers()))
    }

    pub fn kitty_size(&self) -> usize {
        kitty_size(self.ndecks(), self.nplayers())
    }

    pub fn hand_size(&self) -> usize {
        hand_size(self.ndecks(), self.nplayers())
    }

    pub fn nfriends(&self) -> usize {
        friend_count(self.nplayers())
    }

    /// Rank played this round: the host's, or two before any host exists.
    pub fn round_rank(&self) -> Rank {
        self.host
            .and_then(|h| self.ranks.get(&h))
            .map(|r| r.rank)
            .unwrap_or(Rank::Two)
    }

    /// Whether this state may hold `p`'s cards.
    pub fn sees_hand(&self, p: PlayerId) -> bool {
        self.viewer.map_or(true, |v| v == p)
    }

    pub fn is_server(&self) -> bool {
        self.viewer.is_none()
    }

    pub fn is_player(&self, p: PlayerId) -> bool {
        self.players.contains(&p)
    }

    pub fn seat_of(&self, p: PlayerId) -> Option<usize> {
        self.order.iter().position(|&q| q == p)
    }

    /// Player `n` seats clockwise from `p`.
    pub fn seat_offset(&self, p: PlayerId, n: usize) -> Option<PlayerId> {
        let seat = self.seat_of(p)?;
        Some(self.order[(seat + n) % self.order.len()])
    }

    pub fn next_player(&self, p: PlayerId) -> Option<PlayerId> {
        self.seat_offset(p, 1)
    }

    /// Players clockwise from `p`, excluding `p`.
    pub fn others_from(&self, p: PlayerId) -> Vec<PlayerId> {
        (1..self.order.len())
            .filter_map(|i| self.seat_offset(p, i))
            .collect()
    }

    pub fn attackers(&self) -> Vec<PlayerId> {
        self.order
            .iter()
            .copied()
            .filter(|p| !self.host_team.contains(p))
            .collect()
    }

    pub fn hand(&self, p: PlayerId) -> Option<&Concealed<CardPile>> {
        self.hands.get(&p)
    }

    /// The standing bid, if any.
    pub fn standing_bid(&self) -> Option<&Bid> {
        self.bids.last()
    }
}

pub fn require_player(state: &Zpy, p: PlayerId) -> Result<(), DomainError> {
    if state.is_player(p) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::NotAPlayer,
            format!("player {p} is not seated"),
        ))
    }
}

pub fn require_phase(state: &Zpy, allowed: &[Phase], ctx: &'static str) -> Result<(), DomainError> {
    if allowed.contains(&state.phase) {
        return Ok(());
    }
    let kind = if state.phase == Phase::Lobby {
        ValidationKind::GameNotStarted
    } else {
        ValidationKind::PhaseMismatch
    };
    Err(DomainError::validation(
        kind,
        format!("{ctx} not allowed in {:?}", state.phase),
    ))
}

pub fn require_host(state: &Zpy, ctx: &'static str) -> Result<PlayerId, DomainError> {
    state.host.ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: host must be set ({ctx})"))
    })
}

pub fn require_leader(state: &Zpy, ctx: &'static str) -> Result<PlayerId, DomainError> {
    state.leader.ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: leader must be set ({ctx})"))
    })
}

pub fn require_trick<'a>(state: &'a Zpy, ctx: &'static str) -> Result<&'a Trick, DomainError> {
    state.trick.as_ref().ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: trick must be set ({ctx})"))
    })
}

pub fn require_hand<'a>(
    state: &'a Zpy,
    p: PlayerId,
    ctx: &'static str,
) -> Result<&'a Concealed<CardPile>, DomainError> {
    state.hands.get(&p).ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: hand of {p} must exist ({ctx})"))
    })
}

pub fn require_hand_mut<'a>(
    state: &'a mut Zpy,
    p: PlayerId,
    ctx: &'static str,
) -> Result<&'a mut Concealed<CardPile>, DomainError> {
    state.hands.get_mut(&p).ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: hand of {p} must exist ({ctx})"))
    })
}

/// The actor's own hand, which must be visible to whoever validates.
pub fn require_known_hand<'a>(
    state: &'a Zpy,
    p: PlayerId,
    ctx: &'static str,
) -> Result<&'a CardPile, DomainError> {
    require_hand(state, p, ctx)?.known().ok_or_else(|| {
        DomainError::protocol(format!("hand of {p} is not visible here ({ctx})"))
    })
}

pub fn require_turn(expected: Option<PlayerId>, who: PlayerId) -> Result<(), DomainError> {
    if expected == Some(who) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("player {who} is not up"),
        ))
    }
}

pub fn require_held(hand: &CardPile, cards: &[CardBase]) -> Result<(), DomainError> {
    if hand.contains_cards(cards) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::CardsNotHeld,
            "cards not in hand",
        ))
    }
}

/// A player's view of a game: the state as redacted for `viewer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    pub viewer: PlayerId,
    pub state: Zpy,
}

impl ClientState {
    pub fn new(viewer: PlayerId, mut state: Zpy) -> Self {
        state.viewer = Some(viewer);
        state.seed = None;
        Self { viewer, state }
    }
}

impl Deref for ClientState {
    type Target = Zpy;

    fn deref(&self) -> &Zpy {
        &self.state
    }
}

impl DerefMut for ClientState {
    fn deref_mut(&mut self) -> &mut Zpy {
        &mut self.state
    }
}
