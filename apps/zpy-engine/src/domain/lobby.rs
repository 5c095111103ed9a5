//! Lobby operations and round setup: add_player, set_decks, start_game.

use super::cards_logic::SINGLE_DECK;
use super::cards_types::TrumpMeta;
use super::dealing::{shuffle_seats, shuffled_deck, MIN_KITTY};
use super::pile::CardPile;
use super::rules::{valid_deck_range, MAX_DECKS, MIN_PLAYERS};
use super::seed_derivation::{derive_dealing_seed, derive_seating_seed};
use super::state::{require_phase, require_player, Concealed, Phase, PlayerId, PlayerRank, Zpy};
use crate::errors::domain::{DomainError, ValidationKind};

impl Zpy {
    pub fn check_add_player(&self, p: PlayerId) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Lobby], "add_player")?;
        if self.is_player(p) {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayer,
                format!("player {p} already joined"),
            ));
        }
        Ok(())
    }

    pub fn apply_add_player(&mut self, p: PlayerId) {
        self.players.push(p);
        self.owner.get_or_insert(p);
        self.ranks.entry(p).or_default();
    }

    pub fn check_set_decks(&self, p: PlayerId, ndecks: usize) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Lobby], "set_decks")?;
        require_player(self, p)?;
        self.require_owner(p)?;
        if !(1..=MAX_DECKS).contains(&ndecks) {
            return Err(DomainError::validation(
                ValidationKind::InvalidDeckCount,
                format!("{ndecks} decks, expected 1 to {MAX_DECKS}"),
            ));
        }
        Ok(())
    }

    pub fn apply_set_decks(&mut self, ndecks: usize) {
        self.ndecks = Some(ndecks);
    }

    /// Validates the start and picks the seating order (server only).
    pub fn check_start_game(&self, p: PlayerId) -> Result<Vec<PlayerId>, DomainError> {
        require_phase(self, &[Phase::Lobby], "start_game")?;
        require_player(self, p)?;
        self.require_owner(p)?;
        if self.nplayers() < MIN_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::TooFewPlayers,
                format!("{} players, need {MIN_PLAYERS}", self.nplayers()),
            ));
        }
        // Players may join after set_decks, so the count is checked again here.
        let (ndecks, nplayers) = (self.ndecks(), self.nplayers());
        let range = valid_deck_range(nplayers);
        if ndecks > MAX_DECKS || !range.contains(&ndecks) {
            return Err(DomainError::validation(
                ValidationKind::InvalidDeckCount,
                format!("{ndecks} decks, {nplayers} players need {range:?} (at most {MAX_DECKS})"),
            ));
        }
        let enough = SINGLE_DECK
            .len()
            .checked_mul(ndecks)
            .is_some_and(|total| total >= nplayers + MIN_KITTY);
        if !enough {
            return Err(DomainError::validation(
                ValidationKind::InvalidDeckCount,
                format!("{ndecks} decks cannot serve {nplayers} players"),
            ));
        }
        let seed = self
            .seed
            .ok_or_else(|| DomainError::protocol("start_game needs the server seed"))?;
        Ok(shuffle_seats(&self.players, derive_seating_seed(seed)))
    }

    pub fn apply_init_game(&mut self, order: Vec<PlayerId>) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Lobby], "init_game")?;
        let mut sorted = order.clone();
        sorted.sort_unstable();
        let mut players = self.players.clone();
        players.sort_unstable();
        if sorted != players {
            return Err(DomainError::protocol(format!(
                "seating {order:?} does not match players {:?}",
                self.players
            )));
        }
        self.order = order;
        for &p in &self.order {
            self.ranks.entry(p).or_insert_with(PlayerRank::default);
        }
        self.start_round();
        Ok(())
    }

    pub(crate) fn require_owner(&self, p: PlayerId) -> Result<(), DomainError> {
        if self.owner == Some(p) {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::NotOwner,
                format!("player {p} does not own the game"),
            ))
        }
    }

    /// Reset per-round state and deal a fresh deck; enters `Draw`.
    pub(crate) fn start_round(&mut self) {
        let tr = TrumpMeta::undetermined(self.round_rank());
        self.tr = tr;
        let total = SINGLE_DECK.len() * self.ndecks();
        self.deck = match self.seed {
            Some(seed) => Concealed::Known(shuffled_deck(
                self.ndecks(),
                derive_dealing_seed(seed, self.round, self.redeals),
            )),
            None => Concealed::Hidden { size: total },
        };
        self.hands = self
            .order
            .iter()
            .map(|&p| {
                let hand = if self.sees_hand(p) {
                    Concealed::Known(CardPile::new(tr))
                } else {
                    Concealed::Hidden { size: 0 }
                };
                (p, hand)
            })
            .collect();
        self.kitty = Concealed::empty(tr);
        self.draw_seat = self.host.and_then(|h| self.seat_of(h)).unwrap_or(0);
        self.bids.clear();
        self.ready.clear();
        self.host_team.clear();
        self.friends.clear();
        self.leader = None;
        self.current = None;
        self.trick = None;
        self.last_trick = None;
        self.trick_no = 0;
        self.passed.clear();
        self.points = self.order.iter().map(|&p| (p, 0)).collect();
        self.reneges.clear();
        self.result = None;
        self.phase = Phase::Draw;
    }
}
