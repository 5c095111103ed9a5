//! Readiness, host installation and the kitty exchange.

use super::cards_types::{CardBase, Suit, TrumpMeta};
use super::pile::CardPile;
use super::state::{
    require_held, require_host, require_known_hand, require_phase, require_player, Concealed,
    Phase, PlayerId, Zpy,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Outcome of a valid `ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    Waiting,
    /// Everyone is ready: `host` takes the kitty.
    InstallHost { host: PlayerId },
}

impl Zpy {
    /// Trump for the round as the bids stand.
    pub fn final_trump(&self) -> TrumpMeta {
        let suit = self
            .standing_bid()
            .map(|b| b.card.suit)
            .filter(|s| s.is_natural())
            .unwrap_or(Suit::Trump);
        TrumpMeta::new(suit, self.round_rank())
    }

    /// Host once everyone is ready: the standing host, else the standing
    /// bidder, else the first seat.
    pub fn host_candidate(&self) -> Option<PlayerId> {
        self.host
            .or_else(|| self.standing_bid().map(|b| b.player))
            .or_else(|| self.order.first().copied())
    }

    pub fn check_ready(&self, p: PlayerId) -> Result<ReadyOutcome, DomainError> {
        require_phase(self, &[Phase::Prepare], "ready")?;
        require_player(self, p)?;
        if self.ready.contains(&p) {
            return Err(DomainError::validation(
                ValidationKind::AlreadyActed,
                format!("player {p} is already ready"),
            ));
        }
        if self.ready.len() + 1 < self.nplayers() {
            return Ok(ReadyOutcome::Waiting);
        }
        let host = self.host_candidate().ok_or_else(|| {
            DomainError::validation_other("Invariant violated: no seat to host (ready)")
        })?;
        Ok(ReadyOutcome::InstallHost { host })
    }

    pub fn apply_ready(&mut self, p: PlayerId) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Prepare], "ready")?;
        self.ready.insert(p);
        Ok(())
    }

    /// The kitty's cards as `recipient` may see them.
    pub fn redact_kitty_for(&self, recipient: PlayerId, host: PlayerId) -> Concealed<Vec<CardBase>> {
        match self.kitty.known() {
            Some(pile) if recipient == host => Concealed::Known(pile.bases()),
            _ => Concealed::Hidden {
                size: self.kitty.size(),
            },
        }
    }

    /// Fix trump, re-index every pile and hand the kitty to the host.
    pub fn apply_install_host(
        &mut self,
        host: PlayerId,
        kitty: Concealed<Vec<CardBase>>,
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Prepare], "install_host")?;
        if !self.is_player(host) {
            return Err(DomainError::protocol(format!("host {host} is not seated")));
        }
        let tr = self.final_trump();
        self.host = Some(host);
        self.tr = tr;
        self.ready = self.order.iter().copied().collect();
        for hand in self.hands.values_mut() {
            hand.rehash(tr);
        }

        let hand = self
            .hands
            .get_mut(&host)
            .ok_or_else(|| DomainError::protocol(format!("no hand for host {host}")))?;
        match (hand, &kitty) {
            (Concealed::Known(pile), Concealed::Known(cards)) => {
                pile.insert_all(cards.iter().copied())
            }
            (Concealed::Hidden { size }, k) => *size += k.size(),
            (Concealed::Known(_), Concealed::Hidden { .. }) => {
                return Err(DomainError::protocol("host needs the kitty's cards"))
            }
        }
        self.kitty = Concealed::empty(tr);

        self.host_team.clear();
        self.host_team.insert(host);
        if self.nfriends() == 0 {
            if let Some(partner) = self.seat_offset(host, self.order.len() / 2) {
                self.host_team.insert(partner);
            }
        }
        self.phase = Phase::Kitty;
        Ok(())
    }

    pub fn check_replace_kitty(&self, p: PlayerId, cards: &[CardBase]) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Kitty], "replace_kitty")?;
        require_player(self, p)?;
        if require_host(self, "replace_kitty")? != p {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                format!("player {p} is not the host"),
            ));
        }
        if cards.len() != self.kitty_size() {
            return Err(DomainError::validation(
                ValidationKind::SizeMismatch,
                format!("kitty takes {} cards, got {}", self.kitty_size(), cards.len()),
            ));
        }
        require_held(require_known_hand(self, p, "replace_kitty")?, cards)
    }

    /// Bury `cards`; visible variant sent to the host.
    pub fn apply_replace_kitty(
        &mut self,
        p: PlayerId,
        cards: &[CardBase],
    ) -> Result<(), DomainError> {
        self.bury(p, Concealed::Known(cards.to_vec()))
    }

    /// Bury `count` unseen cards; variant sent to everyone but the host.
    pub fn apply_seal_hand(&mut self, p: PlayerId, count: usize) -> Result<(), DomainError> {
        self.bury(p, Concealed::Hidden { size: count })
    }

    fn bury(&mut self, p: PlayerId, cards: Concealed<Vec<CardBase>>) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Kitty], "replace_kitty")?;
        let tr = self.tr;
        let hand = self
            .hands
            .get_mut(&p)
            .ok_or_else(|| DomainError::protocol(format!("no hand for {p}")))?;
        let removed = match &cards {
            Concealed::Known(c) => hand.remove_all(c),
            Concealed::Hidden { size } => match hand {
                Concealed::Hidden { size: held } => match held.checked_sub(*size) {
                    Some(rest) => {
                        *held = rest;
                        true
                    }
                    None => false,
                },
                Concealed::Known(_) => false,
            },
        };
        if !removed {
            return Err(DomainError::protocol(format!("hand of {p} cannot bury {cards:?}")));
        }
        self.kitty = match cards {
            Concealed::Known(c) => Concealed::Known(CardPile::from_cards(c, tr)),
            Concealed::Hidden { size } => Concealed::Hidden { size },
        };
        if self.nfriends() > 0 {
            self.phase = Phase::Friend;
        } else {
            self.leader = Some(p);
            self.phase = Phase::Lead;
        }
        Ok(())
    }
}
