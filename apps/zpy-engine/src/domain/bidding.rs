//! Trump bids and redeals.

use super::cards_types::{CardBase, Rank};
use super::rules::{BidRule, RedealRule};
use super::state::{
    require_known_hand, require_phase, require_player, Bid, Phase, PlayerId, Zpy,
};
use crate::errors::domain::{DomainError, ValidationKind};

fn joker_strength(card: CardBase) -> u8 {
    match card.rank {
        Rank::BigJoker => 2,
        Rank::SmallJoker => 1,
        _ => 0,
    }
}

/// Whether `bid` displaces `standing` under `rule`.
pub fn outranks(rule: BidRule, bid: &Bid, standing: Option<&Bid>) -> bool {
    let Some(standing) = standing else {
        return true;
    };
    match rule {
        BidRule::CountOnly => bid.n > standing.n,
        BidRule::CountThenJoker => {
            bid.n > standing.n
                || (bid.n == standing.n
                    && joker_strength(bid.card) > joker_strength(standing.card))
        }
    }
}

impl Zpy {
    pub fn check_bid_trump(
        &self,
        p: PlayerId,
        card: CardBase,
        n: usize,
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Draw, Phase::Prepare], "bid_trump")?;
        require_player(self, p)?;
        if !CardBase::validate(card.suit, card.rank) {
            return Err(DomainError::validation(
                ValidationKind::InvalidCard,
                format!("{card:?}"),
            ));
        }
        let rank = self.round_rank();
        let qualifies = if card.rank.is_joker() {
            n >= 2
        } else {
            card.rank == rank && n >= 1
        };
        if !qualifies {
            return Err(DomainError::validation(
                ValidationKind::InvalidBid,
                format!("{n} x {card} is not a trump bid at rank {rank:?}"),
            ));
        }
        let hand = require_known_hand(self, p, "bid_trump")?;
        if hand.count(card) < n {
            return Err(DomainError::validation(
                ValidationKind::CardsNotHeld,
                format!("player {p} holds fewer than {n} x {card}"),
            ));
        }
        let bid = Bid { player: p, card, n };
        if !outranks(self.rules.bid, &bid, self.standing_bid()) {
            return Err(DomainError::validation(
                ValidationKind::BidTooWeak,
                format!("{n} x {card} does not beat the standing bid"),
            ));
        }
        Ok(())
    }

    pub fn apply_secure_bid(
        &mut self,
        p: PlayerId,
        card: CardBase,
        n: usize,
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Draw, Phase::Prepare], "secure_bid")?;
        self.bids.push(Bid { player: p, card, n });
        // a new bid invalidates readiness
        self.ready.clear();
        Ok(())
    }

    pub fn check_request_redeal(&self, p: PlayerId) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Prepare], "request_redeal")?;
        require_player(self, p)?;
        match self.rules.redeal {
            RedealRule::Never => Err(DomainError::validation(
                ValidationKind::RedealNotAllowed,
                "redeals are disabled",
            )),
            RedealRule::NoTrumps => {
                let hand = require_known_hand(self, p, "request_redeal")?;
                let rank = self.round_rank();
                let holds_trump = hand
                    .bases()
                    .iter()
                    .any(|c| c.rank == rank || c.rank.is_joker());
                if holds_trump {
                    Err(DomainError::validation(
                        ValidationKind::RedealNotAllowed,
                        format!("player {p} holds trumps"),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn apply_redeal(&mut self) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Prepare], "redeal")?;
        self.redeals += 1;
        self.start_round();
        Ok(())
    }
}
