//! Friend calls: the host names cards whose nth player joins the host team.

use super::cards_types::CardBase;
use super::state::{require_host, require_phase, require_player, FriendCall, Phase, PlayerId, Zpy};
use crate::errors::domain::{DomainError, ValidationKind};

impl Zpy {
    pub fn check_call_friends(
        &self,
        p: PlayerId,
        calls: &[(CardBase, usize)],
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Friend], "call_friends")?;
        require_player(self, p)?;
        if require_host(self, "call_friends")? != p {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                format!("player {p} is not the host"),
            ));
        }
        if calls.len() != self.nfriends() {
            return Err(DomainError::validation(
                ValidationKind::InvalidFriendCall,
                format!("expected {} calls, got {}", self.nfriends(), calls.len()),
            ));
        }
        let ndecks = self.ndecks();
        for &(card, nth) in calls {
            if !CardBase::validate(card.suit, card.rank) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidCard,
                    format!("{card:?}"),
                ));
            }
            if nth == 0 || nth > ndecks {
                return Err(DomainError::validation(
                    ValidationKind::InvalidFriendCall,
                    format!("{card} #{nth} with {ndecks} decks"),
                ));
            }
        }
        Ok(())
    }

    pub fn apply_call_friends(&mut self, calls: &[(CardBase, usize)]) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Friend], "call_friends")?;
        self.friends = calls
            .iter()
            .map(|&(card, nth)| FriendCall {
                card,
                nth,
                seen: 0,
                found: None,
            })
            .collect();
        self.leader = self.host;
        self.phase = Phase::Lead;
        Ok(())
    }

    /// Count friend cards in a finished play; the player who plays the nth
    /// copy of a called card joins the host team.
    pub(crate) fn note_friend_plays(&mut self, player: PlayerId, cards: &[CardBase]) {
        for call in self.friends.iter_mut().filter(|c| c.found.is_none()) {
            let copies = cards.iter().filter(|&&c| c == call.card).count();
            if copies == 0 {
                continue;
            }
            call.seen += copies;
            if call.seen >= call.nth {
                call.found = Some(player);
                // a call answered by the host team is wasted
                self.host_team.insert(player);
            }
        }
    }
}
