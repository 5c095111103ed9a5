//! Drawing from the deck: draw_card / add_to_hand.

use super::cards_types::CardBase;
use super::pile::CardPile;
use super::state::{
    require_hand_mut, require_phase, require_player, require_turn, Concealed, Phase, PlayerId,
    Zpy,
};
use crate::errors::domain::DomainError;

impl Zpy {
    /// The player expected to draw next.
    pub fn drawer(&self) -> Option<PlayerId> {
        (self.phase == Phase::Draw)
            .then(|| self.order.get(self.draw_seat).copied())
            .flatten()
    }

    /// Validates a draw; on the server also returns the card about to be drawn.
    pub fn check_draw_card(&self, p: PlayerId) -> Result<Option<CardBase>, DomainError> {
        require_phase(self, &[Phase::Draw], "draw_card")?;
        require_player(self, p)?;
        require_turn(self.drawer(), p)?;
        if self.deck.size() <= self.kitty_size() {
            return Err(DomainError::validation_other(
                "Invariant violated: draw phase with only the kitty left",
            ));
        }
        Ok(self.deck.known().and_then(|deck| deck.last().copied()))
    }

    pub fn apply_add_to_hand(
        &mut self,
        p: PlayerId,
        card: Option<CardBase>,
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Draw], "add_to_hand")?;
        match &mut self.deck {
            Concealed::Known(deck) => {
                let top = deck
                    .pop()
                    .ok_or_else(|| DomainError::protocol("draw from an empty deck"))?;
                if card.is_some_and(|c| c != top) {
                    return Err(DomainError::protocol(format!(
                        "drawn card {top} disagrees with effect"
                    )));
                }
            }
            Concealed::Hidden { size } => {
                *size = size
                    .checked_sub(1)
                    .ok_or_else(|| DomainError::protocol("draw from an empty deck"))?;
            }
        }
        let hand = require_hand_mut(self, p, "add_to_hand")?;
        match (hand, card) {
            (Concealed::Known(pile), Some(card)) => pile.insert(card),
            (Concealed::Hidden { size }, _) => *size += 1,
            (Concealed::Known(_), None) => {
                return Err(DomainError::protocol(format!(
                    "draw for visible hand of {p} without a card"
                )))
            }
        }
        self.draw_seat = (self.draw_seat + 1) % self.order.len();
        if self.deck.size() == self.kitty_size() {
            self.set_aside_kitty();
        }
        Ok(())
    }

    /// Whatever is left of the deck becomes the kitty; enters `Prepare`.
    fn set_aside_kitty(&mut self) {
        let emptied = match self.deck {
            Concealed::Known(_) => Concealed::Known(Vec::new()),
            Concealed::Hidden { .. } => Concealed::Hidden { size: 0 },
        };
        let rest = std::mem::replace(&mut self.deck, emptied);
        self.kitty = match rest {
            Concealed::Known(cards) => Concealed::Known(CardPile::from_cards(cards, self.tr)),
            Concealed::Hidden { size } => Concealed::Hidden { size },
        };
        self.phase = Phase::Prepare;
    }
}
