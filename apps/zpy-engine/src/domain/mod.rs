//! Domain layer: the card model, structured piles, combos and the round
//! state machine. Pure and synchronous; no logging, no I/O.

pub mod bidding;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod combos;
pub mod dealing;
pub mod draw;
pub mod friends;
pub mod hand;
pub mod kitty;
pub mod lobby;
pub mod pile;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod state;
pub mod trick;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
pub(crate) mod test_state_helpers;
#[cfg(test)]
mod tests_props_cards;
#[cfg(test)]
mod tests_props_pile;
#[cfg(test)]
mod tests_scenarios;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use cards_logic::{card_beats, compare, point_value, total_points};
pub use cards_parsing::{parse_card_list, try_parse_cards};
pub use cards_types::{Card, CardBase, Rank, Suit, TrumpMeta};
pub use combos::{Flight, FlightSpec, Play, PlaySpec, Shape, Toss, Tractor, TractorSpec};
pub use hand::{FollowViolation, Hand};
pub use kitty::ReadyOutcome;
pub use pile::CardPile;
pub use rules::{
    BidRule, KittyMultiplierRule, RankOutcome, RankSkipRule, RedealRule, RenegeAction,
    RenegePolicy, RenegeRule, RuleConfig,
};
pub use scoring::RoundResult;
pub use seed_derivation::{derive_dealing_seed, derive_seating_seed};
pub use state::{Bid, ClientState, Concealed, FriendCall, Phase, PlayerId, Renege, Zpy};
pub use trick::Trick;
pub use tricks::FlyRejection;
