use serde::{Deserialize, Serialize};

use crate::domain::cards_types::CardBase;
use crate::domain::combos::{FlightSpec, PlaySpec};
use crate::domain::state::PlayerId;

/// A player's request to act. Every intent names its actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    AddPlayer {
        player: PlayerId,
    },
    SetDecks {
        player: PlayerId,
        ndecks: usize,
    },
    StartGame {
        player: PlayerId,
    },
    DrawCard {
        player: PlayerId,
    },
    /// Show `n` copies of `card` to claim trump.
    BidTrump {
        player: PlayerId,
        card: CardBase,
        n: usize,
    },
    RequestRedeal {
        player: PlayerId,
    },
    Ready {
        player: PlayerId,
    },
    ReplaceKitty {
        player: PlayerId,
        cards: Vec<CardBase>,
    },
    /// `(card, nth)`: whoever plays the nth copy of `card` joins the host.
    CallFriends {
        player: PlayerId,
        calls: Vec<(CardBase, usize)>,
    },
    LeadPlay {
        player: PlayerId,
        flight: FlightSpec,
    },
    /// Reveal a tractor that beats part of a fly.
    ContestFly {
        player: PlayerId,
        cards: Vec<CardBase>,
    },
    PassContest {
        player: PlayerId,
    },
    FollowLead {
        player: PlayerId,
        play: PlaySpec,
    },
    EndRound {
        player: PlayerId,
    },
    NextRound {
        player: PlayerId,
    },
}

impl Intent {
    pub fn player(&self) -> PlayerId {
        match self {
            Intent::AddPlayer { player }
            | Intent::SetDecks { player, .. }
            | Intent::StartGame { player }
            | Intent::DrawCard { player }
            | Intent::BidTrump { player, .. }
            | Intent::RequestRedeal { player }
            | Intent::Ready { player }
            | Intent::ReplaceKitty { player, .. }
            | Intent::CallFriends { player, .. }
            | Intent::LeadPlay { player, .. }
            | Intent::ContestFly { player, .. }
            | Intent::PassContest { player }
            | Intent::FollowLead { player, .. }
            | Intent::EndRound { player }
            | Intent::NextRound { player } => *player,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::AddPlayer { .. } => "add_player",
            Intent::SetDecks { .. } => "set_decks",
            Intent::StartGame { .. } => "start_game",
            Intent::DrawCard { .. } => "draw_card",
            Intent::BidTrump { .. } => "bid_trump",
            Intent::RequestRedeal { .. } => "request_redeal",
            Intent::Ready { .. } => "ready",
            Intent::ReplaceKitty { .. } => "replace_kitty",
            Intent::CallFriends { .. } => "call_friends",
            Intent::LeadPlay { .. } => "lead_play",
            Intent::ContestFly { .. } => "contest_fly",
            Intent::PassContest { .. } => "pass_contest",
            Intent::FollowLead { .. } => "follow_lead",
            Intent::EndRound { .. } => "end_round",
            Intent::NextRound { .. } => "next_round",
        }
    }
}
