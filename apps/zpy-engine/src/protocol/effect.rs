use serde::{Deserialize, Serialize};

use crate::domain::cards_types::CardBase;
use crate::domain::combos::{FlightSpec, PlaySpec, TractorSpec};
use crate::domain::hand::FollowViolation;
use crate::domain::state::{Concealed, PlayerId, Renege};

/// A state transition as seen by one recipient.
///
/// The server applies the unredacted form; each client receives the form
/// returned by [`Effect::for_recipient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    AddPlayer {
        player: PlayerId,
    },
    SetDecks {
        player: PlayerId,
        ndecks: usize,
    },
    InitGame {
        order: Vec<PlayerId>,
    },
    /// `card` is only present for the drawer.
    AddToHand {
        player: PlayerId,
        card: Option<CardBase>,
    },
    SecureBid {
        player: PlayerId,
        card: CardBase,
        n: usize,
    },
    Redeal,
    Ready {
        player: PlayerId,
    },
    /// Everyone is ready; the kitty is only visible to the host.
    InstallHost {
        host: PlayerId,
        kitty: Concealed<Vec<CardBase>>,
    },
    ReplaceKitty {
        player: PlayerId,
        cards: Vec<CardBase>,
    },
    /// The host buried `count` cards nobody else saw.
    SealHand {
        player: PlayerId,
        count: usize,
    },
    CallFriends {
        player: PlayerId,
        calls: Vec<(CardBase, usize)>,
    },
    LeadPlay {
        player: PlayerId,
        flight: FlightSpec,
    },
    ObserveLead {
        player: PlayerId,
        flight: FlightSpec,
    },
    /// `player` revealed `reveal`; the lead shrinks to `tractor`.
    RejectFly {
        player: PlayerId,
        reveal: Vec<CardBase>,
        tractor: TractorSpec,
    },
    PassContest {
        player: PlayerId,
    },
    FollowLead {
        player: PlayerId,
        play: PlaySpec,
        /// Server bookkeeping only; never sent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        renege: Option<FollowViolation>,
    },
    ObserveFollow {
        player: PlayerId,
        play: PlaySpec,
    },
    /// Round over: the kitty is revealed along with every recorded renege.
    Finish {
        kitty: Vec<CardBase>,
        reneges: Vec<Renege>,
    },
    NextRound,
}

impl Effect {
    /// The variant of this effect that `recipient` may see.
    pub fn for_recipient(&self, recipient: PlayerId) -> Effect {
        match self {
            Effect::AddToHand { player, card } => Effect::AddToHand {
                player: *player,
                card: if *player == recipient { *card } else { None },
            },
            Effect::InstallHost { host, kitty } if *host != recipient => Effect::InstallHost {
                host: *host,
                kitty: kitty.hidden(),
            },
            Effect::ReplaceKitty { player, cards } if *player != recipient => Effect::SealHand {
                player: *player,
                count: cards.len(),
            },
            Effect::LeadPlay { player, flight } if *player != recipient => Effect::ObserveLead {
                player: *player,
                flight: flight.clone(),
            },
            Effect::FollowLead { player, play, .. } if *player != recipient => {
                Effect::ObserveFollow {
                    player: *player,
                    play: play.clone(),
                }
            }
            Effect::FollowLead { player, play, .. } => Effect::FollowLead {
                player: *player,
                play: play.clone(),
                renege: None,
            },
            other => other.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::AddPlayer { .. } => "add_player",
            Effect::SetDecks { .. } => "set_decks",
            Effect::InitGame { .. } => "init_game",
            Effect::AddToHand { .. } => "add_to_hand",
            Effect::SecureBid { .. } => "secure_bid",
            Effect::Redeal => "redeal",
            Effect::Ready { .. } => "ready",
            Effect::InstallHost { .. } => "install_host",
            Effect::ReplaceKitty { .. } => "replace_kitty",
            Effect::SealHand { .. } => "seal_hand",
            Effect::CallFriends { .. } => "call_friends",
            Effect::LeadPlay { .. } => "lead_play",
            Effect::ObserveLead { .. } => "observe_lead",
            Effect::RejectFly { .. } => "reject_fly",
            Effect::PassContest { .. } => "pass_contest",
            Effect::FollowLead { .. } => "follow_lead",
            Effect::ObserveFollow { .. } => "observe_follow",
            Effect::Finish { .. } => "finish",
            Effect::NextRound => "next_round",
        }
    }
}
