//! Intent handling for both sides of the protocol.
//!
//! On the server an intent is validated against the full state, turned into
//! one unredacted effect, applied, and then redacted once per recipient.
//! Clients apply the redacted effects they receive with the same domain code.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::domain::combos::{FlightSpec, PlaySpec, TractorSpec};
use crate::domain::kitty::ReadyOutcome;
use crate::domain::state::{ClientState, PlayerId, Zpy};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::{Effect, Intent, Update};
use crate::services::redaction;

/// Generic game engine driven by a single-writer server.
pub trait Engine {
    type Config;
    type Intent;
    type State;
    type ClientState;
    type Effect;
    type Error;

    fn init(&self, config: Self::Config) -> Self::State;

    /// Validate `intent` from `who`, apply it, and return each client's effect.
    fn larp(
        &self,
        state: &mut Self::State,
        intent: &Self::Intent,
        who: PlayerId,
        clients: &[PlayerId],
    ) -> Result<BTreeMap<PlayerId, Self::Effect>, Self::Error>;

    /// The effect `me` would receive, when it does not depend on hidden state.
    fn predict(
        &self,
        state: &Self::ClientState,
        intent: &Self::Intent,
        me: PlayerId,
    ) -> Option<Result<Self::Effect, Self::Error>>;

    fn apply_client(
        &self,
        state: &mut Self::ClientState,
        update: &Update<Self::Effect>,
    ) -> Result<(), Self::Error>;

    fn redact(&self, state: &Self::State, who: PlayerId) -> Self::ClientState;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZpyEngine;

impl Engine for ZpyEngine {
    type Config = GameConfig;
    type Intent = Intent;
    type State = Zpy;
    type ClientState = ClientState;
    type Effect = Effect;
    type Error = DomainError;

    fn init(&self, config: GameConfig) -> Zpy {
        init(config)
    }

    fn larp(
        &self,
        state: &mut Zpy,
        intent: &Intent,
        who: PlayerId,
        clients: &[PlayerId],
    ) -> Result<BTreeMap<PlayerId, Effect>, DomainError> {
        larp(state, intent, who, clients)
    }

    fn predict(
        &self,
        state: &ClientState,
        intent: &Intent,
        me: PlayerId,
    ) -> Option<Result<Effect, DomainError>> {
        predict(state, intent, me)
    }

    fn apply_client(&self, state: &mut ClientState, update: &Update) -> Result<(), DomainError> {
        apply_client(state, update)
    }

    fn redact(&self, state: &Zpy, who: PlayerId) -> ClientState {
        redaction::redact(state, who)
    }
}

/// Fresh lobby. Without a configured seed one is drawn from the OS.
pub fn init(config: GameConfig) -> Zpy {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    debug!(seed, rules = ?config.rules, "Game initialized");
    Zpy::new(config.rules, Some(seed))
}

pub fn larp(
    state: &mut Zpy,
    intent: &Intent,
    who: PlayerId,
    clients: &[PlayerId],
) -> Result<BTreeMap<PlayerId, Effect>, DomainError> {
    require_actor(intent, who)?;
    let effect = match plan(state, intent) {
        Ok(effect) => effect,
        Err(err) => {
            debug!(player = who, intent = intent.name(), error = %err, "Intent rejected");
            return Err(err);
        }
    };

    let mut next = state.clone();
    if let Err(err) = apply_effect(&mut next, &effect) {
        // a validated intent whose effect cannot apply is an engine defect
        error!(player = who, effect = effect.name(), error = %err, "Effect failed after validation");
        return Err(err);
    }
    let from = state.phase;
    *state = next;

    info!(player = who, effect = effect.name(), "Intent applied");
    if state.phase != from {
        debug!(from = ?from, to = ?state.phase, round = state.round, "Transition");
    }

    Ok(clients
        .iter()
        .map(|&c| (c, effect.for_recipient(c)))
        .collect())
}

pub fn predict(
    state: &ClientState,
    intent: &Intent,
    me: PlayerId,
) -> Option<Result<Effect, DomainError>> {
    if let Err(err) = require_actor(intent, me) {
        return Some(Err(err));
    }
    match intent {
        Intent::StartGame { .. }
        | Intent::DrawCard { .. }
        | Intent::RequestRedeal { .. }
        | Intent::Ready { .. }
        | Intent::ContestFly { .. }
        | Intent::EndRound { .. }
        | Intent::NextRound { .. } => None,
        _ => Some(plan(state, intent).map(|effect| effect.for_recipient(me))),
    }
}

/// Apply a confirmed update; membership events leave the game untouched.
pub fn apply_client(state: &mut ClientState, update: &Update) -> Result<(), DomainError> {
    let Update::Engine(effect) = update else {
        return Ok(());
    };
    let mut next = state.state.clone();
    apply_effect(&mut next, effect).inspect_err(|err| {
        warn!(viewer = state.viewer, effect = effect.name(), error = %err, "Effect rejected by client");
    })?;
    state.state = next;
    Ok(())
}

fn require_actor(intent: &Intent, who: PlayerId) -> Result<(), DomainError> {
    if intent.player() == who {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::ActorMismatch,
            format!("player {who} sent an intent for {}", intent.player()),
        ))
    }
}

/// Validate an intent and build its unredacted effect. Never mutates.
fn plan(state: &Zpy, intent: &Intent) -> Result<Effect, DomainError> {
    let effect = match intent {
        &Intent::AddPlayer { player } => {
            state.check_add_player(player)?;
            Effect::AddPlayer { player }
        }
        &Intent::SetDecks { player, ndecks } => {
            state.check_set_decks(player, ndecks)?;
            Effect::SetDecks { player, ndecks }
        }
        &Intent::StartGame { player } => Effect::InitGame {
            order: state.check_start_game(player)?,
        },
        &Intent::DrawCard { player } => Effect::AddToHand {
            player,
            card: state.check_draw_card(player)?,
        },
        &Intent::BidTrump { player, card, n } => {
            state.check_bid_trump(player, card, n)?;
            Effect::SecureBid { player, card, n }
        }
        &Intent::RequestRedeal { player } => {
            state.check_request_redeal(player)?;
            Effect::Redeal
        }
        &Intent::Ready { player } => match state.check_ready(player)? {
            ReadyOutcome::Waiting => Effect::Ready { player },
            ReadyOutcome::InstallHost { host } => Effect::InstallHost {
                host,
                kitty: state.redact_kitty_for(host, host),
            },
        },
        Intent::ReplaceKitty { player, cards } => {
            state.check_replace_kitty(*player, cards)?;
            Effect::ReplaceKitty {
                player: *player,
                cards: cards.clone(),
            }
        }
        Intent::CallFriends { player, calls } => {
            state.check_call_friends(*player, calls)?;
            Effect::CallFriends {
                player: *player,
                calls: calls.clone(),
            }
        }
        Intent::LeadPlay { player, flight } => {
            let flight = state.check_lead_play(*player, flight)?;
            Effect::LeadPlay {
                player: *player,
                flight: FlightSpec::from(&flight),
            }
        }
        Intent::ContestFly { player, cards } => {
            let rejection = state.check_contest_fly(*player, cards)?;
            Effect::RejectFly {
                player: *player,
                reveal: rejection.reveal,
                tractor: TractorSpec::from(&rejection.tractor),
            }
        }
        &Intent::PassContest { player } => {
            state.check_pass_contest(player)?;
            Effect::PassContest { player }
        }
        Intent::FollowLead { player, play } => {
            let (play, renege) = state.check_follow_lead(*player, play)?;
            Effect::FollowLead {
                player: *player,
                play: PlaySpec::from(&play),
                renege,
            }
        }
        &Intent::EndRound { player } => {
            let (kitty, reneges) = state.check_end_round(player)?;
            Effect::Finish { kitty, reneges }
        }
        &Intent::NextRound { player } => {
            state.check_next_round(player)?;
            Effect::NextRound
        }
    };
    Ok(effect)
}

fn malformed(effect: &Effect, err: DomainError) -> DomainError {
    DomainError::protocol(format!("malformed {} effect: {err}", effect.name()))
}

/// Apply one effect. Shared by the server (unredacted) and clients.
pub fn apply_effect(state: &mut Zpy, effect: &Effect) -> Result<(), DomainError> {
    match effect {
        &Effect::AddPlayer { player } => {
            state.apply_add_player(player);
            Ok(())
        }
        &Effect::SetDecks { ndecks, .. } => {
            state.apply_set_decks(ndecks);
            Ok(())
        }
        Effect::InitGame { order } => state.apply_init_game(order.clone()),
        &Effect::AddToHand { player, card } => state.apply_add_to_hand(player, card),
        &Effect::SecureBid { player, card, n } => state.apply_secure_bid(player, card, n),
        Effect::Redeal => state.apply_redeal(),
        &Effect::Ready { player } => state.apply_ready(player),
        Effect::InstallHost { host, kitty } => state.apply_install_host(*host, kitty.clone()),
        Effect::ReplaceKitty { player, cards } => state.apply_replace_kitty(*player, cards),
        &Effect::SealHand { player, count } => state.apply_seal_hand(player, count),
        Effect::CallFriends { calls, .. } => state.apply_call_friends(calls),
        Effect::LeadPlay { player, flight } | Effect::ObserveLead { player, flight } => {
            let flight = flight.resolve(state.tr).map_err(|e| malformed(effect, e))?;
            state.apply_lead_play(*player, flight)
        }
        Effect::RejectFly { tractor, .. } => {
            let tractor = tractor.resolve(state.tr).map_err(|e| malformed(effect, e))?;
            state.apply_reject_fly(tractor)
        }
        &Effect::PassContest { player } => state.apply_pass_contest(player),
        Effect::FollowLead {
            player,
            play,
            renege,
        } => {
            let play = play.resolve(state.tr).map_err(|e| malformed(effect, e))?;
            state.apply_follow_lead(*player, play, renege.clone())
        }
        Effect::ObserveFollow { player, play } => {
            let play = play.resolve(state.tr).map_err(|e| malformed(effect, e))?;
            state.apply_follow_lead(*player, play, None)
        }
        Effect::Finish { kitty, reneges } => state.apply_finish(kitty.clone(), reneges.clone()),
        Effect::NextRound => state.apply_next_round(),
    }
}
