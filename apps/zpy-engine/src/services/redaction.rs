//! Server state to per-player client state.

use crate::domain::state::{ClientState, Concealed, Phase, PlayerId, Zpy};

/// Project the server state for `viewer`.
///
/// Other hands and the deck become counts. The kitty stays visible only to
/// the host while it is theirs, and to everyone once the round is scored.
/// Reneges stay secret until scoring.
pub fn redact(state: &Zpy, viewer: PlayerId) -> ClientState {
    let mut view = state.clone();
    for (&p, hand) in view.hands.iter_mut() {
        if p != viewer {
            *hand = hand.hidden();
        }
    }
    view.deck = view.deck.hidden();
    if !kitty_visible(state, viewer) {
        view.kitty = view.kitty.hidden();
    }
    if !matches!(state.phase, Phase::Wait | Phase::GameOver) {
        view.reneges.clear();
    }
    ClientState::new(viewer, view)
}

fn kitty_visible(state: &Zpy, viewer: PlayerId) -> bool {
    match state.phase {
        Phase::Wait | Phase::GameOver => true,
        Phase::Kitty | Phase::Friend | Phase::Lead | Phase::Fly | Phase::Follow | Phase::Finish => {
            state.host == Some(viewer)
        }
        _ => false,
    }
}

/// Whether `view` leaks nothing `viewer` may not know.
pub fn is_redacted_for(view: &ClientState, viewer: PlayerId) -> bool {
    let hands_hidden = view
        .hands
        .iter()
        .all(|(&p, hand)| p == viewer || matches!(hand, Concealed::Hidden { .. }));
    hands_hidden && !view.deck.is_known() && view.seed.is_none()
}
