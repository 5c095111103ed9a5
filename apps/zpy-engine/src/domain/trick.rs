//! One trick: a lead, its follows, and the running winner.

use serde::{Deserialize, Serialize};

use super::cards_logic::point_value;
use super::cards_types::{CardBase, TrumpMeta};
use super::combos::{Flight, Play};
use super::state::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub leader: PlayerId,
    pub lead: Flight,
    pub follows: Vec<(PlayerId, Play)>,
    pub winner: PlayerId,
}

impl Trick {
    pub fn new(leader: PlayerId, lead: Flight) -> Self {
        Self {
            leader,
            lead,
            follows: Vec::new(),
            winner: leader,
        }
    }

    /// The play currently holding the trick.
    pub fn winning_play(&self) -> Play {
        if self.winner == self.leader {
            return Play::Flight(self.lead.clone());
        }
        self.follows
            .iter()
            .find(|(p, _)| *p == self.winner)
            .map(|(_, play)| play.clone())
            .unwrap_or_else(|| Play::Flight(self.lead.clone()))
    }

    /// Whether `play` takes the trick from the current winner.
    ///
    /// Only a flight with the lead's exact shape sequence can win; it must
    /// strictly beat the winner's leading tractor.
    pub fn beats_winner(&self, play: &Play) -> bool {
        let Play::Flight(fl) = play else {
            return false;
        };
        if fl.shapes() != self.lead.shapes() {
            return false;
        }
        match self.winning_play() {
            Play::Flight(best) => fl.leading().beats(best.leading()),
            Play::Toss(_) => true,
        }
    }

    /// Record a follow; returns whether it took the lead.
    pub fn add_follow(&mut self, player: PlayerId, play: Play) -> bool {
        let wins = self.beats_winner(&play);
        self.follows.push((player, play));
        if wins {
            self.winner = player;
        }
        wins
    }

    pub fn cards(&self, tr: TrumpMeta) -> Vec<CardBase> {
        let mut out = self.lead.bases(tr);
        for (_, play) in &self.follows {
            out.extend(play.bases(tr));
        }
        out
    }

    pub fn points(&self, tr: TrumpMeta) -> u32 {
        self.cards(tr).iter().map(|c| point_value(c.rank)).sum()
    }
}
