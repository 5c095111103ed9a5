//! Trick play: lead_play, fly contests and follow_lead.

use super::cards_types::CardBase;
use super::combos::{Flight, FlightSpec, Play, PlaySpec, Tractor};
use super::hand::{match_structure, FollowViolation};
use super::rules::{RenegeAction, RenegePolicy};
use super::state::{
    require_held, require_known_hand, require_leader, require_phase, require_player,
    require_trick, require_turn, Phase, PlayerId, Renege, Zpy,
};
use super::trick::Trick;
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of a valid contest: the lead shrinks to `tractor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyRejection {
    pub reveal: Vec<CardBase>,
    pub tractor: Tractor,
}

impl Zpy {
    /// No tuple can hold more copies of a card than there are decks.
    fn require_copies_exist(&self, flight: &Flight) -> Result<(), DomainError> {
        let ndecks = self.ndecks();
        match flight.tractors().iter().find(|t| t.shape.arity > ndecks) {
            Some(t) => Err(DomainError::validation(
                ValidationKind::InvalidTractor,
                format!("{} copies of {} with {ndecks} decks", t.shape.arity, t.card.base()),
            )),
            None => Ok(()),
        }
    }

    pub fn check_lead_play(&self, p: PlayerId, spec: &FlightSpec) -> Result<Flight, DomainError> {
        require_phase(self, &[Phase::Lead], "lead_play")?;
        require_player(self, p)?;
        require_turn(self.leader, p)?;
        let flight = spec.resolve(self.tr)?;
        self.require_copies_exist(&flight)?;
        let hand = require_known_hand(self, p, "lead_play")?;
        require_held(hand, &flight.bases(self.tr))?;
        Ok(flight)
    }

    pub fn apply_lead_play(&mut self, p: PlayerId, flight: Flight) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Lead], "lead_play")?;
        let cards = flight.bases(self.tr);
        let hand = self
            .hands
            .get_mut(&p)
            .ok_or_else(|| DomainError::protocol(format!("no hand for leader {p}")))?;
        if !hand.remove_all(&cards) {
            return Err(DomainError::protocol(format!("leader {p} cannot play {cards:?}")));
        }
        let is_fly = flight.is_fly();
        self.trick = Some(Trick::new(p, flight));
        self.passed.clear();
        if is_fly && self.order.len() > 1 {
            self.current = None;
            self.phase = Phase::Fly;
        } else {
            self.current = self.next_player(p);
            self.phase = Phase::Follow;
        }
        Ok(())
    }

    fn require_contester(&self, p: PlayerId, ctx: &'static str) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Fly], ctx)?;
        require_player(self, p)?;
        if require_leader(self, ctx)? == p {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "the leader cannot contest their own fly",
            ));
        }
        if self.passed.contains(&p) {
            return Err(DomainError::validation(
                ValidationKind::AlreadyActed,
                format!("player {p} already passed"),
            ));
        }
        Ok(())
    }

    pub fn check_pass_contest(&self, p: PlayerId) -> Result<(), DomainError> {
        self.require_contester(p, "pass_contest")
    }

    pub fn apply_pass_contest(&mut self, p: PlayerId) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Fly], "pass_contest")?;
        self.passed.insert(p);
        if self.passed.len() + 1 >= self.order.len() {
            let leader = require_leader(self, "pass_contest")?;
            self.passed.clear();
            self.current = self.next_player(leader);
            self.phase = Phase::Follow;
        }
        Ok(())
    }

    /// A contest must reveal a held tractor in the led suit that beats a lead
    /// component of the same shape. The lowest such component survives.
    pub fn check_contest_fly(
        &self,
        p: PlayerId,
        reveal: &[CardBase],
    ) -> Result<FlyRejection, DomainError> {
        self.require_contester(p, "contest_fly")?;
        let hand = require_known_hand(self, p, "contest_fly")?;
        require_held(hand, reveal)?;
        let trick = require_trick(self, "contest_fly")?;
        let cards: Vec<_> = reveal.iter().map(|c| c.virtualize(self.tr)).collect();
        let failed = |detail: &str| DomainError::validation(ValidationKind::ContestFailed, detail);
        let shown = Tractor::recognize(&cards, self.tr)
            .ok_or_else(|| failed("revealed cards are not one tractor"))?;
        if shown.v_suit() != trick.lead.v_suit() {
            return Err(failed("revealed cards are not in the led suit"));
        }
        let beaten = trick
            .lead
            .tractors()
            .iter()
            .filter(|t| shown.beats(t))
            .min_by_key(|t| t.card.v_rank)
            .ok_or_else(|| failed("revealed tractor beats no part of the lead"))?;
        Ok(FlyRejection {
            reveal: reveal.to_vec(),
            tractor: beaten.clone(),
        })
    }

    pub fn apply_reject_fly(&mut self, tractor: Tractor) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Fly], "reject_fly")?;
        let tr = self.tr;
        let trick = self
            .trick
            .as_mut()
            .ok_or_else(|| DomainError::protocol("reject_fly without a lead"))?;
        if !trick.lead.tractors().contains(&tractor) {
            return Err(DomainError::protocol("reject_fly names a tractor outside the lead"));
        }
        let mut returned = trick.lead.bases(tr);
        for card in tractor.bases(tr) {
            if let Some(i) = returned.iter().position(|&c| c == card) {
                returned.swap_remove(i);
            }
        }
        let leader = trick.leader;
        trick.lead = Flight::single(tractor);
        self.hands
            .get_mut(&leader)
            .ok_or_else(|| DomainError::protocol(format!("no hand for leader {leader}")))?
            .insert_all(&returned);
        self.passed.clear();
        self.current = self.next_player(leader);
        self.phase = Phase::Follow;
        Ok(())
    }

    /// Validates a follow. A toss shaped like the lead is read as a flight.
    /// Under an accusing renege policy an illegal follow stands and the
    /// violation is returned for the record.
    pub fn check_follow_lead(
        &self,
        p: PlayerId,
        spec: &PlaySpec,
    ) -> Result<(Play, Option<FollowViolation>), DomainError> {
        require_phase(self, &[Phase::Follow], "follow_lead")?;
        require_player(self, p)?;
        require_turn(self.current, p)?;
        let trick = require_trick(self, "follow_lead")?;
        let mut play = spec.resolve(self.tr)?;
        if let Play::Flight(fl) = &play {
            self.require_copies_exist(fl)?;
        }
        let hand = require_known_hand(self, p, "follow_lead")?;
        require_held(hand, &play.bases(self.tr))?;
        if let Play::Toss(toss) = &play {
            if let Some(fl) = match_structure(toss.cards(), &trick.lead, self.tr) {
                play = Play::Flight(fl);
            }
        }
        let Some(violation) = hand.follow_violation(&trick.lead, &play) else {
            return Ok((play, None));
        };
        match self.rules.renege.on_violation(&violation) {
            RenegeAction::Record => Ok((play, Some(violation))),
            RenegeAction::Reject => {
                let kind = match violation {
                    FollowViolation::SizeMismatch { .. } => ValidationKind::SizeMismatch,
                    _ => ValidationKind::MustFollow,
                };
                Err(DomainError::validation(kind, format!("{violation:?}")))
            }
        }
    }

    pub fn apply_follow_lead(
        &mut self,
        p: PlayerId,
        play: Play,
        renege: Option<FollowViolation>,
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Follow], "follow_lead")?;
        let cards = play.bases(self.tr);
        let hand = self
            .hands
            .get_mut(&p)
            .ok_or_else(|| DomainError::protocol(format!("no hand for {p}")))?;
        if !hand.remove_all(&cards) {
            return Err(DomainError::protocol(format!("{p} cannot play {cards:?}")));
        }
        if let Some(violation) = renege {
            self.reneges.push(Renege {
                player: p,
                trick_no: self.trick_no,
                violation,
            });
        }
        let trick = self
            .trick
            .as_mut()
            .ok_or_else(|| DomainError::protocol("follow without a lead"))?;
        trick.add_follow(p, play);
        if trick.follows.len() + 1 >= self.order.len() {
            self.complete_trick()?;
        } else {
            self.current = self.next_player(p);
        }
        Ok(())
    }

    /// Award the trick, note friend cards, and move to the next lead or the
    /// end of the round.
    fn complete_trick(&mut self) -> Result<(), DomainError> {
        let trick = self
            .trick
            .take()
            .ok_or_else(|| DomainError::protocol("no trick to complete"))?;
        let tr = self.tr;
        *self.points.entry(trick.winner).or_insert(0) += trick.points(tr);
        self.note_friend_plays(trick.leader, &trick.lead.bases(tr));
        for (player, play) in &trick.follows {
            self.note_friend_plays(*player, &play.bases(tr));
        }
        self.trick_no += 1;
        self.current = None;
        let winner = trick.winner;
        self.last_trick = Some(trick);
        if self.hands.values().all(|h| h.size() == 0) {
            self.leader = None;
            self.phase = Phase::Finish;
        } else {
            self.leader = Some(winner);
            self.phase = Phase::Lead;
        }
        Ok(())
    }
}
