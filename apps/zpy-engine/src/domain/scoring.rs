//! Round scoring: end_round / finish and next_round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cards_logic::total_points;
use super::cards_types::CardBase;
use super::pile::CardPile;
use super::rules::{kitty_multiplier, rank_up, RankOutcome, RenegePolicy, RANK_BREAKPOINTS};
use super::state::{
    require_host, require_phase, require_player, Concealed, Phase, PlayerId, Renege, Zpy,
};
use crate::errors::domain::DomainError;

/// Public summary of a scored round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub host: PlayerId,
    pub host_team: Vec<PlayerId>,
    /// Attacking points after kitty and renege adjustments.
    pub attackers_points: u32,
    pub kitty_points: u32,
    /// Zero when the host team took the last trick.
    pub kitty_multiplier: u32,
    pub attackers_win: bool,
    /// Ranks gained by the winning side.
    pub delta: usize,
    pub rank_changes: BTreeMap<PlayerId, RankOutcome>,
    pub next_host: PlayerId,
}

/// (attackers win, ranks gained) for `points` with `ndecks` decks.
///
/// With step `s = 20 * ndecks`: nothing gives the host team three ranks,
/// under `s` two, under `2s` one; from `2s` the attackers take over and gain
/// a rank per further `s`.
pub fn outcome(points: u32, ndecks: usize) -> (bool, usize) {
    let step = 20 * ndecks as u32;
    if points == 0 {
        (false, 3)
    } else if points < step {
        (false, 2)
    } else if points < 2 * step {
        (false, 1)
    } else {
        (true, ((points - 2 * step) / step) as usize)
    }
}

impl Zpy {
    /// On the server: the kitty's cards and the authoritative renege record.
    pub fn check_end_round(&self, p: PlayerId) -> Result<(Vec<CardBase>, Vec<Renege>), DomainError> {
        require_phase(self, &[Phase::Finish], "end_round")?;
        require_player(self, p)?;
        let kitty = self
            .kitty
            .known()
            .ok_or_else(|| DomainError::protocol("end_round needs the kitty"))?;
        Ok((kitty.bases(), self.reneges.clone()))
    }

    pub fn apply_finish(
        &mut self,
        kitty: Vec<CardBase>,
        reneges: Vec<Renege>,
    ) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Finish], "finish")?;
        if kitty.len() != self.kitty.size() {
            return Err(DomainError::protocol(format!(
                "revealed {} kitty cards, expected {}",
                kitty.len(),
                self.kitty.size()
            )));
        }
        self.kitty = Concealed::Known(CardPile::from_cards(kitty, self.tr));
        self.reneges = reneges;
        let result = self.score_round()?;
        for (p, change) in &result.rank_changes {
            if let Some(rank) = self.ranks.get_mut(p) {
                rank.apply(*change);
            }
        }
        self.result = Some(result);
        self.phase = Phase::Wait;
        Ok(())
    }

    fn score_round(&mut self) -> Result<RoundResult, DomainError> {
        let host = require_host(self, "finish")?;
        let tr = self.tr;
        let ndecks = self.ndecks();
        let attackers = self.attackers();

        let mut points: i64 = attackers
            .iter()
            .map(|p| self.points.get(p).copied().unwrap_or(0) as i64)
            .sum();

        let kitty_cards = self.kitty.known().map(|k| k.bases()).unwrap_or_default();
        let kitty_points = total_points(kitty_cards.iter());
        let mut multiplier = 0;
        if let Some(last) = &self.last_trick {
            if !self.host_team.contains(&last.winner) {
                multiplier = kitty_multiplier(self.rules.kitty, last.winning_play().size());
                points += (kitty_points * multiplier) as i64;
            }
        }

        let penalty = self.rules.renege.penalty(ndecks) as i64;
        for renege in &self.reneges {
            if self.host_team.contains(&renege.player) {
                points += penalty;
            } else {
                points -= penalty;
            }
        }
        let points = points.max(0) as u32;
        let (attackers_win, delta) = outcome(points, ndecks);

        let round_rank = tr.rank;
        if RANK_BREAKPOINTS.contains(&round_rank) {
            if let Some(rank) = self.ranks.get_mut(&host) {
                rank.hosted.insert(round_rank);
            }
        }

        let winners: Vec<PlayerId> = if attackers_win {
            attackers.clone()
        } else {
            self.order
                .iter()
                .copied()
                .filter(|p| self.host_team.contains(p))
                .collect()
        };
        let mut rank_changes = BTreeMap::new();
        if delta > 0 {
            for p in &winners {
                if let Some(rank) = self.ranks.get(p) {
                    let change = rank_up(
                        self.rules.rank,
                        rank.rank,
                        delta,
                        &rank.hosted,
                        !attackers_win,
                    );
                    rank_changes.insert(*p, change);
                }
            }
        }

        let next_host = self
            .others_from(host)
            .into_iter()
            .find(|p| self.host_team.contains(p) != attackers_win)
            .unwrap_or(host);

        Ok(RoundResult {
            host,
            host_team: self
                .order
                .iter()
                .copied()
                .filter(|p| self.host_team.contains(p))
                .collect(),
            attackers_points: points,
            kitty_points,
            kitty_multiplier: multiplier,
            attackers_win,
            delta,
            rank_changes,
            next_host,
        })
    }

    pub fn check_next_round(&self, p: PlayerId) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Wait], "next_round")?;
        require_player(self, p)
    }

    pub fn game_winners(&self) -> Vec<PlayerId> {
        self.order
            .iter()
            .copied()
            .filter(|p| self.ranks.get(p).is_some_and(|r| r.won))
            .collect()
    }

    pub fn apply_next_round(&mut self) -> Result<(), DomainError> {
        require_phase(self, &[Phase::Wait], "next_round")?;
        if !self.game_winners().is_empty() {
            self.phase = Phase::GameOver;
            return Ok(());
        }
        let next_host = self
            .result
            .as_ref()
            .map(|r| r.next_host)
            .ok_or_else(|| DomainError::validation_other("Invariant violated: no round result"))?;
        self.host = Some(next_host);
        self.round += 1;
        self.redeals = 0;
        self.start_round();
        Ok(())
    }
}
