use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::cards_types::Rank;
use super::hand::FollowViolation;

pub const MIN_PLAYERS: usize = 4;

/// Hard ceiling on decks in play, and so on copies of any one card.
pub const MAX_DECKS: usize = 32;

/// Ranks a player may not climb past freely under the rank-skip rules.
pub const RANK_BREAKPOINTS: [Rank; 4] = [Rank::Five, Rank::Ten, Rank::Jack, Rank::King];

/// Deck counts offered for a table of `nplayers`.
pub fn valid_deck_range(nplayers: usize) -> RangeInclusive<usize> {
    let n = nplayers.max(MIN_PLAYERS);
    (n * 2 / 5).max(1)..=n * 4 / 5
}

pub fn default_decks(nplayers: usize) -> usize {
    (nplayers / 2).max(1)
}

/// Friends the host calls: none at four seats, else half the table minus one.
pub fn friend_count(nplayers: usize) -> usize {
    if nplayers <= MIN_PLAYERS {
        0
    } else {
        nplayers / 2 - 1
    }
}

/// What happens to a follow that breaks suit or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenegeRule {
    /// Illegal follows are rejected outright.
    #[default]
    Forbid,
    /// Illegal follows stand but are recorded and penalized at round end.
    Accuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSkipRule {
    /// Must host each breakpoint rank once before ranking past it.
    #[default]
    HostOnce,
    /// Must pause at each breakpoint rank.
    NoSkip,
    /// Can only rank past a breakpoint by winning as host.
    NoPass,
    NoRule,
}

/// Kitty point multiplier, `n` being the size of the winning final play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KittyMultiplierRule {
    /// 2^n
    #[default]
    Exp,
    /// 2n
    Mult,
}

/// Precedence between trump bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidRule {
    /// More cards shown wins; ties keep the standing bid.
    CountOnly,
    /// More cards shown wins; at equal count joker bids beat natural bids and
    /// big jokers beat small jokers.
    #[default]
    CountThenJoker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedealRule {
    /// A player holding no trump at all after the draw may ask for a redeal.
    #[default]
    NoTrumps,
    Never,
}

/// Rule variants chosen for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub renege: RenegeRule,
    pub rank: RankSkipRule,
    pub kitty: KittyMultiplierRule,
    pub bid: BidRule,
    pub redeal: RedealRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenegeAction {
    Reject,
    Record,
}

/// Policy for follows that fail suit or structure obligations.
pub trait RenegePolicy {
    fn on_violation(&self, violation: &FollowViolation) -> RenegeAction;

    /// Points moved per recorded renege.
    fn penalty(&self, ndecks: usize) -> u32;
}

impl RenegePolicy for RenegeRule {
    fn on_violation(&self, violation: &FollowViolation) -> RenegeAction {
        match (self, violation) {
            (_, FollowViolation::SizeMismatch { .. }) => RenegeAction::Reject,
            (RenegeRule::Forbid, _) => RenegeAction::Reject,
            (RenegeRule::Accuse, _) => RenegeAction::Record,
        }
    }

    fn penalty(&self, ndecks: usize) -> u32 {
        match self {
            RenegeRule::Forbid => 0,
            RenegeRule::Accuse => 10 * ndecks as u32,
        }
    }
}

pub fn kitty_multiplier(rule: KittyMultiplierRule, n: usize) -> u32 {
    match rule {
        KittyMultiplierRule::Exp => 2u32.saturating_pow(n as u32),
        KittyMultiplierRule::Mult => 2 * n as u32,
    }
}

/// Where a rank-up lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rank", rename_all = "snake_case")]
pub enum RankOutcome {
    Rank(Rank),
    /// Ranked past the ace: the game is won.
    Won,
}

/// Climb `delta` ranks from `start` under `rule`.
///
/// `hosted` holds the breakpoint ranks this player has hosted at, including
/// the round just played; `won_as_host` is whether they won it as host.
pub fn rank_up(
    rule: RankSkipRule,
    start: Rank,
    delta: usize,
    hosted: &BTreeSet<Rank>,
    won_as_host: bool,
) -> RankOutcome {
    let mut rank = start;
    for step in 0..delta {
        if RANK_BREAKPOINTS.contains(&rank) {
            let may_pass = match rule {
                RankSkipRule::NoRule => true,
                RankSkipRule::NoSkip => step == 0,
                RankSkipRule::NoPass => step == 0 && won_as_host,
                RankSkipRule::HostOnce => hosted.contains(&rank),
            };
            if !may_pass {
                break;
            }
        }
        if rank == Rank::Ace {
            return RankOutcome::Won;
        }
        rank = next_natural(rank);
    }
    RankOutcome::Rank(rank)
}

fn next_natural(rank: Rank) -> Rank {
    debug_assert!(rank < Rank::Ace);
    Rank::from_value(rank.value() + 1).unwrap_or(Rank::Ace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> BTreeSet<Rank> {
        BTreeSet::new()
    }

    #[test]
    fn deck_range_and_friends() {
        assert_eq!(valid_deck_range(4), 1..=3);
        assert_eq!(valid_deck_range(6), 2..=4);
        assert_eq!(default_decks(4), 2);
        assert_eq!(friend_count(4), 0);
        assert_eq!(friend_count(6), 2);
        assert_eq!(friend_count(7), 2);
    }

    #[test]
    fn kitty_multipliers() {
        assert_eq!(kitty_multiplier(KittyMultiplierRule::Exp, 1), 2);
        assert_eq!(kitty_multiplier(KittyMultiplierRule::Exp, 4), 16);
        assert_eq!(kitty_multiplier(KittyMultiplierRule::Mult, 4), 8);
    }

    #[test]
    fn no_rule_climbs_freely() {
        assert_eq!(
            rank_up(RankSkipRule::NoRule, Rank::Three, 3, &none(), false),
            RankOutcome::Rank(Rank::Six)
        );
        assert_eq!(
            rank_up(RankSkipRule::NoRule, Rank::King, 2, &none(), false),
            RankOutcome::Won
        );
    }

    #[test]
    fn no_skip_pauses_at_breakpoints() {
        assert_eq!(
            rank_up(RankSkipRule::NoSkip, Rank::Three, 3, &none(), false),
            RankOutcome::Rank(Rank::Five)
        );
        assert_eq!(
            rank_up(RankSkipRule::NoSkip, Rank::Five, 2, &none(), false),
            RankOutcome::Rank(Rank::Seven)
        );
    }

    #[test]
    fn no_pass_requires_host_win() {
        assert_eq!(
            rank_up(RankSkipRule::NoPass, Rank::Five, 2, &none(), false),
            RankOutcome::Rank(Rank::Five)
        );
        assert_eq!(
            rank_up(RankSkipRule::NoPass, Rank::Five, 2, &none(), true),
            RankOutcome::Rank(Rank::Seven)
        );
    }

    #[test]
    fn host_once_remembers_hosting() {
        let hosted: BTreeSet<Rank> = [Rank::Ten].into_iter().collect();
        assert_eq!(
            rank_up(RankSkipRule::HostOnce, Rank::Nine, 3, &hosted, false),
            RankOutcome::Rank(Rank::Jack)
        );
        assert_eq!(
            rank_up(RankSkipRule::HostOnce, Rank::Four, 3, &none(), false),
            RankOutcome::Rank(Rank::Five)
        );
    }

    #[test]
    fn renege_rules() {
        let v = FollowViolation::SizeMismatch { expected: 2, got: 1 };
        assert_eq!(RenegeRule::Accuse.on_violation(&v), RenegeAction::Reject);
        let v = FollowViolation::SuitNotFollowed {
            suit: crate::domain::cards_types::Suit::Clubs,
        };
        assert_eq!(RenegeRule::Accuse.on_violation(&v), RenegeAction::Record);
        assert_eq!(RenegeRule::Forbid.on_violation(&v), RenegeAction::Reject);
        assert_eq!(RenegeRule::Accuse.penalty(2), 20);
    }
}
