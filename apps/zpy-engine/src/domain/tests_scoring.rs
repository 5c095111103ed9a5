//! Round scoring, rank changes and the next round.

use super::cards_types::{Rank, Suit, TrumpMeta};
use super::hand::FollowViolation;
use super::rules::{RankOutcome, RenegeRule, RuleConfig};
use super::state::{Phase, Renege, Zpy};
use super::test_state_helpers::{bases, flight, make_state, trump, MakeStateArgs};
use super::trick::Trick;

const KITTY: &str = "5C 5C KD 3S 4S 6S 7S 8S";

fn finished(rules: RuleConfig) -> Zpy {
    make_state(MakeStateArgs {
        rules,
        hands: &["", "", "", ""],
        kitty: KITTY,
        phase: Phase::Finish,
        ..Default::default()
    })
}

fn end_round(z: &mut Zpy) {
    let (kitty, reneges) = z.check_end_round(2).unwrap();
    z.apply_finish(kitty, reneges).unwrap();
}

#[test]
fn shutout_promotes_host_team_three_ranks() {
    let mut z = finished(RuleConfig::default());
    end_round(&mut z);
    assert_eq!(z.phase, Phase::Wait);

    let result = z.result.clone().unwrap();
    assert_eq!(result.attackers_points, 0);
    assert!(!result.attackers_win);
    assert_eq!(result.delta, 3);
    assert_eq!(result.rank_changes.len(), 2);
    assert_eq!(result.rank_changes[&1], RankOutcome::Rank(Rank::Five));
    assert_eq!(z.ranks[&3].rank, Rank::Five);
    assert_eq!(z.ranks[&2].rank, Rank::Two);
    assert_eq!(result.next_host, 3);

    z.check_next_round(4).unwrap();
    z.apply_next_round().unwrap();
    assert_eq!(z.phase, Phase::Draw);
    assert_eq!(z.host, Some(3));
    assert_eq!(z.round, 2);
    assert_eq!(z.round_rank(), Rank::Five);
    assert_eq!(z.tr, TrumpMeta::undetermined(Rank::Five));
    assert_eq!(z.deck.size(), 108);
    assert_eq!(z.drawer(), Some(3));
}

#[test]
fn attackers_taking_the_last_trick_multiply_the_kitty() {
    let mut z = finished(RuleConfig::default());
    let tr = z.tr;
    z.last_trick = Some(Trick::new(2, flight(&["9S 9S"], tr)));
    end_round(&mut z);

    let result = z.result.clone().unwrap();
    assert_eq!(result.kitty_points, 20);
    assert_eq!(result.kitty_multiplier, 4);
    assert_eq!(result.attackers_points, 80);
    assert!(result.attackers_win);
    assert_eq!(result.delta, 0);
    assert!(result.rank_changes.is_empty());
    assert_eq!(result.next_host, 2);
}

#[test]
fn host_team_taking_the_last_trick_voids_the_kitty() {
    let mut z = finished(RuleConfig::default());
    let tr = z.tr;
    z.last_trick = Some(Trick::new(3, flight(&["9S 9S"], tr)));
    z.points.insert(2, 45);
    end_round(&mut z);

    let result = z.result.clone().unwrap();
    assert_eq!(result.kitty_multiplier, 0);
    assert_eq!(result.attackers_points, 45);
    assert_eq!((result.attackers_win, result.delta), (false, 1));
}

#[test]
fn accused_reneges_move_points() {
    let rules = RuleConfig {
        renege: RenegeRule::Accuse,
        ..RuleConfig::default()
    };
    let mut z = finished(rules);
    z.points.insert(2, 50);
    z.reneges.push(Renege {
        player: 2,
        trick_no: 0,
        violation: FollowViolation::SuitNotFollowed { suit: Suit::Spades },
    });
    end_round(&mut z);
    assert_eq!(z.result.as_ref().unwrap().attackers_points, 30);
    assert_eq!(z.reneges.len(), 1);
}

#[test]
fn host_once_blocks_breakpoints_not_yet_hosted() {
    let mut z = finished(RuleConfig::default());
    z.tr = trump(Suit::Hearts, Rank::Five);
    for p in [1, 3] {
        z.ranks.get_mut(&p).unwrap().rank = Rank::Five;
    }
    end_round(&mut z);
    assert_eq!(z.ranks[&1].rank, Rank::Eight);
    assert!(z.ranks[&1].hosted.contains(&Rank::Five));
    assert_eq!(z.ranks[&3].rank, Rank::Five);
}

#[test]
fn ranking_past_the_ace_ends_the_game() {
    let mut z = finished(RuleConfig::default());
    z.ranks.get_mut(&1).unwrap().rank = Rank::Ace;
    end_round(&mut z);
    assert!(z.ranks[&1].won);
    assert_eq!(z.game_winners(), vec![1]);
    z.apply_next_round().unwrap();
    assert_eq!(z.phase, Phase::GameOver);
}

#[test]
fn end_round_reveals_the_kitty() {
    let z = finished(RuleConfig::default());
    let (kitty, reneges) = z.check_end_round(4).unwrap();
    let mut expected = bases(KITTY);
    let mut got = kitty;
    expected.sort();
    got.sort();
    assert_eq!(got, expected);
    assert!(reneges.is_empty());
}
