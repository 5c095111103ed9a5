//! Trick play: leads, fly contests, follows, renege policies, trick winners.

use super::cards_types::{Rank, Suit};
use super::combos::{FlightSpec, Play, TractorSpec};
use super::hand::FollowViolation;
use super::rules::{RenegeRule, RuleConfig};
use super::state::{Phase, Zpy};
use super::test_state_helpers::{
    bases, flight, flight_play, flight_spec, hand, make_state, toss, trump, MakeStateArgs,
};
use crate::errors::domain::ValidationKind;

const FLY_HANDS: [&str; 4] = [
    "QS QS AS 3C 4C",
    "KS KS 5C 6C 7C",
    "9S 8S 5D 6D 7D",
    "TS JS 5H 6H 7H",
];

fn fly_table(rules: RuleConfig) -> Zpy {
    make_state(MakeStateArgs {
        rules,
        hands: &FLY_HANDS,
        ..Default::default()
    })
}

/// Player 1 leads a pair of queens with the ace of spades.
fn fly_led(rules: RuleConfig) -> Zpy {
    let mut z = fly_table(rules);
    let tr = z.tr;
    let lead = z
        .check_lead_play(1, &flight_spec(&["QS QS", "AS"], tr))
        .unwrap();
    z.apply_lead_play(1, lead).unwrap();
    z
}

/// The fly contested down to the pair of queens.
fn pair_led(rules: RuleConfig) -> Zpy {
    let mut z = fly_led(rules);
    let rejection = z.check_contest_fly(2, &bases("KS KS")).unwrap();
    z.apply_reject_fly(rejection.tractor).unwrap();
    z
}

fn kind(err: crate::errors::domain::DomainError) -> ValidationKind {
    err.kind().cloned().expect("validation error")
}

#[test]
fn multi_tractor_lead_opens_a_contest_window() {
    let z = fly_led(RuleConfig::default());
    assert_eq!(z.phase, Phase::Fly);
    assert_eq!(z.current, None);
    assert_eq!(hand(&z, 1).size(), 2);
    assert!(z.trick.as_ref().unwrap().lead.is_fly());
}

#[test]
fn contest_demotes_the_fly_to_the_beaten_tuple() {
    let z = pair_led(RuleConfig::default());
    let tr = z.tr;
    let trick = z.trick.as_ref().unwrap();
    assert_eq!(trick.lead, flight(&["QS QS"], tr));
    assert!(!trick.lead.is_fly());
    assert_eq!(z.phase, Phase::Follow);
    assert_eq!(z.current, Some(2));
    // the ace goes back to the leader; the contester keeps the revealed pair
    assert_eq!(hand(&z, 1).size(), 3);
    assert!(hand(&z, 1).contains_cards(&bases("AS")));
    assert_eq!(hand(&z, 2).size(), 5);
}

#[test]
fn contests_need_a_beating_tractor_in_the_led_suit() {
    let z = fly_led(RuleConfig::default());
    assert_eq!(
        kind(z.check_contest_fly(4, &bases("TS")).unwrap_err()),
        ValidationKind::ContestFailed
    );
    assert_eq!(
        kind(z.check_contest_fly(3, &bases("8S 9S")).unwrap_err()),
        ValidationKind::ContestFailed
    );
    assert_eq!(
        kind(z.check_contest_fly(4, &bases("5H 6H")).unwrap_err()),
        ValidationKind::ContestFailed
    );
    assert_eq!(
        kind(z.check_contest_fly(3, &bases("KS KS")).unwrap_err()),
        ValidationKind::CardsNotHeld
    );
    assert_eq!(
        kind(z.check_contest_fly(1, &bases("QS QS")).unwrap_err()),
        ValidationKind::OutOfTurn
    );
}

#[test]
fn everyone_passing_keeps_the_fly() {
    let mut z = fly_led(RuleConfig::default());
    for p in [2, 3] {
        z.check_pass_contest(p).unwrap();
        z.apply_pass_contest(p).unwrap();
        assert_eq!(z.phase, Phase::Fly);
    }
    assert_eq!(
        kind(z.check_pass_contest(2).unwrap_err()),
        ValidationKind::AlreadyActed
    );
    z.apply_pass_contest(4).unwrap();
    assert_eq!(z.phase, Phase::Follow);
    assert_eq!(z.current, Some(2));
    assert!(z.trick.as_ref().unwrap().lead.is_fly());
}

#[test]
fn highest_matching_structure_takes_the_trick() {
    let mut z = pair_led(RuleConfig::default());
    let tr = z.tr;

    let (play, renege) = z.check_follow_lead(2, &flight_play(&["KS KS"], tr)).unwrap();
    assert_eq!(renege, None);
    z.apply_follow_lead(2, play, None).unwrap();
    assert_eq!(z.current, Some(3));

    let (play, _) = z.check_follow_lead(3, &toss("9S 8S")).unwrap();
    assert!(matches!(play, Play::Toss(_)));
    z.apply_follow_lead(3, play, None).unwrap();

    let (play, _) = z.check_follow_lead(4, &toss("TS JS")).unwrap();
    z.apply_follow_lead(4, play, None).unwrap();

    assert_eq!(z.phase, Phase::Lead);
    assert_eq!(z.leader, Some(2));
    assert_eq!(z.trick_no, 1);
    assert_eq!(z.points[&2], 30);
    assert_eq!(z.last_trick.as_ref().unwrap().winner, 2);
    assert!(z.trick.is_none());
}

#[test]
fn toss_shaped_like_the_lead_is_read_as_a_flight() {
    let z = pair_led(RuleConfig::default());
    let (play, _) = z.check_follow_lead(2, &toss("KS KS")).unwrap();
    assert_eq!(play, Play::Flight(flight(&["KS KS"], z.tr)));
}

#[test]
fn forbidden_renege_is_rejected() {
    let z = pair_led(RuleConfig::default());
    assert_eq!(
        kind(z.check_follow_lead(2, &toss("KS 5C")).unwrap_err()),
        ValidationKind::MustFollow
    );
    assert_eq!(
        kind(z.check_follow_lead(2, &toss("KS")).unwrap_err()),
        ValidationKind::SizeMismatch
    );
    assert_eq!(
        kind(z.check_follow_lead(3, &toss("9S 8S")).unwrap_err()),
        ValidationKind::OutOfTurn
    );
}

#[test]
fn accused_renege_stands_and_is_recorded() {
    let rules = RuleConfig {
        renege: RenegeRule::Accuse,
        ..RuleConfig::default()
    };
    let mut z = pair_led(rules);
    let (play, renege) = z.check_follow_lead(2, &toss("KS 5C")).unwrap();
    assert_eq!(
        renege,
        Some(FollowViolation::SuitNotFollowed { suit: Suit::Spades })
    );
    z.apply_follow_lead(2, play, renege).unwrap();
    assert_eq!(z.reneges.len(), 1);
    assert_eq!(z.reneges[0].player, 2);
    assert_eq!(z.reneges[0].trick_no, 0);

    // size is never negotiable
    assert_eq!(
        kind(z.check_follow_lead(3, &toss("9S")).unwrap_err()),
        ValidationKind::SizeMismatch
    );
}

#[test]
fn trump_ruffs_a_void_suit_and_last_trick_finishes() {
    let mut z = make_state(MakeStateArgs {
        hands: &["AS 3C", "5H 6C", "9S 4D", "TS 5D"],
        kitty: "2C 3D 4S 6S 7S 8C 9C JC",
        ..Default::default()
    });
    let tr = z.tr;
    assert_eq!(tr, trump(Suit::Hearts, Rank::Two));

    let lead = z.check_lead_play(1, &flight_spec(&["AS"], tr)).unwrap();
    z.apply_lead_play(1, lead).unwrap();
    assert_eq!(z.phase, Phase::Follow);
    for (p, cards) in [(2, "5H"), (3, "9S"), (4, "TS")] {
        let (play, renege) = z.check_follow_lead(p, &toss(cards)).unwrap();
        assert_eq!(renege, None);
        z.apply_follow_lead(p, play, renege).unwrap();
    }
    assert_eq!(z.leader, Some(2));
    assert_eq!(z.points[&2], 15);

    let lead = z.check_lead_play(2, &flight_spec(&["6C"], tr)).unwrap();
    z.apply_lead_play(2, lead).unwrap();
    for (p, cards) in [(3, "4D"), (4, "5D"), (1, "3C")] {
        let (play, _) = z.check_follow_lead(p, &toss(cards)).unwrap();
        z.apply_follow_lead(p, play, None).unwrap();
    }
    assert_eq!(z.phase, Phase::Finish);
    assert_eq!(z.leader, None);
    assert_eq!(z.trick_no, 2);
    assert_eq!(z.points[&2], 20);
    assert!(z.hands.values().all(|h| h.size() == 0));
}

#[test]
fn only_the_leader_leads_held_cards() {
    let z = fly_table(RuleConfig::default());
    let tr = z.tr;
    assert_eq!(
        kind(z.check_lead_play(2, &flight_spec(&["KS KS"], tr)).unwrap_err()),
        ValidationKind::OutOfTurn
    );
    assert_eq!(
        kind(z.check_lead_play(1, &flight_spec(&["KS"], tr)).unwrap_err()),
        ValidationKind::CardsNotHeld
    );
    assert_eq!(
        kind(z.check_follow_lead(2, &toss("KS")).unwrap_err()),
        ValidationKind::PhaseMismatch
    );
}

#[test]
fn tuples_wider_than_the_deck_count_are_refused() {
    let z = fly_table(RuleConfig::default());
    let tr = z.tr;
    let triple = FlightSpec {
        tractors: vec![TractorSpec {
            len: 1,
            arity: 3,
            card: bases("QS")[0],
            osnt_suit: None,
        }],
    };
    assert_eq!(
        kind(z.check_lead_play(1, &triple).unwrap_err()),
        ValidationKind::InvalidTractor
    );

    let huge = FlightSpec {
        tractors: vec![
            TractorSpec {
                len: 2,
                arity: usize::MAX / 2 + 1,
                card: bases("3S")[0],
                osnt_suit: None,
            },
            TractorSpec::from(flight(&["9S"], tr).leading()),
        ],
    };
    assert_eq!(
        kind(z.check_lead_play(1, &huge).unwrap_err()),
        ValidationKind::InvalidTractor
    );
}
