//! End-to-end rounds through the pure domain operations.

use super::cards_types::{CardBase, Rank, Suit};
use super::dealing::build_deck;
use super::kitty::ReadyOutcome;
use super::rules::RuleConfig;
use super::state::{Concealed, Phase, PlayerId, Zpy};
use super::test_state_helpers::{draw_all, hand, started, trump};
use crate::errors::domain::ValidationKind;

fn two_of(suit: Suit) -> CardBase {
    CardBase::new(suit, Rank::Two)
}

fn draw_one(z: &mut Zpy) -> PlayerId {
    let p = z.drawer().unwrap();
    let card = z.check_draw_card(p).unwrap();
    z.apply_add_to_hand(p, card).unwrap();
    p
}

/// Stack the deck so player 1 draws a 2♠ first and player 2 draws two 2♥
/// with their first two draws.
fn stacked() -> Zpy {
    let mut z = started(RuleConfig::default(), 21);
    let mut deck = build_deck(2);
    for card in [two_of(Suit::Spades), two_of(Suit::Hearts), two_of(Suit::Hearts)] {
        let i = deck.iter().position(|&c| c == card).unwrap();
        deck.remove(i);
    }
    let fillers: Vec<CardBase> = (0..3).map(|_| deck.pop().unwrap()).collect();
    deck.extend([
        two_of(Suit::Hearts),
        fillers[2],
        fillers[1],
        fillers[0],
        two_of(Suit::Hearts),
        two_of(Suit::Spades),
    ]);
    z.deck = Concealed::Known(deck);
    z
}

/// Player 2 bids a pair of 2♥, the draw completes and everyone is ready.
fn hosted() -> Zpy {
    let mut z = stacked();
    for _ in 0..6 {
        draw_one(&mut z);
    }
    z.apply_secure_bid(2, two_of(Suit::Hearts), 2).unwrap();
    draw_all(&mut z);
    for p in [1, 3, 4] {
        assert_eq!(z.check_ready(p).unwrap(), ReadyOutcome::Waiting);
        z.apply_ready(p).unwrap();
    }
    assert_eq!(
        z.check_ready(2).unwrap(),
        ReadyOutcome::InstallHost { host: 2 }
    );
    let kitty = z.redact_kitty_for(2, 2);
    z.apply_install_host(2, kitty).unwrap();
    z
}

#[test]
fn pair_bid_outranks_single_and_fixes_trump() {
    let mut z = stacked();
    assert_eq!(draw_one(&mut z), 1);
    z.check_bid_trump(1, two_of(Suit::Spades), 1).unwrap();
    z.apply_secure_bid(1, two_of(Suit::Spades), 1).unwrap();

    for _ in 0..5 {
        draw_one(&mut z);
    }
    z.check_bid_trump(2, two_of(Suit::Hearts), 2).unwrap();
    z.apply_secure_bid(2, two_of(Suit::Hearts), 2).unwrap();
    assert_eq!(z.standing_bid().unwrap().player, 2);
    assert_eq!(
        z.check_bid_trump(1, two_of(Suit::Spades), 1)
            .unwrap_err()
            .kind(),
        Some(&ValidationKind::BidTooWeak)
    );

    draw_all(&mut z);
    assert_eq!(z.phase, Phase::Prepare);
    assert_eq!(z.kitty.size(), 8);
    let before: Vec<(PlayerId, Vec<CardBase>)> = z
        .order
        .iter()
        .map(|&p| (p, hand(&z, p).bases()))
        .collect();
    assert!(before.iter().all(|(_, cards)| cards.len() == 25));

    for p in [1, 3, 4] {
        z.apply_ready(p).unwrap();
    }
    let kitty = z.redact_kitty_for(2, 2);
    z.apply_install_host(2, kitty).unwrap();

    let tr = trump(Suit::Hearts, Rank::Two);
    assert_eq!(z.tr, tr);
    assert_eq!(z.host, Some(2));
    assert_eq!(z.phase, Phase::Kitty);
    for (p, cards) in &before {
        let pile = hand(&z, *p);
        assert_eq!(pile.tr(), tr);
        assert!(pile.is_consistent());
        if *p == 2 {
            assert_eq!(pile.size(), 33);
        } else {
            assert_eq!(pile.size(), 25);
            let mut now = pile.bases();
            let mut was = cards.clone();
            now.sort();
            was.sort();
            assert_eq!(now, was);
        }
    }
    // hearts twos are now the top natural trump
    let card = hand(&z, 2).card(two_of(Suit::Hearts));
    assert_eq!((card.v_suit, card.v_rank), (Suit::Trump, Rank::OnSuitNatural));
}

#[test]
fn host_buries_kitty_sized_set() {
    let mut z = hosted();
    assert_eq!(z.kitty.size(), 0);

    let held = hand(&z, 2).size();
    let bury: Vec<CardBase> = hand(&z, 2).bases().into_iter().take(8).collect();

    assert_eq!(
        z.check_replace_kitty(2, &bury[..7]).unwrap_err().kind(),
        Some(&ValidationKind::SizeMismatch)
    );
    assert_eq!(
        z.check_replace_kitty(1, &bury).unwrap_err().kind(),
        Some(&ValidationKind::NotHost)
    );

    let before = hand(&z, 2).clone();
    z.check_replace_kitty(2, &bury).unwrap();
    z.apply_replace_kitty(2, &bury).unwrap();

    assert_eq!(hand(&z, 2).size(), held - 8);
    assert_eq!(hand(&z, 2).size(), 25);
    let kitty = z.kitty.known().unwrap();
    assert_eq!(kitty.size(), 8);
    assert!(kitty.contains_cards(&bury));
    let mut restored = hand(&z, 2).clone();
    restored.insert_all(bury.iter().copied());
    assert_eq!(restored, before);

    assert_eq!(z.phase, Phase::Lead);
    assert_eq!(z.leader, Some(2));
    assert_eq!(z.host_team.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
}
