//! Builders for hand-crafted game states used by the domain tests.

use std::collections::BTreeMap;

use super::cards_parsing::parse_card_list;
use super::cards_types::{CardBase, Rank, Suit, TrumpMeta};
use super::combos::{Flight, FlightSpec, PlaySpec, Tractor};
use super::pile::CardPile;
use super::rules::RuleConfig;
use super::state::{Concealed, Phase, PlayerId, PlayerRank, Zpy};

pub fn trump(suit: Suit, rank: Rank) -> TrumpMeta {
    TrumpMeta::new(suit, rank)
}

pub fn bases(tokens: &str) -> Vec<CardBase> {
    parse_card_list(tokens).expect("test cards parse")
}

pub fn pile(tokens: &str, tr: TrumpMeta) -> CardPile {
    CardPile::from_cards(bases(tokens), tr)
}

/// One tractor per group, e.g. `["QS QS", "AS"]`.
pub fn flight(groups: &[&str], tr: TrumpMeta) -> Flight {
    let tractors = groups
        .iter()
        .map(|g| {
            let cards: Vec<_> = bases(g).into_iter().map(|c| c.virtualize(tr)).collect();
            Tractor::recognize(&cards, tr).expect("test group is a tractor")
        })
        .collect();
    Flight::new(tractors, tr).expect("test flight is valid")
}

pub fn flight_spec(groups: &[&str], tr: TrumpMeta) -> FlightSpec {
    FlightSpec::from(&flight(groups, tr))
}

pub fn flight_play(groups: &[&str], tr: TrumpMeta) -> PlaySpec {
    PlaySpec::Flight(flight_spec(groups, tr))
}

pub fn toss(tokens: &str) -> PlaySpec {
    PlaySpec::Toss {
        cards: bases(tokens),
    }
}

pub struct MakeStateArgs<'a> {
    pub rules: RuleConfig,
    pub tr: TrumpMeta,
    /// Hands for players 1..=n in seat order.
    pub hands: &'a [&'a str],
    pub kitty: &'a str,
    pub host: PlayerId,
    pub ndecks: usize,
    pub phase: Phase,
}

impl Default for MakeStateArgs<'_> {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            tr: TrumpMeta::new(Suit::Hearts, Rank::Two),
            hands: &[],
            kitty: "",
            host: 1,
            ndecks: 2,
            phase: Phase::Lead,
        }
    }
}

/// A mid-round server state with known hands; the host leads.
pub fn make_state(args: MakeStateArgs<'_>) -> Zpy {
    let mut z = Zpy::new(args.rules, Some(17));
    let players: Vec<PlayerId> = (1..=args.hands.len() as PlayerId).collect();
    z.players = players.clone();
    z.order = players.clone();
    z.owner = Some(1);
    z.ndecks = Some(args.ndecks);
    z.round = 1;
    z.tr = args.tr;
    z.ranks = players
        .iter()
        .map(|&p| (p, PlayerRank::default()))
        .collect();
    z.hands = players
        .iter()
        .zip(args.hands)
        .map(|(&p, tokens)| (p, Concealed::Known(pile(tokens, args.tr))))
        .collect::<BTreeMap<_, _>>();
    z.deck = Concealed::Known(Vec::new());
    z.kitty = Concealed::Known(pile(args.kitty, args.tr));
    z.host = Some(args.host);
    z.host_team.insert(args.host);
    if players.len() == 4 {
        if let Some(partner) = z.seat_offset(args.host, 2) {
            z.host_team.insert(partner);
        }
    }
    z.ready = players.iter().copied().collect();
    z.points = players.iter().map(|&p| (p, 0)).collect();
    z.leader = Some(args.host);
    z.phase = args.phase;
    z
}

/// Four players seated 1..=4 in a started, undrawn round.
pub fn started(rules: RuleConfig, seed: u64) -> Zpy {
    let mut z = Zpy::new(rules, Some(seed));
    for p in 1..=4 {
        z.apply_add_player(p);
    }
    z.apply_init_game(vec![1, 2, 3, 4]).expect("seating is a permutation");
    z
}

/// Draw until the deck holds only the kitty.
pub fn draw_all(z: &mut Zpy) {
    while z.phase == Phase::Draw {
        let p = z.drawer().expect("someone draws");
        let card = z.check_draw_card(p).expect("draw is legal");
        z.apply_add_to_hand(p, card).expect("draw applies");
    }
}

pub fn hand<'a>(z: &'a Zpy, p: PlayerId) -> &'a CardPile {
    z.hands[&p].known().expect("server hands are known")
}
