//! Client messages built as raw JSON decode into engine intents.

mod common;

use common::intent_of;
use engine_test_support::scripts::{hello, intent, script, seated_lobby, update};
use serde_json::json;
use zpy_engine::{ClientMsg, GameConfig, Intent, RuleConfig};

#[test]
fn lobby_script_decodes() {
    let steps = seated_lobby(3);
    let intents: Vec<_> = steps
        .iter()
        .filter(|s| s["msg"]["verb"] == "req:update")
        .map(intent_of)
        .collect();
    assert_eq!(
        intents,
        vec![
            (1, Intent::AddPlayer { player: 1 }),
            (2, Intent::AddPlayer { player: 2 }),
            (3, Intent::AddPlayer { player: 3 }),
        ]
    );
}

#[test]
fn card_fields_use_short_names() {
    let step = update(
        2,
        5,
        intent("bid_trump", 2, json!({ "card": "2H", "n": 2 })),
    );
    let (from, intent) = intent_of(&step);
    assert_eq!(from, 2);
    let Intent::BidTrump { card, n, .. } = intent else {
        panic!("decoded {intent:?}");
    };
    assert_eq!((card.to_string(), n), ("2H".to_string(), 2));
}

#[test]
fn hello_carries_the_nick() {
    let step = hello(4, "dee");
    let msg: ClientMsg = serde_json::from_value(step["msg"].clone()).unwrap();
    assert_eq!(msg, ClientMsg::Hello { nick: "dee".into() });
}

#[test]
fn script_config_defaults_the_rules() {
    let doc = script(77, Vec::new());
    let config: GameConfig = serde_json::from_value(doc["config"].clone()).unwrap();
    assert_eq!(config.seed, Some(77));
    assert_eq!(config.rules, RuleConfig::default());
}
