#![allow(dead_code)]

use std::collections::BTreeMap;

use zpy_engine::{
    ClientMsg, ClientState, Effect, GameConfig, Intent, PlayerId, TableHandle, TableRegistry,
    ZpyEngine,
};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    engine_test_support::test_logging::init();
}

pub const SEATS: [PlayerId; 4] = [1, 2, 3, 4];

/// Parse a wire-format step into its connection and intent.
pub fn intent_of(step: &serde_json::Value) -> (PlayerId, Intent) {
    let from = step["from"].as_u64().expect("step has a sender") as PlayerId;
    let msg: ClientMsg = serde_json::from_value(step["msg"].clone()).expect("step is a message");
    let ClientMsg::Update { intent, .. } = msg else {
        panic!("step is not an update");
    };
    (from, intent)
}

/// A table with four seated players, fed through the wire format.
pub async fn seated_table(seed: u64) -> TableHandle<ZpyEngine> {
    let registry = TableRegistry::new();
    let table = registry.open(seed, GameConfig::default().with_seed(seed));
    for step in engine_test_support::scripts::seated_lobby(4) {
        if step["msg"]["verb"] == "req:update" {
            let (from, intent) = intent_of(&step);
            table.submit(intent, from, SEATS.to_vec()).await.unwrap();
        }
    }
    table
}

pub async fn submit(
    table: &TableHandle<ZpyEngine>,
    who: PlayerId,
    intent: Intent,
) -> BTreeMap<PlayerId, Effect> {
    table.submit(intent, who, SEATS.to_vec()).await.unwrap()
}

/// Start the game and draw every card the deck deals out.
pub async fn drawn_table(seed: u64) -> TableHandle<ZpyEngine> {
    let table = seated_table(seed).await;
    submit(&table, 1, Intent::StartGame { player: 1 }).await;
    loop {
        let view = table.snapshot(1).await.unwrap();
        let Some(p) = view.drawer() else { break };
        submit(&table, p, Intent::DrawCard { player: p }).await;
    }
    table
}

pub async fn views(table: &TableHandle<ZpyEngine>) -> BTreeMap<PlayerId, ClientState> {
    let mut out = BTreeMap::new();
    for p in SEATS {
        out.insert(p, table.snapshot(p).await.unwrap());
    }
    out
}
