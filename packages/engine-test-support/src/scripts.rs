//! Builders for wire-format message scripts.
//!
//! Values are plain JSON so the helpers stay independent of the engine's
//! types; the tests deserialize them into the real messages.

use serde_json::{json, Value};

/// `{"verb":"req:hello","nick":...}` sent on connection `from`.
pub fn hello(from: u32, nick: &str) -> Value {
    json!({ "from": from, "msg": { "verb": "req:hello", "nick": nick } })
}

/// An intent of `kind` from `player`, with extra fields merged in.
pub fn intent(kind: &str, player: u32, extra: Value) -> Value {
    let mut intent = json!({ "kind": kind, "player": player });
    if let (Some(obj), Value::Object(more)) = (intent.as_object_mut(), extra) {
        obj.extend(more);
    }
    intent
}

/// `{"verb":"req:update",...}` carrying `intent`.
pub fn update(from: u32, tx: u64, intent: Value) -> Value {
    json!({ "from": from, "msg": { "verb": "req:update", "tx": tx, "intent": intent } })
}

/// Hello plus `add_player` for each of `1..=n`, with unique nicknames.
pub fn seated_lobby(n: u32) -> Vec<Value> {
    (1..=n)
        .flat_map(|p| {
            [
                hello(p, &crate::unique_nick("p")),
                update(p, u64::from(p), intent("add_player", p, Value::Null)),
            ]
        })
        .collect()
}

/// A whole script document.
pub fn script(seed: u64, steps: Vec<Value>) -> Value {
    json!({ "config": { "seed": seed }, "steps": steps })
}
