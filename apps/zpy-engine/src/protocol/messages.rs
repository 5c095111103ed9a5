//! Envelope messages between clients and the server.

use serde::{Deserialize, Serialize};

use super::effect::Effect;
use super::intent::Intent;
use crate::domain::state::{ClientState, PlayerId};
use crate::errors::domain::{DomainError, ErrorClass, ValidationKind};

/// Client-chosen transaction id echoed back on the matching update or reject.
pub type TxId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: PlayerId,
    pub nick: String,
}

/// Membership changes. They touch the connection roster, never the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verb")]
pub enum ProtocolEvent {
    #[serde(rename = "user:join")]
    Join { who: User },
    #[serde(rename = "user:part")]
    Part { id: PlayerId },
}

/// A confirmed change delivered to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "eff", rename_all = "snake_case")]
pub enum Update<E = Effect> {
    Protocol(ProtocolEvent),
    Engine(E),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectReason {
    pub class: ErrorClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValidationKind>,
    pub detail: String,
}

impl From<&DomainError> for RejectReason {
    fn from(err: &DomainError) -> Self {
        Self {
            class: err.class(),
            kind: err.kind().cloned(),
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verb")]
pub enum ClientMsg {
    #[serde(rename = "req:hello")]
    Hello { nick: String },
    #[serde(rename = "req:bye")]
    Bye,
    #[serde(rename = "req:reset")]
    Reset,
    #[serde(rename = "req:update")]
    Update { tx: TxId, intent: Intent },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum ServerMsg {
    Hello {
        you: User,
    },
    Bye,
    Reset {
        state: Box<ClientState>,
        who: Vec<User>,
    },
    /// `tx` is set only on the update sent back to the intent's author.
    Update {
        tx: Option<TxId>,
        effect: Update,
    },
    Reject {
        tx: TxId,
        reason: RejectReason,
    },
}
