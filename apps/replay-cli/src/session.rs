//! Replays a recorded message stream against a live table.
//!
//! Each script line is a client message from one connection. The session
//! answers it the way a game server would: the author gets its own reply,
//! everyone else connected gets the broadcast.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use zpy_engine::protocol::{RejectReason, User};
use zpy_engine::{
    ClientMsg, DomainError, GameConfig, PlayerId, ProtocolEvent, ServerMsg, TableError,
    TableHandle, TableRegistry, Update, ZpyEngine,
};

const GAME_ID: u64 = 1;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("connection {0} sent a message before saying hello")]
    NotConnected(PlayerId),
    #[error("table closed mid-replay")]
    Closed,
    #[error("step {step} rejected: {reason}")]
    Rejected { step: usize, reason: String },
}

/// A recorded game: its configuration and the client messages in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: GameConfig,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Connection the message arrives on.
    pub from: PlayerId,
    pub msg: ClientMsg,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outgoing {
    pub to: PlayerId,
    pub msg: ServerMsg,
}

pub struct Session {
    table: TableHandle<ZpyEngine>,
    users: BTreeMap<PlayerId, User>,
    keep_going: bool,
}

impl Session {
    pub fn open(registry: &TableRegistry, config: GameConfig, keep_going: bool) -> Self {
        Self {
            table: registry.open(GAME_ID, config),
            users: BTreeMap::new(),
            keep_going,
        }
    }

    fn clients(&self) -> Vec<PlayerId> {
        self.users.keys().copied().collect()
    }

    fn broadcast(&self, except: PlayerId, event: ProtocolEvent) -> Vec<Outgoing> {
        self.users
            .keys()
            .filter(|&&c| c != except)
            .map(|&c| Outgoing {
                to: c,
                msg: ServerMsg::Update {
                    tx: None,
                    effect: Update::Protocol(event.clone()),
                },
            })
            .collect()
    }

    fn require_connected(&self, from: PlayerId) -> Result<(), ReplayError> {
        if self.users.contains_key(&from) {
            Ok(())
        } else {
            Err(ReplayError::NotConnected(from))
        }
    }

    /// Handle one step, returning what the server sends in reply.
    pub async fn handle(&mut self, index: usize, step: &Step) -> Result<Vec<Outgoing>, ReplayError> {
        let from = step.from;
        match &step.msg {
            ClientMsg::Hello { nick } => {
                let you = User {
                    id: from,
                    nick: nick.clone(),
                };
                let mut out = self.broadcast(from, ProtocolEvent::Join { who: you.clone() });
                self.users.insert(from, you.clone());
                info!(player = from, nick = %nick, "Connected");
                out.push(Outgoing {
                    to: from,
                    msg: ServerMsg::Hello { you },
                });
                Ok(out)
            }
            ClientMsg::Bye => {
                self.require_connected(from)?;
                self.users.remove(&from);
                info!(player = from, "Disconnected");
                let mut out = self.broadcast(from, ProtocolEvent::Part { id: from });
                out.push(Outgoing {
                    to: from,
                    msg: ServerMsg::Bye,
                });
                Ok(out)
            }
            ClientMsg::Reset => {
                self.require_connected(from)?;
                let state = self.table.snapshot(from).await.map_err(|_| ReplayError::Closed)?;
                Ok(vec![Outgoing {
                    to: from,
                    msg: ServerMsg::Reset {
                        state: Box::new(state),
                        who: self.users.values().cloned().collect(),
                    },
                }])
            }
            ClientMsg::Update { tx, intent } => {
                self.require_connected(from)?;
                debug!(step = index, player = from, intent = intent.name(), "Submitting");
                match self.table.submit(intent.clone(), from, self.clients()).await {
                    Ok(effects) => Ok(effects
                        .into_iter()
                        .map(|(c, effect)| Outgoing {
                            to: c,
                            msg: ServerMsg::Update {
                                tx: (c == from).then_some(*tx),
                                effect: Update::Engine(effect),
                            },
                        })
                        .collect()),
                    Err(TableError::Rejected(err)) => self.reject(index, from, *tx, &err),
                    Err(TableError::Closed(_)) => Err(ReplayError::Closed),
                }
            }
        }
    }

    fn reject(
        &self,
        index: usize,
        from: PlayerId,
        tx: u64,
        err: &DomainError,
    ) -> Result<Vec<Outgoing>, ReplayError> {
        warn!(step = index, player = from, error = %err, "Step rejected");
        if !self.keep_going {
            return Err(ReplayError::Rejected {
                step: index,
                reason: err.to_string(),
            });
        }
        Ok(vec![Outgoing {
            to: from,
            msg: ServerMsg::Reject {
                tx,
                reason: RejectReason::from(err),
            },
        }])
    }

    /// Final state as `who` sees it.
    pub async fn view(&self, who: PlayerId) -> Result<zpy_engine::ClientState, ReplayError> {
        self.table.snapshot(who).await.map_err(|_| ReplayError::Closed)
    }
}

/// Run a whole script, collecting every outgoing message.
pub async fn replay(
    script: &Script,
    keep_going: bool,
) -> Result<(Session, Vec<Outgoing>), ReplayError> {
    let registry = TableRegistry::new();
    let mut session = Session::open(&registry, script.config, keep_going);
    let mut out = Vec::new();
    for (i, step) in script.steps.iter().enumerate() {
        out.extend(session.handle(i, step).await?);
    }
    Ok((session, out))
}
