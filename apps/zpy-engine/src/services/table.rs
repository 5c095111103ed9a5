//! One task per game owns its state; intents are processed one at a time.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::domain::state::PlayerId;
use crate::services::engine::{Engine, ZpyEngine};

pub type GameId = u64;

const MAILBOX_CAPACITY: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError<E> {
    #[error("intent rejected: {0}")]
    Rejected(E),
    #[error("table {0} is closed")]
    Closed(GameId),
}

type Effects<E> = BTreeMap<PlayerId, <E as Engine>::Effect>;

enum Command<E: Engine> {
    Intent {
        intent: E::Intent,
        who: PlayerId,
        clients: Vec<PlayerId>,
        reply: oneshot::Sender<Result<Effects<E>, E::Error>>,
    },
    Snapshot {
        who: PlayerId,
        reply: oneshot::Sender<E::ClientState>,
    },
}

/// Owner of one game's state.
pub struct Table<E: Engine> {
    game_id: GameId,
    engine: E,
    state: E::State,
    mailbox: mpsc::Receiver<Command<E>>,
}

/// Cloneable sender side of a table.
pub struct TableHandle<E: Engine> {
    game_id: GameId,
    sender: mpsc::Sender<Command<E>>,
}

impl<E: Engine> Clone for TableHandle<E> {
    fn clone(&self) -> Self {
        Self {
            game_id: self.game_id,
            sender: self.sender.clone(),
        }
    }
}

impl<E> Table<E>
where
    E: Engine + Send + 'static,
    E::Intent: Send,
    E::State: Send,
    E::ClientState: Send,
    E::Effect: Send,
    E::Error: Send + std::fmt::Display,
{
    /// Start the table task. It stops once every handle is dropped.
    pub fn spawn(game_id: GameId, engine: E, state: E::State) -> TableHandle<E> {
        let (sender, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        let table = Table {
            game_id,
            engine,
            state,
            mailbox,
        };
        tokio::spawn(table.run());
        TableHandle { game_id, sender }
    }

    async fn run(mut self) {
        debug!(game_id = self.game_id, "Table started");
        while let Some(command) = self.mailbox.recv().await {
            match command {
                Command::Intent {
                    intent,
                    who,
                    clients,
                    reply,
                } => {
                    let result = self.engine.larp(&mut self.state, &intent, who, &clients);
                    if let Err(err) = &result {
                        debug!(game_id = self.game_id, player = who, error = %err, "Intent rejected");
                    }
                    // the caller may have gone away; the state change stands
                    let _ = reply.send(result);
                }
                Command::Snapshot { who, reply } => {
                    let _ = reply.send(self.engine.redact(&self.state, who));
                }
            }
        }
        debug!(game_id = self.game_id, "Table stopped");
    }
}

impl<E: Engine> TableHandle<E> {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Submit an intent and wait for every client's effect.
    pub async fn submit(
        &self,
        intent: E::Intent,
        who: PlayerId,
        clients: Vec<PlayerId>,
    ) -> Result<Effects<E>, TableError<E::Error>> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Command::Intent {
                intent,
                who,
                clients,
                reply,
            })
            .await
            .map_err(|_| TableError::Closed(self.game_id))?;
        response
            .await
            .map_err(|_| TableError::Closed(self.game_id))?
            .map_err(TableError::Rejected)
    }

    /// Current state as `who` may see it.
    pub async fn snapshot(&self, who: PlayerId) -> Result<E::ClientState, TableError<E::Error>> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Command::Snapshot { who, reply })
            .await
            .map_err(|_| TableError::Closed(self.game_id))?;
        response.await.map_err(|_| TableError::Closed(self.game_id))
    }
}

/// Live tables by game id.
#[derive(Default)]
pub struct TableRegistry {
    tables: DashMap<GameId, TableHandle<ZpyEngine>>,
}

impl TableRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a game and start its table; an existing table is returned as is.
    pub fn open(&self, game_id: GameId, config: GameConfig) -> TableHandle<ZpyEngine> {
        self.tables
            .entry(game_id)
            .or_insert_with(|| {
                info!(game_id, "Opening table");
                let engine = ZpyEngine;
                let state = engine.init(config);
                Table::spawn(game_id, engine, state)
            })
            .clone()
    }

    pub fn get(&self, game_id: GameId) -> Option<TableHandle<ZpyEngine>> {
        self.tables.get(&game_id).map(|h| h.value().clone())
    }

    /// Forget a table; it stops once outstanding handles are dropped.
    pub fn close(&self, game_id: GameId) -> bool {
        let removed = self.tables.remove(&game_id).is_some();
        if removed {
            info!(game_id, "Closing table");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
