//! Wire vocabulary: intents from players, effects from the server, and the
//! envelope messages that carry them.

pub mod effect;
pub mod intent;
pub mod messages;

pub use effect::Effect;
pub use intent::Intent;
pub use messages::{ClientMsg, ProtocolEvent, RejectReason, ServerMsg, TxId, Update, User};
