#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod protocol;
pub mod services;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::rules::{rules_from_env, seed_from_env};
pub use config::GameConfig;
pub use domain::state::{ClientState, Phase, PlayerId, Zpy};
pub use domain::RuleConfig;
pub use errors::{ConfigError, DomainError, ErrorClass, ValidationKind};
pub use protocol::{ClientMsg, Effect, Intent, ProtocolEvent, ServerMsg, Update};
pub use services::engine::{apply_client, init, larp, predict, Engine, ZpyEngine};
pub use services::redaction::redact;
pub use services::table::{GameId, Table, TableError, TableHandle, TableRegistry};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
