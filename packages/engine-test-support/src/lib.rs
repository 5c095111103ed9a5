//! Shared helpers for the engine's integration tests and the replay tool's
//! tests: logging setup, unique test data, and JSON script building.

pub mod scripts;
pub mod test_logging;
pub mod unique_helpers;

pub use unique_helpers::unique_nick;
