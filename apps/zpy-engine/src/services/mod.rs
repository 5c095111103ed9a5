//! Engine entry points: server-side `larp`, client-side `predict` and
//! `apply_client`, redaction, and the per-game table actor.

pub mod engine;
pub mod redaction;
pub mod table;
