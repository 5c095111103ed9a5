pub mod config;
pub mod domain;

pub use config::ConfigError;
pub use domain::{DomainError, ErrorClass, ValidationKind};
