use thiserror::Error;

/// Failure to read engine configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not one of {allowed}")]
    UnknownVariant {
        var: &'static str,
        value: String,
        allowed: &'static str,
    },
    #[error("{var}={value:?} is not a u64 seed")]
    InvalidSeed { var: &'static str, value: String },
}
