//! Domain-level error type returned by every engine entry point.
//!
//! Errors are plain values: a rejected intent never mutates state and never
//! produces effects, so callers can surface the error and let the player retry.
//! Broken card-model invariants are defects and panic instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse error taxonomy exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Intent is not legal in the current phase.
    Phase,
    /// Actor is not the seat allowed to act.
    Identity,
    /// Actor does not hold the cards it claims.
    Insufficiency,
    /// A claimed combo fails structural validation.
    Shape,
    /// The configured rule variant forbids the action.
    Policy,
}

/// Specific validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ValidationKind {
    PhaseMismatch,
    GameNotStarted,
    OutOfTurn,
    NotAPlayer,
    NotHost,
    NotOwner,
    ActorMismatch,
    AlreadyActed,
    DuplicatePlayer,
    TooFewPlayers,
    CardsNotHeld,
    ParseCard,
    InvalidCard,
    InvalidTractor,
    InvalidFlight,
    InvalidPlay,
    SizeMismatch,
    MustFollow,
    ContestFailed,
    InvalidBid,
    BidTooWeak,
    InvalidDeckCount,
    InvalidFriendCall,
    RedealNotAllowed,
    Other(String),
}

impl ValidationKind {
    pub fn class(&self) -> ErrorClass {
        use ValidationKind as K;
        match self {
            K::PhaseMismatch | K::GameNotStarted | K::AlreadyActed => ErrorClass::Phase,
            K::OutOfTurn
            | K::NotAPlayer
            | K::NotHost
            | K::NotOwner
            | K::ActorMismatch
            | K::DuplicatePlayer => ErrorClass::Identity,
            K::CardsNotHeld => ErrorClass::Insufficiency,
            K::ParseCard
            | K::InvalidCard
            | K::InvalidTractor
            | K::InvalidFlight
            | K::InvalidPlay
            | K::SizeMismatch
            | K::InvalidBid
            | K::InvalidFriendCall => ErrorClass::Shape,
            K::MustFollow
            | K::ContestFailed
            | K::BidTooWeak
            | K::InvalidDeckCount
            | K::TooFewPlayers
            | K::RedealNotAllowed
            | K::Other(_) => ErrorClass::Policy,
        }
    }
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DomainError {
    /// Input validation or rule violation
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Misuse of the client/server protocol (e.g. an effect that cannot apply)
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }

    pub fn protocol(detail: impl Into<String>) -> Self {
        Self::Protocol(detail.into())
    }

    pub fn kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            DomainError::Protocol(_) => None,
        }
    }

    /// Error class surfaced to the player; protocol misuse counts as a phase error.
    pub fn class(&self) -> ErrorClass {
        match self {
            DomainError::Validation(kind, _) => kind.class(),
            DomainError::Protocol(_) => ErrorClass::Phase,
        }
    }
}
