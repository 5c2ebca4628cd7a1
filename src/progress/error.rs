//! Domain errors raised by the progression engine
//!
//! Storage and I/O failures travel as `anyhow::Error`; these are the errors a
//! caller is expected to match on.

use super::models::GameId;

/// A score event that cannot be applied. Nothing is committed when this is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    #[error("unknown game id '{0}' (expected one of: {known})", known = GameId::known_ids())]
    UnknownGame(String),

    #[error("points delta must be a finite number, got {0}")]
    NonFinitePoints(f64),

    #[error("points delta must be a whole number, got {0}")]
    FractionalPoints(f64),

    #[error("points delta {0} is out of range")]
    PointsOutOfRange(f64),

    #[error("counter name must not be empty")]
    EmptyCounterName,
}

/// Why an achievement or quest predicate could not decide.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("no daily quests selected yet")]
    NoQuestDay,
}

/// Rejected username or avatar change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },

    #[error("unknown avatar '{0}'")]
    UnknownAvatar(String),
}
