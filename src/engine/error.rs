use ulid::Ulid;

use crate::model::Ms;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Referenced user, item, or booking does not exist.
    NotFound(Ulid),
    /// Actor lacks the required relationship to the target entity.
    Forbidden(&'static str),
    /// The target's current state forbids the operation.
    InvalidState(&'static str),
    /// Booking range with `start >= end`.
    InvalidSpan { start: Ms, end: Ms },
    /// New booking overlaps the approved booking with this id.
    Conflict(Ulid),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            EngineError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            EngineError::InvalidSpan { start, end } => {
                write!(f, "invalid span: start {start} must be before end {end}")
            }
            EngineError::Conflict(id) => write!(f, "conflict with approved booking: {id}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
