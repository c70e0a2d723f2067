use thiserror::Error;

use super::profile::{AttendeeId, Skill};

/// Terminal failures of a single draw. None of them yields a partial assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// The draw configuration itself is unusable.
    #[error("invalid draw configuration: {reason}")]
    InvalidConfig { reason: String },
    /// Not enough attendees to give every team at least one member.
    #[error("not enough players: {available} available, {required} required")]
    InsufficientPlayers { available: usize, required: usize },
    /// The hard goalkeeper constraint cannot be met by the pool.
    #[error("not enough goalkeepers: {available} qualified, {required} required")]
    GoalkeeperShortage { available: usize, required: usize },
}

impl DrawError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        DrawError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Malformed attendee data rejected before it reaches the balancer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("attendee id must not be empty")]
    EmptyId,
    #[error("attendee `{0}` listed more than once")]
    DuplicateAttendee(AttendeeId),
    #[error("attendee `{attendee}` has invalid {skill} rating {value}")]
    InvalidRating {
        attendee: AttendeeId,
        skill: Skill,
        value: f64,
    },
}
