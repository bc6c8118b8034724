//! Error types for booking operations.

use thiserror::Error;

use crate::schedule::errors::ScheduleError;
use crate::time::TimeParseError;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("{resource_id} is already booked on {date} between {start} and {end}")]
    Unavailable {
        resource_id: String,
        date: String,
        start: String,
        end: String,
    },

    #[error("Invalid time range: end {end} is not after start {start}")]
    InvalidRange { start: String, end: String },

    #[error("Authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Time(#[from] TimeParseError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Short message suitable for showing to an end user.
    ///
    /// Everything outside validation, availability and sign-in problems
    /// collapses to a generic failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Time(e) => e.to_string(),
            Self::Unavailable { .. } | Self::InvalidRange { .. } => {
                "The selected time is taken or invalid".to_string()
            }
            Self::NotFound { entity, .. } => format!("{entity} not found"),
            Self::Authentication { .. } => "Invalid email or password".to_string(),
            _ => "Operation failed".to_string(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
