//! Error types for Roster

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: Uuid },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Any failure inside a compound operation
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl RosterError {
    /// Collapse any error into `BadRequest`, keeping its message
    pub fn into_bad_request(self) -> Self {
        match self {
            RosterError::BadRequest(_) => self,
            other => RosterError::BadRequest(other.to_string()),
        }
    }

    /// Short machine-readable kind, used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::NotFound { .. } => "not_found",
            RosterError::Validation(_) => "validation_error",
            RosterError::InvalidFilter(_) => "invalid_filter",
            RosterError::BadRequest(_) => "bad_request",
        }
    }
}
