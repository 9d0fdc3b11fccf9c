//! Domain Error Types
//!
//! Errors raised by the domain modelling kernel. They convert into the
//! unified [`AppError`] at the application boundary.

use thiserror::Error;

use crate::error::{app_error::AppError, kind::ErrorKind};

/// Domain-kernel result type alias
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Lookup on an [`Enumeration`](super::enumeration::Enumeration) found nothing
    #[error("'{key}' is not a valid {description} in {type_name}")]
    InvalidEnumeration {
        key: String,
        description: &'static str,
        type_name: String,
    },

    /// A subscribed handler rejected a published event
    #[error("Handler for {event} failed: {reason}")]
    EventHandlerFailed {
        event: String,
        kind: ErrorKind,
        reason: String,
    },
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidEnumeration { .. } => ErrorKind::BadRequest,
            DomainError::EventHandlerFailed { kind, .. } => *kind,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let kind = err.kind();
        AppError::new(kind, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enumeration_message() {
        let err = DomainError::InvalidEnumeration {
            key: "3".to_string(),
            description: "value",
            type_name: "CardType".to_string(),
        };
        assert_eq!(err.to_string(), "'3' is not a valid value in CardType");
    }

    #[test]
    fn test_into_app_error() {
        let err = DomainError::InvalidEnumeration {
            key: "Gold".to_string(),
            description: "display name",
            type_name: "Tier".to_string(),
        };
        let app_err: AppError = err.into();
        assert_eq!(app_err.status_code(), 400);
        assert!(app_err.message().contains("Gold"));

        let err = DomainError::EventHandlerFailed {
            event: "OrderPlaced".to_string(),
            kind: ErrorKind::ServiceUnavailable,
            reason: "mailbox full".to_string(),
        };
        let app_err: AppError = err.into();
        assert_eq!(app_err.status_code(), 503);
        assert_eq!(app_err.message(), "Handler for OrderPlaced failed: mailbox full");
    }
}
