//! Contract Error Types
//!
//! Errors raised while building or validating wire contracts. They
//! integrate with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Contracts result type alias
pub type ContractResult<T> = Result<T, ContractError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Page must be greater than 0")]
    InvalidPage,

    #[error("Page size must be greater than 0")]
    InvalidPageSize,

    #[error("Page size {requested} exceeds the maximum of {max}")]
    PageSizeTooLarge { requested: u32, max: u32 },

    /// An error bag entry could not be converted to or from JSON
    #[error("Error payload '{key}' is not readable: {reason}")]
    ErrorPayload { key: String, reason: String },
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::InvalidPage
            | ContractError::InvalidPageSize
            | ContractError::PageSizeTooLarge { .. } => ErrorKind::UnprocessableEntity,
            ContractError::ErrorPayload { .. } => ErrorKind::InternalServerError,
        }
    }

    fn action(&self) -> Option<&'static str> {
        match self {
            ContractError::InvalidPage => Some("Request page 1 or later"),
            ContractError::InvalidPageSize | ContractError::PageSizeTooLarge { .. } => {
                Some("Use a smaller, non-zero page size")
            }
            ContractError::ErrorPayload { .. } => None,
        }
    }
}

impl From<ContractError> for AppError {
    fn from(err: ContractError) -> Self {
        let app_err = AppError::new(err.kind(), err.to_string());
        let app_err = match err.action() {
            Some(action) => app_err.with_action(action),
            None => app_err,
        };
        app_err.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_errors_are_unprocessable() {
        let app_err: AppError = ContractError::InvalidPageSize.into();
        assert_eq!(app_err.status_code(), 422);
        assert_eq!(app_err.message(), "Page size must be greater than 0");
        assert!(app_err.action().is_some());
    }

    #[test]
    fn test_page_size_too_large_message() {
        let err = ContractError::PageSizeTooLarge {
            requested: 500,
            max: 100,
        };
        assert_eq!(err.to_string(), "Page size 500 exceeds the maximum of 100");
    }

    #[test]
    fn test_payload_error_is_internal() {
        let err = ContractError::ErrorPayload {
            key: "OrderLocked".to_string(),
            reason: "missing field `message`".to_string(),
        };
        let app_err: AppError = err.into();
        assert!(app_err.is_server_error());
        assert!(app_err.action().is_none());
    }
}
