//! Error Kind
//!
//! [`ErrorKind`] classifies an [`AppError`](super::app_error::AppError) and
//! fixes the HTTP status it is rendered with.

use serde::Serialize;

macro_rules! error_kinds {
    ($($(#[$doc:meta])* $variant:ident = $code:literal, $reason:literal;)+) => {
        /// Error classification, one HTTP status per kind
        ///
        /// ```rust
        /// use kernel::error::kind::ErrorKind;
        ///
        /// assert_eq!(ErrorKind::NotFound.status_code(), 404);
        /// assert_eq!(ErrorKind::NotFound.as_str(), "Not Found");
        /// assert_eq!(ErrorKind::UnprocessableEntity.status_code(), 422);
        /// ```
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[non_exhaustive]
        pub enum ErrorKind {
            $($(#[$doc])* $variant,)+
        }

        impl ErrorKind {
            const ALL: &'static [ErrorKind] = &[$(ErrorKind::$variant,)+];

            pub const fn status_code(&self) -> u16 {
                match self {
                    $(ErrorKind::$variant => $code,)+
                }
            }

            /// Reason phrase
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(ErrorKind::$variant => $reason,)+
                }
            }
        }
    };
}

error_kinds! {
    /// Malformed input
    BadRequest = 400, "Bad Request";
    Unauthorized = 401, "Unauthorized";
    Forbidden = 403, "Forbidden";
    /// Lookup came back empty
    NotFound = 404, "Not Found";
    RequestTimeout = 408, "Request Timeout";
    /// Clashes with current state
    Conflict = 409, "Conflict";
    /// Well-formed but breaks a rule (paging limits, invariants)
    UnprocessableEntity = 422, "Unprocessable Entity";
    /// Bug, unregistered handler, unreadable payload
    InternalServerError = 500, "Internal Server Error";
    ServiceUnavailable = 503, "Service Unavailable";
}

impl ErrorKind {
    /// Classify a status code received from another service
    ///
    /// Unlisted 4xx codes fold into `BadRequest` and unlisted 5xx codes into
    /// `InternalServerError`. Anything below 400 is not an error.
    pub fn from_status_code(code: u16) -> Option<Self> {
        if let Some(kind) = Self::ALL.iter().find(|kind| kind.status_code() == code) {
            return Some(*kind);
        }
        match code {
            400..=499 => Some(ErrorKind::BadRequest),
            500..=599 => Some(ErrorKind::InternalServerError),
            _ => None,
        }
    }

    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    pub const fn is_client_error(&self) -> bool {
        matches!(self.status_code(), 400..=499)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_round_trips_its_status() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_status_code(kind.status_code()), Some(*kind));
            assert_ne!(kind.is_client_error(), kind.is_server_error(), "{kind}");
        }
    }

    #[test]
    fn test_from_unlisted_status_code() {
        assert_eq!(ErrorKind::from_status_code(200), None);
        assert_eq!(ErrorKind::from_status_code(304), None);
        assert_eq!(ErrorKind::from_status_code(418), Some(ErrorKind::BadRequest));
        assert_eq!(
            ErrorKind::from_status_code(502),
            Some(ErrorKind::InternalServerError)
        );
    }

    #[test]
    fn test_classification() {
        assert!(ErrorKind::UnprocessableEntity.is_client_error());
        assert!(!ErrorKind::NotFound.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
        assert_eq!(ErrorKind::RequestTimeout.to_string(), "Request Timeout");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorKind::UnprocessableEntity).unwrap();
        assert_eq!(json, r#""UNPROCESSABLE_ENTITY""#);
    }
}
