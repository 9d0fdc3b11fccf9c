//! Error conversions
//!
//! `From` impls so `?` lifts std and serde_json failures into [`AppError`],
//! and the axum rendering of an [`AppError`] as RFC 7807 problem JSON.

use std::io;
use std::num::ParseIntError;

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            io::ErrorKind::TimedOut => ErrorKind::RequestTimeout,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => ErrorKind::BadRequest,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, format!("I/O failure: {err}")).with_source(err)
    }
}

impl From<ParseIntError> for AppError {
    fn from(err: ParseIntError) -> Self {
        AppError::bad_request(format!("Expected a whole number: {err}")).with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Data | Category::Eof => {
                AppError::bad_request(format!("Unreadable JSON: {err}")).with_source(err)
            }
            Category::Io => AppError::internal("JSON could not be written").with_source(err),
        }
    }
}

#[cfg(feature = "axum")]
mod response {
    use axum::Json;
    use axum::response::{IntoResponse, Response};
    use http::StatusCode;
    use serde::Serialize;

    use super::AppError;

    /// RFC 7807 problem body
    #[derive(Serialize)]
    struct ProblemDetails<'a> {
        #[serde(rename = "type")]
        type_uri: String,
        title: &'static str,
        status: u16,
        detail: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<&'a str>,
    }

    impl<'a> From<&'a AppError> for ProblemDetails<'a> {
        fn from(err: &'a AppError) -> Self {
            Self {
                type_uri: format!("https://httpstatuses.io/{}", err.status_code()),
                title: err.kind().as_str(),
                status: err.status_code(),
                detail: err.message(),
                action: err.action(),
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            if self.is_server_error() {
                tracing::error!(error = ?self, "Request failed");
            } else {
                tracing::debug!(error = %self, "Request rejected");
            }

            let status =
                StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ProblemDetails::from(&self))).into_response()
        }
    }
}
