//! Response Envelope
//!
//! Every API response body is wrapped in an [`Envelope`]: either a result
//! or an error message, plus the time the response was generated.
//!
//! ```json
//! { "result": { "id": 7 }, "errorMessage": null, "timeGenerated": "2026-01-05T09:30:00Z" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub result: Option<T>,
    pub error_message: Option<String>,
    pub time_generated: DateTime<Utc>,
}

impl<T> Envelope<T> {
    fn new(result: Option<T>, error_message: Option<String>) -> Self {
        Self {
            result,
            error_message,
            time_generated: Utc::now(),
        }
    }

    pub fn ok(result: T) -> Self {
        Self::new(Some(result), None)
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        Self::new(None, Some(error_message.into()))
    }

    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }
}

impl Envelope<()> {
    /// Success without a result
    pub fn empty() -> Self {
        Self::new(None, None)
    }
}

#[cfg(feature = "axum")]
mod response {
    use axum::Json;
    use axum::response::{IntoResponse, Response};
    use http::StatusCode;
    use serde::Serialize;

    use super::Envelope;

    /// 200 on success, 400 when the envelope carries an error
    impl<T: Serialize> IntoResponse for Envelope<T> {
        fn into_response(self) -> Response {
            let status = if self.is_success() {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, Json(self)).into_response()
        }
    }
}
