//! Presentation helpers (feature `axum`)
//!
//! Envelope responders for handlers, and a panic handler that turns a
//! panicking request into a JSON 500.
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use contracts::presentation::{catch_panic_layer, ok_with};
//!
//! let app: Router = Router::new()
//!     .route("/ping", get(|| async { ok_with("pong") }))
//!     .layer(catch_panic_layer());
//! ```

use std::any::Any;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;

use crate::envelope::Envelope;

/// Signature accepted by [`CatchPanicLayer::custom`]
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// 200 with an empty envelope
pub fn ok() -> Response {
    Envelope::empty().into_response()
}

/// 200 with `result` in the envelope
pub fn ok_with<T: Serialize>(result: T) -> Response {
    Envelope::ok(result).into_response()
}

/// 400 with `error_message` in the envelope
pub fn bad_request(error_message: impl Into<String>) -> Response {
    Envelope::<()>::error(error_message).into_response()
}

/// Log the panic and answer 500 `{"error": "<panic message>"}`
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(
        panic = %message,
        "An unhandled panic occurred while executing the request"
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// `CatchPanicLayer` wired to [`handle_panic`]
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}
