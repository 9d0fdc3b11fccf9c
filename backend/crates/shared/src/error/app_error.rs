//! Application Error
//!
//! [`AppError`] is the one error type that crosses crate boundaries.
//! `DomainError`, `MessagingError` and the contracts' `ContractError` all
//! convert into it, so handlers can `?` across layers.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

type Text = Cow<'static, str>;
type BoxedSource = Box<dyn Error + Send + Sync + 'static>;

/// Classified, user-facing error with an optional next step and cause
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::unprocessable("Page size 500 exceeds the maximum of 100")
///     .with_action("Request at most 100 items per page");
///
/// assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
/// assert_eq!(err.status_code(), 422);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Text,
    action: Option<Text>,
    source: Option<BoxedSource>,
}

/// Result alias used by handlers, dispatchers and publishers
///
/// ```rust
/// use kernel::error::app_error::{AppError, AppResult};
///
/// fn page_offset(page: u32, page_size: u32) -> AppResult<u64> {
///     if page == 0 {
///         return Err(AppError::unprocessable("Page must be greater than 0"));
///     }
///     Ok(u64::from(page - 1) * u64::from(page_size))
/// }
///
/// assert_eq!(page_offset(3, 20).unwrap(), 40);
/// ```
pub type AppResult<T> = Result<T, AppError>;

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<Text>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )+
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Text>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    kind_constructors! {
        /// 400, malformed input
        bad_request => BadRequest;
        /// 401
        unauthorized => Unauthorized;
        /// 403
        forbidden => Forbidden;
        /// 404, lookup by id or key came back empty
        not_found => NotFound;
        /// 409
        conflict => Conflict;
        /// 422, well-formed input that breaks a rule
        unprocessable => UnprocessableEntity;
        /// 500, a bug or a missing registration
        internal => InternalServerError;
        /// 503
        service_unavailable => ServiceUnavailable;
    }

    /// Tell the caller what to do about it
    pub fn with_action(mut self, action: impl Into<Text>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Keep the underlying cause for logs and `Error::source`
    ///
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn parse_page(raw: &str) -> AppResult<u32> {
    ///     raw.parse::<u32>()
    ///         .map_err(|e| AppError::bad_request("Page is not a number").with_source(e))
    /// }
    ///
    /// assert!(parse_page("two").is_err());
    /// ```
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("action", &self.action)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        match &self.action {
            Some(action) => write!(f, " (Action: {action})"),
            None => Ok(()),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|source| source as &(dyn Error + 'static))
    }
}

/// `Result<T, E>` to [`AppResult<T>`], keeping `E` as the source
pub trait ResultExt<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Text>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Text>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|source| AppError::new(kind, message).with_source(source))
    }
}

/// `Option<T>` to [`AppResult<T>`]
pub trait OptionExt<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Text>) -> AppResult<T>;

    fn ok_or_not_found(self, message: impl Into<Text>) -> AppResult<T>
    where
        Self: Sized,
    {
        self.ok_or_app_err(ErrorKind::NotFound, message)
    }
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Text>) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(kind, message))
    }
}
