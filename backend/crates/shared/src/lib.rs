//! Shared Kernel - building blocks for CRUD services
//!
//! This crate holds the vocabulary every service module shares:
//! - `specification` - composable business rules backed by expression trees
//! - `domain` - entities, value objects, enumerations, aggregates and events
//! - `messaging` - command / query handlers and their dispatcher
//! - `error` - the unified [`AppError`](error::app_error::AppError)
//! - `id` - typed UUID identifiers
//! - `type_name` - short type names for logs and messages
//!
//! **Design Principle**: No storage and no transport. Those live in the
//! crates that use the kernel.

pub mod domain;
pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod messaging;
pub mod specification;
pub mod type_name;

pub use error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use specification::Specification;
