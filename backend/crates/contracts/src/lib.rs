//! Contracts - wire types shared by CRUD services and their clients
//!
//! - `envelope` - the `{ result, errorMessage, timeGenerated }` response wrapper
//! - `api` - client-side API responses and keyed error bags
//! - `paging` / `sort` - paged requests, paged responses and sort instructions
//! - `date_only` - `yyyy-MM-dd` JSON dates
//! - `presentation` - axum responders and panic handling (feature `axum`)
//! - `config` - paging defaults and limits

pub mod api;
pub mod config;
pub mod date_only;
pub mod envelope;
pub mod error;
pub mod paging;
#[cfg(feature = "axum")]
pub mod presentation;
pub mod sort;

// Re-exports for convenience
pub use config::PagingConfig;
pub use envelope::Envelope;
pub use error::{ContractError, ContractResult};
pub use paging::{NoFilter, PagedRequest, PagedResponse, RequestFilter};
pub use sort::{SortDefinition, SortDefinitions, SortDirection};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
