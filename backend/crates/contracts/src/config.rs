//! Paging Configuration
//!
//! Defaults and limits applied to paged requests.

use std::str::FromStr;

use crate::paging::{NoFilter, PagedRequest, PagedRequestBuilder};

/// Environment variable overriding [`PagingConfig::default_page_size`]
pub const DEFAULT_PAGE_SIZE_VAR: &str = "PAGING_DEFAULT_PAGE_SIZE";
/// Environment variable overriding [`PagingConfig::max_page_size`]
pub const MAX_PAGE_SIZE_VAR: &str = "PAGING_MAX_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingConfig {
    /// Page used when a request names none
    pub default_page: u32,
    /// Page size used when a request names none
    pub default_page_size: u32,
    /// Largest page size a request may ask for
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: PagedRequest::<NoFilter>::DEFAULT_PAGE_SIZE,
            max_page_size: 100,
        }
    }
}

impl PagingConfig {
    /// Config for development (generous page size limit)
    pub fn development() -> Self {
        Self {
            max_page_size: 1_000,
            ..Self::default()
        }
    }

    /// Defaults overridden by `PAGING_DEFAULT_PAGE_SIZE` / `PAGING_MAX_PAGE_SIZE`
    ///
    /// Reads a `.env` file if one is present. Unparsable or zero values are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_page_size = env_page_size(MAX_PAGE_SIZE_VAR).unwrap_or(defaults.max_page_size);
        let default_page_size = env_page_size(DEFAULT_PAGE_SIZE_VAR)
            .unwrap_or(defaults.default_page_size)
            .min(max_page_size);

        tracing::debug!(default_page_size, max_page_size, "Paging configuration loaded");

        Self {
            default_page_size,
            max_page_size,
            ..defaults
        }
    }

    /// Builder pre-filled with this config's defaults
    pub fn request(&self) -> PagedRequestBuilder<NoFilter> {
        PagedRequest::create(self.default_page, self.default_page_size)
    }
}

fn env_page_size(key: &str) -> Option<u32> {
    let raw = dotenvy::var(key).ok()?;
    match parse_page_size(&raw) {
        Some(value) => Some(value),
        None => {
            tracing::warn!(key, value = %raw, "Ignoring invalid page size, using default");
            None
        }
    }
}

fn parse_page_size(raw: &str) -> Option<u32> {
    u32::from_str(raw.trim()).ok().filter(|size| *size > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PagingConfig::default();
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_development_config() {
        let config = PagingConfig::development();
        assert_eq!(config.default_page_size, 20);
        assert!(config.max_page_size > PagingConfig::default().max_page_size);
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("50"), Some(50));
        assert_eq!(parse_page_size(" 7 "), Some(7));
        assert_eq!(parse_page_size("0"), None);
        assert_eq!(parse_page_size("-3"), None);
        assert_eq!(parse_page_size("lots"), None);
    }

    #[test]
    fn test_request_uses_defaults() {
        let config = PagingConfig {
            default_page_size: 5,
            ..PagingConfig::default()
        };
        let request = config.request().build();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 5);
    }
}
