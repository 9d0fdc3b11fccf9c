//! Paging
//!
//! [`PagedRequest`] describes which slice of a result set a caller wants
//! (page, page size, sorts and an optional filter) and renders itself as a
//! query string. [`PagedResponse`] carries one page back together with the
//! total count.
//!
//! ## Examples
//! ```rust
//! use contracts::paging::{PagedRequest, RequestFilter};
//! use contracts::sort::SortDefinition;
//!
//! struct ByCity(&'static str);
//!
//! impl RequestFilter for ByCity {
//!     fn to_query_string(&self) -> String {
//!         format!("&city={}", self.0)
//!     }
//! }
//!
//! let request = PagedRequest::create(2, 10)
//!     .with_sort(vec![SortDefinition::descending("CreatedAt")])
//!     .with_filter(ByCity("Oslo"))
//!     .build();
//!
//! assert_eq!(
//!     request.to_query_string(),
//!     "?page=2&pageSize=10&sort=CreatedAt desc&city=Oslo"
//! );
//! ```

use kernel::specification::Specification;
use serde::{Deserialize, Serialize};

use crate::config::PagingConfig;
use crate::error::{ContractError, ContractResult};
use crate::sort::SortDefinitions;

/// Extra query parameters contributed by a request filter
pub trait RequestFilter {
    /// `&key=value` pairs, or an empty string
    fn to_query_string(&self) -> String;
}

/// Filter that adds nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl RequestFilter for NoFilter {
    fn to_query_string(&self) -> String {
        String::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedRequest<F = NoFilter> {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub sorts: SortDefinitions,
    pub filter: F,
}

impl PagedRequest<NoFilter> {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    /// Start building a request for `page` of `page_size` items
    pub fn create(page: u32, page_size: u32) -> PagedRequestBuilder<NoFilter> {
        PagedRequestBuilder {
            page,
            page_size,
            sorts: SortDefinitions::new(),
            filter: NoFilter,
        }
    }
}

impl Default for PagedRequest<NoFilter> {
    fn default() -> Self {
        PagedRequest::create(1, Self::DEFAULT_PAGE_SIZE).build()
    }
}

impl<F: RequestFilter> PagedRequest<F> {
    /// `?page=<n>&pageSize=<n>` followed by the sorts and the filter
    pub fn to_query_string(&self) -> String {
        format!(
            "?page={}&pageSize={}{}{}",
            self.page,
            self.page_size,
            self.sorts.to_query_string(),
            self.filter.to_query_string()
        )
    }
}

impl<F> PagedRequest<F> {
    /// Number of items before the first item of this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.page_size as usize
    }

    /// Check the page and page size against `config`
    pub fn validate(&self, config: &PagingConfig) -> ContractResult<()> {
        if self.page == 0 {
            return Err(ContractError::InvalidPage);
        }
        if self.page_size == 0 {
            return Err(ContractError::InvalidPageSize);
        }
        if self.page_size > config.max_page_size {
            return Err(ContractError::PageSizeTooLarge {
                requested: self.page_size,
                max: config.max_page_size,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PagedRequestBuilder<F> {
    page: u32,
    page_size: u32,
    sorts: SortDefinitions,
    filter: F,
}

impl<F> PagedRequestBuilder<F> {
    /// Replace the sort list
    pub fn with_sort(mut self, sorts: impl Into<SortDefinitions>) -> Self {
        self.sorts = sorts.into();
        self
    }

    /// Replace the filter, possibly with one of another type
    pub fn with_filter<G: RequestFilter>(self, filter: G) -> PagedRequestBuilder<G> {
        PagedRequestBuilder {
            page: self.page,
            page_size: self.page_size,
            sorts: self.sorts,
            filter,
        }
    }

    pub fn build(self) -> PagedRequest<F> {
        PagedRequest {
            page: self.page,
            page_size: self.page_size,
            sorts: self.sorts,
            filter: self.filter,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "PagedResponseData<T>")]
pub struct PagedResponse<T> {
    page: u32,
    page_size: u32,
    total_count: u64,
    items: Vec<T>,
}

impl<T> PagedResponse<T> {
    pub fn new(page: u32, page_size: u32, total_count: u64, items: Vec<T>) -> ContractResult<Self> {
        if page == 0 {
            return Err(ContractError::InvalidPage);
        }
        if page_size == 0 {
            return Err(ContractError::InvalidPageSize);
        }
        Ok(Self {
            page,
            page_size,
            total_count,
            items,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// `ceil(total_count / page_size)`
    pub fn page_count(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResponse<U> {
        PagedResponse {
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T> Default for PagedResponse<T> {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
            total_count: 0,
            items: Vec::new(),
        }
    }
}

impl<T: Serialize> Serialize for PagedResponse<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("PagedResponse", 5)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.serialize_field("totalCount", &self.total_count)?;
        state.serialize_field("pageCount", &self.page_count())?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

/// Unvalidated wire form; `pageCount` is derived and ignored on input
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedResponseData<T> {
    page: u32,
    page_size: u32,
    total_count: u64,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> TryFrom<PagedResponseData<T>> for PagedResponse<T> {
    type Error = ContractError;

    fn try_from(data: PagedResponseData<T>) -> Result<Self, Self::Error> {
        PagedResponse::new(data.page, data.page_size, data.total_count, data.items)
    }
}

/// Skip to the requested page and take at most one page of items
pub fn take_page<I, F>(items: I, request: &PagedRequest<F>) -> Vec<I::Item>
where
    I: IntoIterator,
{
    items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size as usize)
        .collect()
}

/// Apply `spec` to `items` and return the requested page of matches
///
/// The total count is the number of matches, not the number of items.
pub fn page_matching<'a, T, F>(
    items: &'a [T],
    spec: &Specification<T>,
    request: &PagedRequest<F>,
) -> ContractResult<PagedResponse<&'a T>>
where
    T: 'static,
{
    let matches: Vec<&'a T> = spec.filter(items).collect();
    let total_count = matches.len() as u64;
    let page = take_page(matches, request);

    tracing::debug!(
        page = request.page,
        page_size = request.page_size,
        total_count,
        returned = page.len(),
        "Paged specification matches"
    );

    PagedResponse::new(request.page, request.page_size, total_count, page)
}
