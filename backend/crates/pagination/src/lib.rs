//! Page-number pagination primitives shared by listing endpoints.
//!
//! A [`PageRequest`] captures the `page` and `limit` query parameters after
//! validation. A [`Page`] wraps one slice of results together with the total
//! row count and the navigation links clients follow to reach the adjacent
//! pages.
//!
//! ```
//! use pagination::{Page, PageRequest};
//! use url::Url;
//!
//! let request = PageRequest::new(2, 2).expect("valid request");
//! let url = Url::parse("http://localhost/api/recipes/?page=2&limit=2").expect("url");
//! let page = Page::new(&request, 5, vec!["c", "d"], &url);
//!
//! assert_eq!(page.count, 5);
//! assert_eq!(page.next.as_deref(), Some("http://localhost/api/recipes/?limit=2&page=3"));
//! assert_eq!(page.previous.as_deref(), Some("http://localhost/api/recipes/?limit=2"));
//! ```

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Page size applied when the client does not supply a `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Largest `limit` a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameter carrying the one-based page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Reasons a page request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page number is zero or not a number.
    #[error("page must be a positive integer")]
    InvalidPage,
    /// The limit is zero, above the maximum, or not a number.
    #[error("limit must be an integer between 1 and {max}")]
    InvalidLimit {
        /// Largest accepted limit.
        max: u32,
    },
    /// The page lies beyond the last page of the collection.
    #[error("invalid page")]
    OutOfRange,
}

/// Validated page-number request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request from a one-based page number and a page size.
    ///
    /// # Errors
    /// Returns [`PageRequestError::InvalidPage`] for page zero and
    /// [`PageRequestError::InvalidLimit`] for a limit outside
    /// `1..=MAX_PAGE_SIZE`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::InvalidPage);
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(PageRequestError::InvalidLimit { max: MAX_PAGE_SIZE });
        }
        Ok(Self { page, limit })
    }

    /// Parse raw query parameter values, falling back to page one and
    /// `default_limit` when a parameter is absent.
    ///
    /// # Errors
    /// Returns the same errors as [`PageRequest::new`], and also rejects
    /// values that are not unsigned integers.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, PageRequestError> {
        let page = match page {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| PageRequestError::InvalidPage)?,
            None => 1,
        };
        let limit = match limit {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| PageRequestError::InvalidLimit { max: MAX_PAGE_SIZE })?,
            None => default_limit,
        };
        Self::new(page, limit)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Number of pages needed to show `count` rows. An empty collection
    /// still has one (empty) page.
    #[must_use]
    pub fn page_count(&self, count: u64) -> u64 {
        count.div_ceil(u64::from(self.limit)).max(1)
    }

    /// Reject requests that point past the last page of a collection of
    /// `count` rows.
    ///
    /// # Errors
    /// Returns [`PageRequestError::OutOfRange`] when the page does not exist.
    pub fn ensure_within(&self, count: u64) -> Result<(), PageRequestError> {
        if u64::from(self.page) > self.page_count(count) {
            return Err(PageRequestError::OutOfRange);
        }
        Ok(())
    }
}

/// One page of results plus navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of rows across every page.
    pub count: u64,
    /// Link to the following page, absent on the last page.
    pub next: Option<String>,
    /// Link to the preceding page, absent on the first page.
    pub previous: Option<String>,
    /// Rows on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page, deriving `next` and `previous` from `current_url`.
    ///
    /// The links keep every other query parameter of `current_url` in its
    /// original order. The link to page one omits the `page` parameter.
    #[must_use]
    pub fn new(request: &PageRequest, count: u64, results: Vec<T>, current_url: &Url) -> Self {
        let page = u64::from(request.page());
        let next = (page < request.page_count(count))
            .then(|| page_link(current_url, request.page().saturating_add(1)));
        let previous = (page > 1).then(|| page_link(current_url, request.page() - 1));
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform the rows while keeping the count and links.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Rebuild `current_url` so that it points at `page`.
#[must_use]
pub fn page_link(current_url: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = current_url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = current_url.clone();
    link.set_query(None);
    if retained.is_empty() && page == 1 {
        return link.to_string();
    }

    {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if page > 1 {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
    }
    link.to_string()
}
