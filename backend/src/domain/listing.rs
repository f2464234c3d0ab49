//! One page of a paginated collection as produced by a driving port.

use pagination::{PageRequest, PageRequestError};

use super::Error;

/// Items on the requested page plus the total size of the collection.
///
/// Adapters turn this into a [`pagination::Page`] once they know the request
/// URL the navigation links hang off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub count: u64,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>, count: u64) -> Self {
        Self { items, count }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Reject a page past the end of the collection.
    ///
    /// # Errors
    /// Returns a not-found [`Error`] with the message `invalid page`.
    pub fn within(self, page: &PageRequest) -> Result<Self, Error> {
        page.ensure_within(self.count).map_err(page_error)?;
        Ok(self)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

/// Map a rejected page request onto the domain error taxonomy.
pub fn page_error(err: PageRequestError) -> Error {
    match err {
        PageRequestError::OutOfRange => Error::not_found(err.to_string()),
        PageRequestError::InvalidPage => Error::field("page", "invalid_page", err.to_string()),
        PageRequestError::InvalidLimit { .. } => {
            Error::field("limit", "invalid_limit", err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0, true)]
    #[case(2, 6, false)]
    #[case(2, 7, true)]
    fn within_checks_page_bounds(#[case] page: u32, #[case] count: u64, #[case] ok: bool) {
        let request = PageRequest::new(page, 6).expect("valid request");
        let result = Listing::<u8>::new(Vec::new(), count).within(&request);
        match result {
            Ok(listing) => {
                assert!(ok);
                assert_eq!(listing.count, count);
            }
            Err(err) => {
                assert!(!ok);
                assert_eq!(err.code(), ErrorCode::NotFound);
                assert_eq!(err.message(), "invalid page");
            }
        }
    }

    #[rstest]
    fn limit_errors_point_at_limit_field() {
        let err = page_error(PageRequestError::InvalidLimit { max: 100 });
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "limit");
    }
}
