//! Glue between list endpoints and the `pagination` crate.

use actix_web::HttpRequest;
use pagination::{LIMIT_PARAM, PAGE_PARAM, Page, PageRequest};
use url::Url;

use crate::domain::{Error, Listing, page_error};

/// Parse `page` and `limit` from the request's query string.
pub(crate) fn page_request(req: &HttpRequest, default_limit: u32) -> Result<PageRequest, Error> {
    let mut page = None;
    let mut limit = None;
    for (key, value) in url::form_urlencoded::parse(req.query_string().as_bytes()) {
        match key.as_ref() {
            PAGE_PARAM => page = Some(value.into_owned()),
            LIMIT_PARAM => limit = Some(value.into_owned()),
            _ => {}
        }
    }
    PageRequest::from_query(page.as_deref(), limit.as_deref(), default_limit).map_err(page_error)
}

/// Absolute URL of the current request, used to build navigation links.
pub(crate) fn current_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    let raw = format!("{}://{}{}", info.scheme(), info.host(), req.uri());
    Url::parse(&raw).map_err(|err| Error::internal(format!("unparsable request URL: {err}")))
}

/// Wrap a listing in the paginated envelope, mapping each item to its DTO.
pub(crate) fn paginate<T, U>(
    req: &HttpRequest,
    page: &PageRequest,
    listing: Listing<T>,
    to_response: impl FnMut(T) -> U,
) -> Result<Page<U>, Error> {
    let url = current_url(req)?;
    Ok(Page::new(page, listing.count, listing.items, &url).map(to_response))
}
