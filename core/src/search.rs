//! Status search.
//!
//! # Design
//! Search lives on its own host and needs no credentials. Paging is by page
//! number and id window, not cursors: the caller drives it with
//! `SearchParams::next_page`, which stops once the service omits its
//! `next_page` token.

use crate::client::TwitterClient;
use crate::error::Result;
use crate::http::{HttpRequest, Transport};
use crate::mapping::map_search_results;
use crate::pagination::{SearchParams, SearchResults};

pub struct SearchOperations<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<'a, T: Transport> SearchOperations<'a, T> {
    pub(crate) fn new(client: &'a TwitterClient<T>) -> Self {
        Self { client }
    }

    /// First page of results for `query` at the default page size.
    pub fn search(&self, query: &str) -> Result<SearchResults> {
        self.search_with(&SearchParams::new(query))
    }

    /// One page of results. Use `SearchParams::next_page` with the returned
    /// page to continue; it yields `None` once the service stops sending a
    /// `next_page` token.
    pub fn search_with(&self, params: &SearchParams) -> Result<SearchResults> {
        let request = HttpRequest::get(self.client.search_url("search.json"), params.to_query()?);
        map_search_results(&self.client.fetch(request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::*;
    use crate::error::{ApiError, ErrorKind};
    use crate::request::IdBounds;

    const PAGE_ONE: &str = r##"{
        "results": [
            {"id": 30, "from_user": "habuma", "from_user_id": 1, "text": "#spring one", "created_at": "Thu, 24 Feb 2011 18:50:08 +0000"},
            {"id": 29, "from_user": "kdonald", "from_user_id": 2, "to_user_id": 1, "text": "#spring two"}
        ],
        "max_id": 30,
        "since_id": 0,
        "next_page": "?page=2&max_id=30&rpp=2&q=%23spring"
    }"##;

    const PAGE_TWO: &str = r##"{
        "results": [
            {"id": 28, "from_user": "habuma", "text": "#spring three"},
            {"id": 27, "from_user": "royclarkson", "text": "#spring four"}
        ],
        "max_id": 30,
        "since_id": 0
    }"##;

    #[test]
    fn default_search_request() {
        let stub = StubTransport::respond(200, r#"{"results":[]}"#);
        let results = client(&stub).search().search("#spring").unwrap();
        assert_eq!(stub.last_url(), format!("{SEARCH}/search.json?q=%23spring&rpp=50&page=1"));
        assert!(results.tweets().is_empty());
        assert!(!results.has_next_page());
    }

    #[test]
    fn zero_bounds_are_not_sent() {
        let stub = StubTransport::respond(200, r#"{"results":[]}"#);
        let params = SearchParams::new("rust").page(3, 20).bounded(IdBounds::between(0, -1));
        client(&stub).search().search_with(&params).unwrap();
        assert_eq!(stub.last_url(), format!("{SEARCH}/search.json?q=rust&rpp=20&page=3"));
    }

    #[test]
    fn positive_bounds_are_sent() {
        let stub = StubTransport::respond(200, r#"{"results":[]}"#);
        let params = SearchParams::new("rust").bounded(IdBounds::between(123, 456));
        client(&stub).search().search_with(&params).unwrap();
        assert_eq!(
            stub.last_url(),
            format!("{SEARCH}/search.json?q=rust&rpp=50&page=1&since_id=123&max_id=456")
        );
    }

    #[test]
    fn full_page_without_token_is_last() {
        let stub = StubTransport::respond(200, PAGE_ONE);
        stub.push(200, PAGE_TWO);
        let c = client(&stub);

        let params = SearchParams::new("#spring").page(1, 2);
        let first = c.search().search_with(&params).unwrap();
        assert_eq!(first.tweets().len(), 2);
        assert_eq!(first.tweets()[0].text, "#spring one");
        assert_eq!(first.tweets()[1].to_user_id, Some(1));

        let next = params.next_page(&first).unwrap();
        let second = c.search().search_with(&next).unwrap();
        assert_eq!(stub.last_url(), format!("{SEARCH}/search.json?q=%23spring&rpp=2&page=2&max_id=30"));
        assert_eq!(second.tweets().len(), 2);
        assert_eq!(next.next_page(&second), None);
    }

    #[test]
    fn bad_paging_is_rejected_locally() {
        let stub = StubTransport::default();
        let c = client(&stub);
        assert_eq!(
            c.search().search_with(&SearchParams::new("x").page(0, 50)).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            c.search().search_with(&SearchParams::new("x").page(1, -5)).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn enhance_your_calm_is_rate_limited() {
        let stub = StubTransport::respond(420, r#"{"error":"You have been rate limited. Enhance your calm."}"#);
        let err = client(&stub).search().search("#spring").unwrap_err();
        assert!(matches!(err, ApiError::RateLimitExceeded(_)));
        assert!(err.kind().is_retryable());
    }

    #[test]
    fn search_needs_no_credentials() {
        let stub = StubTransport::respond(200, r#"{"results":[]}"#);
        assert!(anonymous(&stub).search().search("rust").is_ok());
    }

    #[test]
    fn missing_results_array_is_malformed() {
        let stub = StubTransport::respond(200, r#"{"error_free": true}"#);
        let err = client(&stub).search().search("rust").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
