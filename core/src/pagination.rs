//! The two pagination strategies.
//!
//! Relationship listings use opaque cursors (`next_cursor` /
//! `previous_cursor`, `0` meaning "nothing that way"). Search uses a 1-based
//! page number bounded by an id range, and ends only when the response stops
//! carrying a `next_page` token. The two are kept apart: a short search page
//! is not necessarily the last one, and a cursor says nothing about page
//! numbers.

use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::request::{Cursor, IdBounds, Query};
use crate::types::StatusUpdate;

pub const DEFAULT_RESULTS_PER_PAGE: i32 = 50;

/// One page of a cursor-paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursoredList<T> {
    items: Vec<T>,
    previous_cursor: i64,
    next_cursor: i64,
}

impl<T> CursoredList<T> {
    pub fn new(items: Vec<T>, previous_cursor: i64, next_cursor: i64) -> Self {
        Self {
            items,
            previous_cursor,
            next_cursor,
        }
    }

    /// A page with nothing before or after it.
    pub fn terminal(items: Vec<T>) -> Self {
        Self::new(items, 0, 0)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_cursor(&self) -> i64 {
        self.next_cursor
    }

    pub fn previous_cursor(&self) -> i64 {
        self.previous_cursor
    }

    pub fn has_next(&self) -> bool {
        self.next_cursor != 0
    }

    pub fn has_previous(&self) -> bool {
        self.previous_cursor != 0
    }

    /// Cursor for the following page, ready to pass back to the same call.
    pub fn next_page_cursor(&self) -> Option<Cursor> {
        Cursor::new(self.next_cursor)
    }

    pub fn previous_page_cursor(&self) -> Option<Cursor> {
        Cursor::new(self.previous_cursor)
    }
}

impl<T> IntoIterator for CursoredList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Parameters for one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub page: i32,
    pub results_per_page: i32,
    pub bounds: IdBounds,
}

impl SearchParams {
    /// First page, default page size, unbounded.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            bounds: IdBounds::default(),
        }
    }

    pub fn page(self, page: i32, results_per_page: i32) -> Self {
        Self {
            page,
            results_per_page,
            ..self
        }
    }

    pub fn bounded(self, bounds: IdBounds) -> Self {
        Self { bounds, ..self }
    }

    /// Parameters for the page after `results`, or `None` when `results` was
    /// the last page. The id window is pinned to the first page's `max_id`
    /// so later pages do not shift as new statuses arrive. A page number
    /// with no successor in `i32` also ends the walk.
    pub fn next_page(&self, results: &SearchResults) -> Option<SearchParams> {
        if !results.has_next_page() {
            return None;
        }
        let page = self.page.checked_add(1)?;
        let max_id = if results.max_id() > 0 {
            results.max_id()
        } else {
            self.bounds.max_id
        };
        Some(SearchParams {
            query: self.query.clone(),
            page,
            results_per_page: self.results_per_page,
            bounds: IdBounds::between(self.bounds.since_id, max_id),
        })
    }

    pub(crate) fn to_query(&self) -> Result<Query> {
        if self.query.trim().is_empty() {
            return Err(ApiError::invalid("search query must not be blank"));
        }
        if self.page <= 0 {
            return Err(ApiError::invalid(format!("page must be 1 or greater, got {}", self.page)));
        }
        if self.results_per_page <= 0 {
            return Err(ApiError::invalid(format!(
                "results per page must be positive, got {}",
                self.results_per_page
            )));
        }
        let mut query = vec![
            ("q".to_string(), self.query.clone()),
            ("rpp".to_string(), self.results_per_page.to_string()),
            ("page".to_string(), self.page.to_string()),
        ];
        self.bounds.append_to(&mut query);
        Ok(query)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    tweets: Vec<StatusUpdate>,
    max_id: i64,
    since_id: i64,
    next_page: Option<String>,
}

impl SearchResults {
    /// A blank token counts as no token.
    pub fn new(tweets: Vec<StatusUpdate>, max_id: i64, since_id: i64, next_page: Option<String>) -> Self {
        Self {
            tweets,
            max_id,
            since_id,
            next_page: next_page.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn tweets(&self) -> &[StatusUpdate] {
        &self.tweets
    }

    pub fn into_tweets(self) -> Vec<StatusUpdate> {
        self.tweets
    }

    pub fn max_id(&self) -> i64 {
        self.max_id
    }

    pub fn since_id(&self) -> i64 {
        self.since_id
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Continuation token exactly as the service sent it.
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_next_cursor_is_terminal() {
        let page = CursoredList::new(vec![1_i64, 2, 3], 0, 0);
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.next_page_cursor(), None);
    }

    #[test]
    fn nonzero_cursors_are_usable_both_ways() {
        let page = CursoredList::new(vec![4_i64], -1374004777531007833, 1374004777531007833);
        assert_eq!(page.next_page_cursor().map(Cursor::value), Some(1374004777531007833));
        assert_eq!(page.previous_page_cursor().map(Cursor::value), Some(-1374004777531007833));
    }

    #[test]
    fn cursored_list_iterates_in_order() {
        let ids: Vec<i64> = CursoredList::terminal(vec![3, 1, 2]).into_iter().collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn default_search_query() {
        let query = SearchParams::new("#spring").to_query().unwrap();
        assert_eq!(
            query,
            vec![
                ("q".to_string(), "#spring".to_string()),
                ("rpp".to_string(), "50".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn search_bounds_are_appended_when_positive() {
        let query = SearchParams::new("rust")
            .page(2, 10)
            .bounded(IdBounds::between(111, 999))
            .to_query()
            .unwrap();
        assert_eq!(query[3], ("since_id".to_string(), "111".to_string()));
        assert_eq!(query[4], ("max_id".to_string(), "999".to_string()));
    }

    #[test]
    fn invalid_search_params_are_rejected() {
        assert!(SearchParams::new("x").page(0, 10).to_query().is_err());
        assert!(SearchParams::new("x").page(-1, 10).to_query().is_err());
        assert!(SearchParams::new("x").page(1, 0).to_query().is_err());
        assert!(SearchParams::new("   ").to_query().is_err());
    }

    #[test]
    fn next_page_requires_token() {
        let params = SearchParams::new("rust").page(1, 2);
        let full_but_last = SearchResults::new(Vec::new(), 50, 0, None);
        assert_eq!(params.next_page(&full_but_last), None);

        let blank_token = SearchResults::new(Vec::new(), 50, 0, Some(String::new()));
        assert!(!blank_token.has_next_page());
    }

    #[test]
    fn next_page_advances_and_pins_max_id() {
        let params = SearchParams::new("rust").page(1, 2).bounded(IdBounds::since(7));
        let results = SearchResults::new(Vec::new(), 50, 7, Some("?page=2&max_id=50&q=rust".into()));
        let next = params.next_page(&results).unwrap();
        assert_eq!(next.page, 2);
        assert_eq!(next.results_per_page, 2);
        assert_eq!(next.bounds, IdBounds::between(7, 50));
        assert_eq!(next.query, "rust");
    }

    #[test]
    fn last_representable_page_has_no_successor() {
        let params = SearchParams::new("x").page(i32::MAX, 10);
        assert!(params.to_query().is_ok());
        let results = SearchResults::new(Vec::new(), 5, 0, Some("?page=next".into()));
        assert_eq!(params.next_page(&results), None);
    }
}
