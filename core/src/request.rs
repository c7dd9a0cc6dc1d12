//! Request parameter encoding.
//!
//! Identity, batch, cursor and id-bound arguments are turned into ordered
//! query pairs here. Every rule that can reject an argument runs before a
//! request exists, so invalid calls never reach the transport.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{ApiError, Result};

/// Most ids or screen names `users/lookup` accepts in one call.
pub const MAX_LOOKUP_BATCH: usize = 100;

/// RFC 3986 unreserved characters stay literal in path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) type Query = Vec<(String, String)>;

/// A user addressed either by numeric id or by screen name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(i64),
    ScreenName(String),
}

impl UserRef {
    pub fn id(id: i64) -> Self {
        UserRef::Id(id)
    }

    pub fn screen_name(name: impl Into<String>) -> Self {
        UserRef::ScreenName(name.into())
    }

    /// Build from optional inputs; exactly one must be present.
    pub fn from_parts(id: Option<i64>, screen_name: Option<&str>) -> Result<Self> {
        match (id, screen_name) {
            (Some(id), None) => Ok(UserRef::Id(id)),
            (None, Some(name)) => Ok(UserRef::screen_name(name)),
            (Some(_), Some(_)) => Err(ApiError::invalid(
                "supply either a user id or a screen name, not both",
            )),
            (None, None) => Err(ApiError::invalid("a user id or a screen name is required")),
        }
    }

    /// The single `user_id` / `screen_name` pair for this reference.
    pub fn to_param(&self) -> Result<(String, String)> {
        match self {
            UserRef::Id(id) => Ok(("user_id".to_string(), positive_id(*id, "user id")?.to_string())),
            UserRef::ScreenName(name) => Ok(("screen_name".to_string(), clean_screen_name(name)?)),
        }
    }
}

impl From<i64> for UserRef {
    fn from(id: i64) -> Self {
        UserRef::Id(id)
    }
}

impl From<&str> for UserRef {
    fn from(name: &str) -> Self {
        UserRef::screen_name(name)
    }
}

/// A batch of users for `users/lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Ids(Vec<i64>),
    ScreenNames(Vec<String>),
}

impl UserLookup {
    pub fn ids(ids: impl IntoIterator<Item = i64>) -> Self {
        UserLookup::Ids(ids.into_iter().collect())
    }

    pub fn screen_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        UserLookup::ScreenNames(names.into_iter().map(Into::into).collect())
    }

    fn len(&self) -> usize {
        match self {
            UserLookup::Ids(ids) => ids.len(),
            UserLookup::ScreenNames(names) => names.len(),
        }
    }

    /// One comma-joined pair, never repeated parameters.
    pub fn to_param(&self) -> Result<(String, String)> {
        match self.len() {
            0 => return Err(ApiError::invalid("lookup needs at least one user")),
            n if n > MAX_LOOKUP_BATCH => {
                return Err(ApiError::invalid(format!(
                    "lookup accepts at most {MAX_LOOKUP_BATCH} users, got {n}"
                )))
            }
            _ => {}
        }
        match self {
            UserLookup::Ids(ids) => {
                let joined = ids
                    .iter()
                    .map(|id| positive_id(*id, "user id").map(|id| id.to_string()))
                    .collect::<Result<Vec<_>>>()?
                    .join(",");
                Ok(("user_id".to_string(), joined))
            }
            UserLookup::ScreenNames(names) => {
                let joined = names
                    .iter()
                    .map(|name| clean_screen_name(name))
                    .collect::<Result<Vec<_>>>()?
                    .join(",");
                Ok(("screen_name".to_string(), joined))
            }
        }
    }
}

/// Position in a cursor-paginated collection.
///
/// `-1` is the start of the collection; `0` is never sent because the
/// service uses it to mean "no page in that direction".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(i64);

impl Cursor {
    pub const START: Cursor = Cursor(-1);

    /// Wrap a raw cursor taken from a response; `0` has no page behind it.
    pub fn new(value: i64) -> Option<Self> {
        (value != 0).then_some(Cursor(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_start(self) -> bool {
        self == Cursor::START
    }

    pub(crate) fn to_param(self) -> (String, String) {
        ("cursor".to_string(), self.0.to_string())
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::START
    }
}

/// Optional id range for timelines and search.
///
/// Values at or below zero mean "unbounded" and are left out of the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdBounds {
    pub since_id: i64,
    pub max_id: i64,
}

impl IdBounds {
    pub fn since(since_id: i64) -> Self {
        Self { since_id, max_id: 0 }
    }

    pub fn until(max_id: i64) -> Self {
        Self { since_id: 0, max_id }
    }

    pub fn between(since_id: i64, max_id: i64) -> Self {
        Self { since_id, max_id }
    }

    pub(crate) fn append_to(self, query: &mut Query) {
        if self.since_id > 0 {
            query.push(("since_id".to_string(), self.since_id.to_string()));
        }
        if self.max_id > 0 {
            query.push(("max_id".to_string(), self.max_id.to_string()));
        }
    }
}

/// Join a base URL and an endpoint path.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{base}/{path}")
}

/// Percent-encode a caller-supplied path segment.
pub(crate) fn path_segment(raw: &str, what: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::invalid(format!("{what} must not be blank")));
    }
    Ok(utf8_percent_encode(raw, PATH_SEGMENT).to_string())
}

pub(crate) fn positive_id(id: i64, what: &str) -> Result<i64> {
    if id <= 0 {
        return Err(ApiError::invalid(format!("{what} must be positive, got {id}")));
    }
    Ok(id)
}

pub(crate) fn required_text(text: &str, what: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(ApiError::invalid(format!("{what} must not be blank")));
    }
    Ok(text.to_string())
}

fn clean_screen_name(name: &str) -> Result<String> {
    let name = name.trim();
    let name = name.strip_prefix('@').unwrap_or(name);
    if name.is_empty() {
        return Err(ApiError::invalid("screen name must not be blank"));
    }
    Ok(name.to_string())
}
