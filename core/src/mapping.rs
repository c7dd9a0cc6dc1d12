//! Untyped JSON → domain records.
//!
//! # Design
//! Bodies are parsed into `serde_json::Value` and read through `Fields`,
//! where every accessor names the shape it expects and what absence means:
//! text defaults to `""`, counts to `0`, flags to `false`, timestamps to
//! `None`. Ids are the exception. They are required, read as `i64` straight
//! from the JSON number or a decimal string, and never pass through `f64`.
//!
//! All mappers are pure and preserve input order.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::pagination::{CursoredList, SearchResults};
use crate::types::{Profile, StatusUpdate, SuggestionCategory};

/// `created_at` in search results: `Thu, 24 Feb 2011 18:50:08 +0000`.
pub const SEARCH_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// `created_at` in REST payloads: `Thu Feb 24 18:50:08 +0000 2011`.
pub const TIMELINE_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a 2xx body; anything that is not JSON is malformed.
pub fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| ApiError::malformed(format!("body is not JSON: {e}")))
}

/// Read-only view over one JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    what: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value, what: &'static str) -> Result<Self> {
        value
            .as_object()
            .map(|map| Fields { what, map })
            .ok_or_else(|| ApiError::malformed(format!("expected {what} object, got {}", shape(value))))
    }

    /// Present and not null.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Like `text`, but absent stays absent.
    pub fn optional_text(&self, key: &str) -> Option<String> {
        self.get(key).map(|_| self.text(key))
    }

    pub fn count(&self, key: &str) -> i64 {
        self.get(key).and_then(|value| as_i64(value).ok()).unwrap_or(0)
    }

    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    pub fn id(&self, key: &str) -> Result<i64> {
        let value = self
            .get(key)
            .ok_or_else(|| ApiError::malformed(format!("{} is missing `{key}`", self.what)))?;
        as_i64(value).map_err(|reason| ApiError::malformed(format!("{}.{key}: {reason}", self.what)))
    }

    /// Mapped only when the key is present; absence is not the same as 0.
    pub fn optional_id(&self, key: &str) -> Result<Option<i64>> {
        if self.has(key) {
            self.id(key).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn timestamp(&self, key: &str, format: &str) -> Option<DateTime<FixedOffset>> {
        match self.get(key) {
            Some(Value::String(s)) => DateTime::parse_from_str(s.trim(), format).ok(),
            _ => None,
        }
    }

    pub fn array(&self, key: &str) -> Result<&'a Vec<Value>> {
        match self.get(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ApiError::malformed(format!(
                "{}.{key}: expected array, got {}",
                self.what,
                shape(other)
            ))),
            None => Err(ApiError::malformed(format!("{} is missing `{key}`", self.what))),
        }
    }

    pub fn object(&self, key: &str, what: &'static str) -> Option<Fields<'a>> {
        self.get(key).and_then(|value| Fields::of(value, what).ok())
    }
}

fn as_i64(value: &Value) -> std::result::Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("{n} is not a 64-bit signed integer")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("{s:?} is not a 64-bit signed integer")),
        other => Err(format!("expected integer, got {}", shape(other))),
    }
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn sequence<'a>(value: &'a Value, what: &'static str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| ApiError::malformed(format!("expected array of {what}, got {}", shape(value))))
}

fn map_each<T>(items: &[Value], mapper: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    items.iter().map(mapper).collect()
}

pub fn map_profile(value: &Value) -> Result<Profile> {
    let f = Fields::of(value, "profile")?;
    Ok(Profile {
        id: f.id("id")?,
        screen_name: f.text("screen_name"),
        name: f.text("name"),
        description: f.text("description"),
        location: f.text("location"),
        url: f.text("url"),
        profile_image_url: f.text("profile_image_url"),
        created_at: f.timestamp("created_at", TIMELINE_DATE_FORMAT),
        followers_count: f.count("followers_count"),
        friends_count: f.count("friends_count"),
        statuses_count: f.count("statuses_count"),
        protected: f.flag("protected"),
    })
}

pub fn map_profiles(value: &Value) -> Result<Vec<Profile>> {
    map_each(sequence(value, "profiles")?, map_profile)
}

/// One entry of a search envelope's `results`.
pub fn map_search_tweet(value: &Value) -> Result<StatusUpdate> {
    let f = Fields::of(value, "search result")?;
    Ok(StatusUpdate {
        id: f.id("id")?,
        text: f.text("text"),
        from_user: f.text("from_user"),
        from_user_id: f.count("from_user_id"),
        to_user_id: f.optional_id("to_user_id")?,
        in_reply_to_status_id: None,
        language_code: f.text("iso_language_code"),
        source: f.text("source"),
        profile_image_url: f.text("profile_image_url"),
        created_at: f.timestamp("created_at", SEARCH_DATE_FORMAT),
    })
}

/// A status as timelines and `statuses/*` endpoints return it, with the
/// author nested under `user`.
pub fn map_status(value: &Value) -> Result<StatusUpdate> {
    let f = Fields::of(value, "status")?;
    let author = f.object("user", "status author");
    Ok(StatusUpdate {
        id: f.id("id")?,
        text: f.text("text"),
        from_user: author.map(|a| a.text("screen_name")).unwrap_or_default(),
        from_user_id: author.map(|a| a.count("id")).unwrap_or(0),
        to_user_id: f.optional_id("in_reply_to_user_id")?,
        in_reply_to_status_id: f.optional_id("in_reply_to_status_id")?,
        language_code: f
            .optional_text("lang")
            .or_else(|| author.and_then(|a| a.optional_text("lang")))
            .unwrap_or_default(),
        source: f.text("source"),
        profile_image_url: author.map(|a| a.text("profile_image_url")).unwrap_or_default(),
        created_at: f.timestamp("created_at", TIMELINE_DATE_FORMAT),
    })
}

pub fn map_statuses(value: &Value) -> Result<Vec<StatusUpdate>> {
    map_each(sequence(value, "statuses")?, map_status)
}

/// The search envelope. `results` is required; `max_id` and `since_id`
/// default to 0.
pub fn map_search_results(value: &Value) -> Result<SearchResults> {
    let f = Fields::of(value, "search response")?;
    let tweets = map_each(f.array("results")?, map_search_tweet)?;
    Ok(SearchResults::new(
        tweets,
        f.count("max_id"),
        f.count("since_id"),
        f.optional_text("next_page"),
    ))
}

/// A cursor envelope holding its items under `key`. A bare array is taken
/// as a single page with nothing on either side.
pub fn map_cursored<T>(
    value: &Value,
    key: &str,
    mapper: impl Fn(&Value) -> Result<T>,
) -> Result<CursoredList<T>> {
    if let Value::Array(items) = value {
        return Ok(CursoredList::terminal(map_each(items, mapper)?));
    }
    let f = Fields::of(value, "cursored page")?;
    let items = map_each(f.array(key)?, mapper)?;
    Ok(CursoredList::new(
        items,
        f.count("previous_cursor"),
        f.count("next_cursor"),
    ))
}

pub fn map_id(value: &Value) -> Result<i64> {
    as_i64(value).map_err(|reason| ApiError::malformed(format!("id list entry: {reason}")))
}

pub fn map_id_page(value: &Value) -> Result<CursoredList<i64>> {
    map_cursored(value, "ids", map_id)
}

pub fn map_profile_page(value: &Value) -> Result<CursoredList<Profile>> {
    map_cursored(value, "users", map_profile)
}

pub fn map_suggestion_category(value: &Value) -> Result<SuggestionCategory> {
    let f = Fields::of(value, "suggestion category")?;
    Ok(SuggestionCategory {
        name: f.text("name"),
        slug: f.text("slug"),
        size: f.count("size"),
    })
}

pub fn map_suggestion_categories(value: &Value) -> Result<Vec<SuggestionCategory>> {
    map_each(sequence(value, "suggestion categories")?, map_suggestion_category)
}

/// Members of one suggestion category, found under `users`.
pub fn map_suggested_users(value: &Value) -> Result<Vec<Profile>> {
    if value.is_array() {
        return map_profiles(value);
    }
    let f = Fields::of(value, "suggestion category")?;
    map_each(f.array("users")?, map_profile)
}

/// Scalar boolean bodies such as `friendships/exists`. Only a bare `true` or
/// `false` (or the same word as a JSON string) is accepted.
pub fn map_boolean(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(ApiError::malformed(format!("expected boolean, got {}", shape(other)))),
    }
}
