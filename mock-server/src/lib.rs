//! In-memory stand-in for the Twitter REST and search endpoints the core
//! client talks to. Seeded with a small social graph; writes persist for the
//! lifetime of the router's state.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use fixtures::{Db, Failure, Status, User, CURRENT_USER_ID};

pub type SharedDb = Arc<RwLock<Db>>;

type Params = HashMap<String, String>;
type ApiReply = Result<Json<Value>, ApiFailure>;

pub const CURSOR_PAGE_SIZE: usize = 2;
pub const DEFAULT_RESULTS_PER_PAGE: i64 = 15;
pub const MAX_LOOKUP_BATCH: usize = 100;
pub const MAX_STATUS_CHARS: usize = 140;
const TIMELINE_LIMIT: usize = 20;

/// Error reply in the `{"error": "..."}` envelope.
#[derive(Debug, PartialEq)]
pub struct ApiFailure(pub StatusCode, pub String);

impl ApiFailure {
    fn bad_request(message: &str) -> Self {
        Self(StatusCode::BAD_REQUEST, message.to_string())
    }

    fn forbidden(message: &str) -> Self {
        Self(StatusCode::FORBIDDEN, message.to_string())
    }

    fn not_found() -> Self {
        Self(StatusCode::NOT_FOUND, "Not found".to_string())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(Db::seeded())))
}

pub fn app_with(db: SharedDb) -> Router {
    Router::new()
        .route("/1/account/verify_credentials.json", get(verify_credentials))
        .route("/1/users/show.json", get(show_user))
        .route("/1/users/lookup.json", get(lookup_users))
        .route("/1/users/search.json", get(search_users))
        .route("/1/users/suggestions.json", get(suggestion_categories))
        .route("/1/users/suggestions/{file}", get(suggested_users))
        .route("/1/statuses/friends.json", get(friends))
        .route("/1/statuses/followers.json", get(followers))
        .route("/1/friends/ids.json", get(friend_ids))
        .route("/1/followers/ids.json", get(follower_ids))
        .route("/1/friendships/create.json", post(follow))
        .route("/1/friendships/destroy.json", post(unfollow))
        .route("/1/friendships/exists.json", get(friendship_exists))
        .route("/1/friendships/incoming.json", get(incoming))
        .route("/1/friendships/outgoing.json", get(outgoing))
        .route("/1/notifications/follow.json", post(notifications_on))
        .route("/1/notifications/leave.json", post(notifications_off))
        .route("/1/statuses/home_timeline.json", get(home_timeline))
        .route("/1/statuses/user_timeline.json", get(user_timeline))
        .route("/1/statuses/update.json", post(update_status))
        .route("/1/statuses/retweet/{file}", post(retweet))
        .route("/search.json", get(search))
        .route("/__admin/fail", post(inject_next_failure))
        .layer(middleware::from_fn_with_state(db.clone(), fail_injected))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn fail_injected(State(db): State<SharedDb>, request: Request, next: Next) -> Response {
    if request.uri().path() != "/__admin/fail" {
        if let Some(failure) = db.write().await.fail_next.take() {
            tracing::warn!(path = %request.uri().path(), status = failure.status, "serving injected failure");
            let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, failure.body).into_response();
        }
    }
    next.run(request).await
}

async fn inject_next_failure(State(db): State<SharedDb>, Json(failure): Json<Failure>) -> StatusCode {
    db.write().await.fail_next = Some(failure);
    StatusCode::NO_CONTENT
}

// --- request helpers ---

fn require_auth(headers: &HeaderMap) -> Result<(), ApiFailure> {
    if headers.contains_key(header::AUTHORIZATION) {
        Ok(())
    } else {
        Err(ApiFailure(StatusCode::UNAUTHORIZED, "Could not authenticate you.".to_string()))
    }
}

fn int_param(params: &Params, name: &str) -> Result<Option<i64>, ApiFailure> {
    match params.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiFailure::bad_request(&format!("{name} must be an integer"))),
    }
}

/// The user named by `user_id` or `screen_name`, if either is present.
fn named_user(db: &Db, params: &Params) -> Result<Option<User>, ApiFailure> {
    let id = int_param(params, "user_id")?;
    match (id, params.get("screen_name")) {
        (Some(_), Some(_)) => Err(ApiFailure::bad_request("Specify either user_id or screen_name, not both")),
        (Some(id), None) => db.user_by_id(id).cloned().map(Some).ok_or_else(ApiFailure::not_found),
        (None, Some(name)) => db.user_by_name(name).cloned().map(Some).ok_or_else(ApiFailure::not_found),
        (None, None) => Ok(None),
    }
}

fn required_user(db: &Db, params: &Params) -> Result<User, ApiFailure> {
    named_user(db, params)?.ok_or_else(|| ApiFailure::bad_request("Specify a user_id or screen_name"))
}

/// Named user, or the authenticated user when none is named.
fn subject(db: &Db, headers: &HeaderMap, params: &Params) -> Result<i64, ApiFailure> {
    match named_user(db, params)? {
        Some(user) => Ok(user.id),
        None => {
            require_auth(headers)?;
            Ok(CURRENT_USER_ID)
        }
    }
}

/// Slice bounds plus `(previous, next)` cursors for a page starting at
/// `cursor`. Positive cursors are start offsets; negative ones point back at
/// the page that ends there.
pub fn cursor_window(total: usize, cursor: i64) -> (usize, usize, i64, i64) {
    let size = CURSOR_PAGE_SIZE as i64;
    let start = if cursor > 0 { cursor } else { cursor.saturating_neg().saturating_sub(size).max(0) };
    let start = usize::try_from(start).unwrap_or(usize::MAX).min(total);
    let end = (start + CURSOR_PAGE_SIZE).min(total);
    let next = if end < total { end as i64 } else { 0 };
    let previous = if start > 0 { -(start as i64) } else { 0 };
    (start, end, previous, next)
}

fn cursored(params: &Params, items: Vec<Value>, key: &str) -> ApiReply {
    let Some(cursor) = int_param(params, "cursor")? else {
        return Ok(Json(Value::Array(items)));
    };
    let (start, end, previous, next) = cursor_window(items.len(), cursor);
    Ok(Json(json!({
        key: items[start..end].to_vec(),
        "previous_cursor": previous,
        "next_cursor": next,
    })))
}

fn profile_page(db: &Db, ids: &[i64], params: &Params) -> ApiReply {
    cursored(params, db.profiles(ids), "users")
}

fn id_page(ids: &[i64], params: &Params) -> ApiReply {
    cursored(params, ids.iter().map(|id| json!(id)).collect(), "ids")
}

fn strip_json(file: &str) -> Result<&str, ApiFailure> {
    file.strip_suffix(".json").ok_or_else(ApiFailure::not_found)
}

fn within_bounds(status: &Status, params: &Params) -> Result<bool, ApiFailure> {
    let since = int_param(params, "since_id")?.unwrap_or(0);
    let max = int_param(params, "max_id")?.unwrap_or(0);
    Ok(status.id > since && (max <= 0 || status.id <= max))
}

fn timeline(db: &Db, params: &Params, authors: &[i64]) -> ApiReply {
    let mut statuses = Vec::new();
    for status in db.statuses.iter().filter(|s| authors.contains(&s.author_id)) {
        if within_bounds(status, params)? {
            statuses.push(status);
        }
    }
    statuses.sort_by(|a, b| b.id.cmp(&a.id));
    let body = statuses
        .into_iter()
        .take(TIMELINE_LIMIT)
        .map(|s| db.status_json(s))
        .collect();
    Ok(Json(Value::Array(body)))
}

/// Minimal escaping for the `next_page` token's query echo.
fn echo_query(q: &str) -> String {
    q.replace('%', "%25").replace('#', "%23").replace('&', "%26").replace(' ', "+")
}

// --- users ---

async fn verify_credentials(State(db): State<SharedDb>, headers: HeaderMap) -> ApiReply {
    require_auth(&headers)?;
    let db = db.read().await;
    let current = db.user_by_id(CURRENT_USER_ID).ok_or_else(ApiFailure::not_found)?;
    Ok(Json(db.profile(current)))
}

async fn show_user(State(db): State<SharedDb>, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    let user = required_user(&db, &params)?;
    Ok(Json(db.profile(&user)))
}

async fn lookup_users(State(db): State<SharedDb>, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    let found: Vec<&User> = match (params.get("user_id"), params.get("screen_name")) {
        (Some(ids), None) => {
            let ids = ids
                .split(',')
                .map(|id| id.trim().parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ApiFailure::bad_request("user_id must be a list of integers"))?;
            if ids.len() > MAX_LOOKUP_BATCH {
                return Err(ApiFailure::forbidden("Too many terms specified in query."));
            }
            ids.iter().filter_map(|id| db.user_by_id(*id)).collect()
        }
        (None, Some(names)) => {
            let names: Vec<&str> = names.split(',').map(str::trim).collect();
            if names.len() > MAX_LOOKUP_BATCH {
                return Err(ApiFailure::forbidden("Too many terms specified in query."));
            }
            names.iter().filter_map(|name| db.user_by_name(name)).collect()
        }
        _ => return Err(ApiFailure::bad_request("Specify either user_id or screen_name")),
    };
    if found.is_empty() {
        return Err(ApiFailure(
            StatusCode::NOT_FOUND,
            "No user matches for specified terms.".to_string(),
        ));
    }
    Ok(Json(Value::Array(found.into_iter().map(|u| db.profile(u)).collect())))
}

async fn search_users(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> ApiReply {
    require_auth(&headers)?;
    let q = params
        .get("q")
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiFailure::bad_request("q is required"))?;
    let db = db.read().await;
    let matches = db
        .users
        .iter()
        .filter(|u| u.screen_name.to_lowercase().contains(&q) || u.name.to_lowercase().contains(&q))
        .map(|u| db.profile(u))
        .collect();
    Ok(Json(Value::Array(matches)))
}

async fn suggestion_categories(State(db): State<SharedDb>) -> Json<Value> {
    let db = db.read().await;
    let categories = db
        .categories
        .iter()
        .map(|c| json!({ "name": c.name, "slug": c.slug, "size": c.members.len() }))
        .collect();
    Json(Value::Array(categories))
}

async fn suggested_users(State(db): State<SharedDb>, Path(file): Path<String>) -> ApiReply {
    let slug = strip_json(&file)?;
    let db = db.read().await;
    let category = db
        .categories
        .iter()
        .find(|c| c.slug == slug)
        .ok_or_else(ApiFailure::not_found)?;
    Ok(Json(json!({
        "name": category.name,
        "slug": category.slug,
        "users": db.profiles(&category.members),
    })))
}

// --- friends and followers ---

async fn friends(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    let ids = db.friend_ids(subject(&db, &headers, &params)?);
    profile_page(&db, &ids, &params)
}

async fn followers(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    let ids = db.follower_ids(subject(&db, &headers, &params)?);
    profile_page(&db, &ids, &params)
}

async fn friend_ids(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    id_page(&db.friend_ids(subject(&db, &headers, &params)?), &params)
}

async fn follower_ids(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    id_page(&db.follower_ids(subject(&db, &headers, &params)?), &params)
}

async fn follow(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let mut db = db.write().await;
    let target = required_user(&db, &params)?;
    if target.id == CURRENT_USER_ID {
        return Err(ApiFailure::forbidden("You can't follow yourself."));
    }
    if db.follows(CURRENT_USER_ID, target.id) {
        return Err(ApiFailure::forbidden(&format!(
            "Could not follow user: {} is already on your list.",
            target.screen_name
        )));
    }
    db.follows.push((CURRENT_USER_ID, target.id));
    tracing::info!(user = %target.screen_name, "followed");
    Ok(Json(db.profile(&target)))
}

async fn unfollow(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let mut db = db.write().await;
    let target = required_user(&db, &params)?;
    if !db.follows(CURRENT_USER_ID, target.id) {
        return Err(ApiFailure::forbidden("You are not friends with the specified user."));
    }
    db.follows.retain(|edge| *edge != (CURRENT_USER_ID, target.id));
    db.notifications.retain(|id| *id != target.id);
    tracing::info!(user = %target.screen_name, "unfollowed");
    Ok(Json(db.profile(&target)))
}

async fn notifications_on(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let mut db = db.write().await;
    let target = required_user(&db, &params)?;
    if !db.follows(CURRENT_USER_ID, target.id) {
        return Err(ApiFailure::forbidden("You are not friends with the specified user."));
    }
    if !db.notifications.contains(&target.id) {
        db.notifications.push(target.id);
    }
    Ok(Json(db.profile(&target)))
}

async fn notifications_off(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let mut db = db.write().await;
    let target = required_user(&db, &params)?;
    db.notifications.retain(|id| *id != target.id);
    Ok(Json(db.profile(&target)))
}

async fn friendship_exists(State(db): State<SharedDb>, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    let resolve = |key: &str| -> Result<i64, ApiFailure> {
        let raw = params
            .get(key)
            .ok_or_else(|| ApiFailure::bad_request(&format!("{key} is required")))?;
        let user = match raw.parse::<i64>() {
            Ok(id) => db.user_by_id(id),
            Err(_) => db.user_by_name(raw),
        };
        user.map(|u| u.id).ok_or_else(ApiFailure::not_found)
    };
    let (a, b) = (resolve("user_a")?, resolve("user_b")?);
    Ok(Json(Value::Bool(db.follows(a, b))))
}

async fn incoming(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let db = db.read().await;
    id_page(&db.incoming, &params)
}

async fn outgoing(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let db = db.read().await;
    id_page(&db.outgoing, &params)
}

// --- timelines ---

async fn home_timeline(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    require_auth(&headers)?;
    let db = db.read().await;
    let mut authors = db.friend_ids(CURRENT_USER_ID);
    authors.push(CURRENT_USER_ID);
    timeline(&db, &params, &authors)
}

async fn user_timeline(State(db): State<SharedDb>, headers: HeaderMap, Query(params): Query<Params>) -> ApiReply {
    let db = db.read().await;
    let author = subject(&db, &headers, &params)?;
    timeline(&db, &params, &[author])
}

async fn update_status(State(db): State<SharedDb>, headers: HeaderMap, Form(form): Form<Params>) -> ApiReply {
    require_auth(&headers)?;
    let text = form.get("status").map(|s| s.trim()).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiFailure::forbidden("Status text is required."));
    }
    if text.chars().count() > MAX_STATUS_CHARS {
        return Err(ApiFailure::forbidden("Status is over 140 characters."));
    }
    let mut db = db.write().await;
    if db
        .statuses
        .iter()
        .any(|s| s.author_id == CURRENT_USER_ID && s.text == text)
    {
        return Err(ApiFailure::forbidden("Status is a duplicate."));
    }
    let reply_to = int_param(&form, "in_reply_to_status_id")?
        .and_then(|id| db.statuses.iter().find(|s| s.id == id))
        .map(|s| (s.id, s.author_id));
    let status = Status {
        id: db.next_status_id,
        author_id: CURRENT_USER_ID,
        text: text.to_string(),
        in_reply_to_user_id: reply_to.map(|(_, author)| author),
        in_reply_to_status_id: reply_to.map(|(id, _)| id),
    };
    db.next_status_id += 1;
    tracing::info!(id = status.id, "status posted");
    let body = db.status_json(&status);
    db.statuses.push(status);
    Ok(Json(body))
}

async fn retweet(State(db): State<SharedDb>, headers: HeaderMap, Path(file): Path<String>) -> ApiReply {
    require_auth(&headers)?;
    let id: i64 = strip_json(&file)?.parse().map_err(|_| ApiFailure::not_found())?;
    let mut db = db.write().await;
    let original = db
        .statuses
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or_else(ApiFailure::not_found)?;
    let author = db
        .user_by_id(original.author_id)
        .map(|u| u.screen_name.clone())
        .unwrap_or_default();
    let status = Status {
        id: db.next_status_id,
        author_id: CURRENT_USER_ID,
        text: format!("RT @{author}: {}", original.text),
        in_reply_to_user_id: None,
        in_reply_to_status_id: None,
    };
    db.next_status_id += 1;
    let body = db.status_json(&status);
    db.statuses.push(status);
    Ok(Json(body))
}

// --- search ---

async fn search(State(db): State<SharedDb>, Query(params): Query<Params>) -> ApiReply {
    let q = params
        .get("q")
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiFailure::forbidden("q is required"))?;
    let rpp = int_param(&params, "rpp")?.unwrap_or(DEFAULT_RESULTS_PER_PAGE);
    let page = int_param(&params, "page")?.unwrap_or(1);
    if rpp <= 0 || page <= 0 {
        return Err(ApiFailure::forbidden("page and rpp must be positive"));
    }
    let since = int_param(&params, "since_id")?.unwrap_or(0);
    let max = int_param(&params, "max_id")?.unwrap_or(0);

    let db = db.read().await;
    let needle = q.to_lowercase();
    let mut hits = Vec::new();
    for status in db.statuses.iter().filter(|s| s.text.to_lowercase().contains(&needle)) {
        if within_bounds(status, &params)? {
            hits.push(status);
        }
    }
    hits.sort_by(|a, b| b.id.cmp(&a.id));

    let pinned_max = if max > 0 { max } else { hits.first().map_or(0, |s| s.id) };
    let per_page = usize::try_from(rpp).unwrap_or(usize::MAX);
    let offset = usize::try_from((page - 1).saturating_mul(rpp)).unwrap_or(usize::MAX);
    let results: Vec<Value> = hits
        .iter()
        .skip(offset)
        .take(per_page)
        .map(|s| db.search_json(s))
        .collect();

    let mut body = json!({
        "results": results,
        "max_id": pinned_max,
        "since_id": since,
        "page": page,
        "results_per_page": rpp,
        "query": q,
    });
    if offset.saturating_add(per_page) < hits.len() {
        body["next_page"] = json!(format!(
            "?page={}&max_id={}&rpp={}&q={}",
            page + 1,
            pinned_max,
            rpp,
            echo_query(&q)
        ));
    }
    Ok(Json(body))
}
