//! Check request building, error classification and search continuation
//! against the JSON vectors stored in `test-vectors/`.
//!
//! Operations run against a recording transport that answers every request
//! with `{}`; only the request the core produced is compared, so mapping
//! failures on that canned body are ignored.

use std::cell::RefCell;

use serde_json::Value;
use twitter_core::classify::{check_status, classify};
use twitter_core::mapping::map_search_results;
use twitter_core::{
    ClientConfig, Cursor, ErrorKind, HttpMethod, HttpRequest, HttpResponse, IdBounds, SearchParams, StatusDetails,
    Transport, TransportError, TwitterClient, UserLookup, UserRef,
};

const API_BASE: &str = "https://api.twitter.com/1";
const SEARCH_BASE: &str = "https://search.twitter.com";

#[derive(Default)]
struct Recorder {
    requests: RefCell<Vec<HttpRequest>>,
}

impl Transport for Recorder {
    fn issue(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(HttpResponse::new(200, "{}"))
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn user(args: &Value) -> twitter_core::Result<UserRef> {
    UserRef::from_parts(args["user_id"].as_i64(), args["screen_name"].as_str())
}

fn cursor(args: &Value) -> Cursor {
    args["cursor"].as_i64().and_then(Cursor::new).unwrap_or_default()
}

fn bounds(args: &Value) -> IdBounds {
    IdBounds::between(
        args["since_id"].as_i64().unwrap_or(0),
        args["max_id"].as_i64().unwrap_or(0),
    )
}

fn search_params(args: &Value) -> SearchParams {
    let page = args["page"].as_i64().unwrap_or(1) as i32;
    let rpp = args["rpp"].as_i64().unwrap_or(50) as i32;
    SearchParams::new(args["q"].as_str().unwrap_or_default())
        .page(page, rpp)
        .bounded(bounds(args))
}

fn lookup(args: &Value) -> UserLookup {
    match args["ids"].as_array() {
        Some(ids) => UserLookup::ids(ids.iter().filter_map(Value::as_i64)),
        None => UserLookup::screen_names(
            args["screen_names"]
                .as_array()
                .unwrap()
                .iter()
                .filter_map(Value::as_str),
        ),
    }
}

fn details(args: &Value) -> StatusDetails {
    let mut details = match (args["latitude"].as_f64(), args["longitude"].as_f64()) {
        (Some(lat), Some(long)) => StatusDetails::at_location(lat, long),
        _ => StatusDetails::default(),
    };
    if args["display_coordinates"].as_bool() == Some(true) {
        details = details.displaying_coordinates();
    }
    details.in_reply_to_status_id = args["in_reply_to"].as_i64();
    details
}

/// Run the named operation, discarding whatever it maps.
fn run(client: &TwitterClient<&Recorder>, operation: &str, args: &Value) -> twitter_core::Result<()> {
    let text = |key: &str| args[key].as_str().unwrap_or_default().to_string();
    match operation {
        "users.user_profile" => client.users().user_profile().map(drop),
        "users.user_profile_of" => client.users().user_profile_of(&user(args)?).map(drop),
        "users.lookup" => client.users().lookup(&lookup(args)).map(drop),
        "users.search_users" => client.users().search_users(&text("q")).map(drop),
        "users.suggestion_categories" => client.users().suggestion_categories().map(drop),
        "users.suggestions" => client.users().suggestions(&text("slug")).map(drop),
        "friends.friends" => client.friends().friends(cursor(args)).map(drop),
        "friends.followers_of" => client.friends().followers_of(&user(args)?, cursor(args)).map(drop),
        "friends.friend_ids_of" => client.friends().friend_ids_of(&user(args)?, cursor(args)).map(drop),
        "friends.follower_ids" => client.friends().follower_ids(cursor(args)).map(drop),
        "friends.follow" => client.friends().follow(&user(args)?).map(drop),
        "friends.unfollow" => client.friends().unfollow(&user(args)?).map(drop),
        "friends.enable_notifications" => client.friends().enable_notifications(&user(args)?).map(drop),
        "friends.disable_notifications" => client.friends().disable_notifications(&user(args)?).map(drop),
        "friends.friendship_exists" => client
            .friends()
            .friendship_exists(&text("user_a"), &text("user_b"))
            .map(drop),
        "friends.incoming_friendships" => client.friends().incoming_friendships(cursor(args)).map(drop),
        "friends.outgoing_friendships" => client.friends().outgoing_friendships(cursor(args)).map(drop),
        "timeline.home_timeline" => client.timeline().home_timeline(bounds(args)).map(drop),
        "timeline.user_timeline" => client.timeline().user_timeline(&user(args)?, bounds(args)).map(drop),
        "timeline.update_status" => client
            .timeline()
            .update_status_with(&text("text"), &details(args))
            .map(drop),
        "timeline.retweet" => client.timeline().retweet(args["id"].as_i64().unwrap()).map(drop),
        "search.search_with" => client.search().search_with(&search_params(args)).map(drop),
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let recorder = Recorder::default();
        let client = TwitterClient::new(&recorder, ClientConfig::default());

        // The canned `{}` body may not map; only the request matters here.
        let _ = run(&client, case["operation"].as_str().unwrap(), &case["args"]);

        let requests = recorder.requests.borrow();
        assert_eq!(requests.len(), 1, "{name}: request count");
        let request = &requests[0];
        assert_eq!(request.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");

        let base = match expected["base"].as_str().unwrap() {
            "api" => API_BASE,
            "search" => SEARCH_BASE,
            other => panic!("{name}: unknown base {other}"),
        };
        assert_eq!(
            request.full_url(),
            format!("{base}{}", expected["url"].as_str().unwrap()),
            "{name}: url"
        );
        assert_eq!(request.body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}

#[test]
fn invalid_request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["invalid"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let recorder = Recorder::default();
        let client = TwitterClient::new(&recorder, ClientConfig::default());

        let err = run(&client, case["operation"].as_str().unwrap(), &case["args"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{name}: kind");
        assert!(recorder.requests.borrow().is_empty(), "{name}: nothing sent");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let body = case["body"].as_str().unwrap();

        let err = classify(status, body);
        assert_eq!(format!("{:?}", err.kind()), case["kind"].as_str().unwrap(), "{name}: kind");
        if let Some(display) = case["display"].as_str() {
            assert_eq!(err.to_string(), display, "{name}: display");
        }

        let checked = check_status(HttpResponse::new(status, body)).unwrap_err();
        assert_eq!(checked, err, "{name}: check_status agrees with classify");
    }
}

// ---------------------------------------------------------------------------
// Search continuation
// ---------------------------------------------------------------------------

#[test]
fn pagination_vectors() {
    let raw = include_str!("../../test-vectors/pagination.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = search_params(&case["params"]);
        let results = map_search_results(&case["response"]).unwrap();

        match (params.next_page(&results), case["next"].as_str()) {
            (None, None) => {}
            (Some(next), Some(expected)) => {
                let recorder = Recorder::default();
                let client = TwitterClient::new(&recorder, ClientConfig::default());
                let _ = client.search().search_with(&next);
                let url = recorder.requests.borrow()[0].full_url();
                assert_eq!(url, format!("{SEARCH_BASE}/search.json?{expected}"), "{name}: next query");
            }
            (got, expected) => panic!("{name}: expected {expected:?}, got {got:?}"),
        }
    }
}
