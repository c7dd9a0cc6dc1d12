//! Profile lookups and suggestions.
//!
//! # Design
//! `profile_id`, `screen_name` and `user_profile` all read
//! `verify_credentials`, so each call reflects the account as it is now
//! rather than a value remembered at sign-in. Lookups batch at most 100
//! users and are checked locally before anything is sent.

use crate::client::TwitterClient;
use crate::error::Result;
use crate::http::{HttpRequest, Transport};
use crate::mapping::{map_profile, map_profiles, map_suggested_users, map_suggestion_categories};
use crate::request::{path_segment, required_text, UserLookup, UserRef};
use crate::types::{Profile, SuggestionCategory};

const VERIFY_CREDENTIALS: &str = "account/verify_credentials.json";

pub struct UserOperations<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<'a, T: Transport> UserOperations<'a, T> {
    pub(crate) fn new(client: &'a TwitterClient<T>) -> Self {
        Self { client }
    }

    /// Numeric id of the authenticated user.
    pub fn profile_id(&self) -> Result<i64> {
        self.user_profile().map(|profile| profile.id)
    }

    /// Screen name of the authenticated user, as the service reports it now.
    pub fn screen_name(&self) -> Result<String> {
        self.user_profile().map(|profile| profile.screen_name)
    }

    pub fn user_profile(&self) -> Result<Profile> {
        self.client.require_authorization("user profile")?;
        let value = self
            .client
            .fetch(HttpRequest::get(self.client.api_url(VERIFY_CREDENTIALS), Vec::new()))?;
        map_profile(&value)
    }

    pub fn user_profile_of(&self, user: &UserRef) -> Result<Profile> {
        let request = HttpRequest::get(self.client.api_url("users/show.json"), vec![user.to_param()?]);
        map_profile(&self.client.fetch(request)?)
    }

    /// Up to 100 profiles in one call, in the order the service returns them.
    pub fn lookup(&self, users: &UserLookup) -> Result<Vec<Profile>> {
        let request = HttpRequest::get(self.client.api_url("users/lookup.json"), vec![users.to_param()?]);
        map_profiles(&self.client.fetch(request)?)
    }

    pub fn search_users(&self, query: &str) -> Result<Vec<Profile>> {
        self.client.require_authorization("user search")?;
        let q = required_text(query, "user search query")?;
        let request = HttpRequest::get(self.client.api_url("users/search.json"), vec![("q".to_string(), q)]);
        map_profiles(&self.client.fetch(request)?)
    }

    pub fn suggestion_categories(&self) -> Result<Vec<SuggestionCategory>> {
        let request = HttpRequest::get(self.client.api_url("users/suggestions.json"), Vec::new());
        map_suggestion_categories(&self.client.fetch(request)?)
    }

    /// Suggested users in the category identified by `slug`.
    pub fn suggestions(&self, slug: &str) -> Result<Vec<Profile>> {
        let path = format!("users/suggestions/{}.json", path_segment(slug, "category slug")?);
        let request = HttpRequest::get(self.client.api_url(&path), Vec::new());
        map_suggested_users(&self.client.fetch(request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::*;
    use crate::error::{ApiError, ErrorKind};

    const VERIFIED: &str = r#"{
        "id": 161064614,
        "screen_name": "artnames",
        "name": "Art Names",
        "description": "I'm just a normal kinda guy",
        "location": "Denton, TX",
        "url": "http://www.springsource.org",
        "profile_image_url": "http://a1.twimg.com/sticky/default_profile_images/default_profile_4_normal.png"
    }"#;

    const TWO_PROFILES: &str = r#"[
        {"id": 14846645, "screen_name": "royclarkson"},
        {"id": 14718006, "screen_name": "kdonald"}
    ]"#;

    fn screen_names(profiles: &[Profile]) -> Vec<&str> {
        profiles.iter().map(|p| p.screen_name.as_str()).collect()
    }

    #[test]
    fn profile_id_and_screen_name_come_from_verify_credentials() {
        let stub = StubTransport::respond(200, VERIFIED);
        stub.push(200, VERIFIED);
        let c = client(&stub);
        assert_eq!(c.users().profile_id().unwrap(), 161064614);
        assert_eq!(c.users().screen_name().unwrap(), "artnames");
        assert_eq!(stub.last_url(), format!("{API}/account/verify_credentials.json"));
    }

    #[test]
    fn user_profile_maps_every_field() {
        let stub = StubTransport::respond(200, VERIFIED);
        let profile = client(&stub).users().user_profile().unwrap();
        assert_eq!(profile.name, "Art Names");
        assert_eq!(profile.location, "Denton, TX");
        assert_eq!(profile.url, "http://www.springsource.org");
    }

    #[test]
    fn user_profile_of_id() {
        let stub = StubTransport::respond(200, r#"{"id":12345,"screen_name":"habuma","name":"Craig Walls"}"#);
        let profile = client(&stub).users().user_profile_of(&UserRef::id(12345)).unwrap();
        assert_eq!(stub.last_url(), format!("{API}/users/show.json?user_id=12345"));
        assert_eq!(profile.name, "Craig Walls");
    }

    #[test]
    fn lookup_by_ids_and_names_is_comma_joined() {
        let stub = StubTransport::respond(200, TWO_PROFILES);
        stub.push(200, TWO_PROFILES);
        let c = client(&stub);
        let users = c.users().lookup(&UserLookup::ids([14846645, 14718006])).unwrap();
        assert_eq!(screen_names(&users), vec!["royclarkson", "kdonald"]);
        c.users().lookup(&UserLookup::screen_names(["royclarkson", "kdonald"])).unwrap();
        let urls: Vec<String> = stub.requests().iter().map(HttpRequest::full_url).collect();
        assert_eq!(
            urls,
            vec![
                format!("{API}/users/lookup.json?user_id=14846645%2C14718006"),
                format!("{API}/users/lookup.json?screen_name=royclarkson%2Ckdonald"),
            ]
        );
    }

    #[test]
    fn search_users_encodes_query() {
        let stub = StubTransport::respond(200, TWO_PROFILES);
        let users = client(&stub).users().search_users("some query").unwrap();
        assert_eq!(stub.last_url(), format!("{API}/users/search.json?q=some+query"));
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn suggestion_categories_in_order() {
        let stub = StubTransport::respond(
            200,
            r#"[
                {"name":"Art & Design","slug":"art-design","size":56},
                {"name":"Books","slug":"books","size":72},
                {"name":"Business","slug":"business","size":65},
                {"name":"Twitter","slug":"twitter","size":16}
            ]"#,
        );
        let categories = client(&stub).users().suggestion_categories().unwrap();
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[2].slug, "business");
        assert_eq!(categories[3].size, 16);
    }

    #[test]
    fn suggestions_for_slug() {
        let stub = StubTransport::respond(200, &format!(r#"{{"name":"SpringSource","slug":"springsource","users":{TWO_PROFILES}}}"#));
        let users = client(&stub).users().suggestions("springsource").unwrap();
        assert_eq!(stub.last_url(), format!("{API}/users/suggestions/springsource.json"));
        assert_eq!(screen_names(&users), vec!["royclarkson", "kdonald"]);
    }

    #[test]
    fn local_validation_runs_first() {
        let stub = StubTransport::default();
        let c = client(&stub);
        assert_eq!(c.users().suggestions("").unwrap_err().kind(), ErrorKind::InvalidRequest);
        assert_eq!(c.users().lookup(&UserLookup::ids([])).unwrap_err().kind(), ErrorKind::InvalidRequest);
        assert_eq!(c.users().search_users(" ").unwrap_err().kind(), ErrorKind::InvalidRequest);
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn unauthorized_client_refuses_current_user_calls() {
        let stub = StubTransport::default();
        let c = anonymous(&stub);
        assert!(matches!(c.users().profile_id(), Err(ApiError::NotAuthorized { .. })));
        assert!(matches!(c.users().screen_name(), Err(ApiError::NotAuthorized { .. })));
        assert!(matches!(c.users().search_users("x"), Err(ApiError::NotAuthorized { .. })));
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn expired_credentials_are_authentication_failures() {
        let stub = StubTransport::respond(401, r#"{"error":"Could not authenticate you."}"#);
        let err = client(&stub).users().user_profile().unwrap_err();
        assert_eq!(err, ApiError::AuthenticationFailed);
    }
}
