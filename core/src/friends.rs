//! Friend and follower graph operations.
//!
//! # Design
//! Calls about the current user need credentials and check them before
//! building a request. The `*_of` variants name their subject with a
//! `UserRef`, so the service can answer without knowing who is asking.
//! Every listing, incoming and outgoing included, sends `cursor` (`-1` for
//! the first page) so the reply always carries cursors and lands in a
//! `CursoredList`. Effecting calls go out as query-string POSTs and return
//! the profile the service confirms.

use crate::client::TwitterClient;
use crate::error::Result;
use crate::http::{HttpRequest, Transport};
use crate::mapping::{map_boolean, map_id_page, map_profile, map_profile_page};
use crate::pagination::CursoredList;
use crate::request::{Cursor, UserRef};
use crate::types::Profile;

const FRIENDS: &str = "statuses/friends.json";
const FOLLOWERS: &str = "statuses/followers.json";
const FRIEND_IDS: &str = "friends/ids.json";
const FOLLOWER_IDS: &str = "followers/ids.json";

/// Who follows whom. Listings are cursor-paginated; pass `Cursor::START`
/// for the first page and `next_page_cursor()` from the previous page after
/// that. The `*_of` variants address another user and need no credentials.
pub struct FriendOperations<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<'a, T: Transport> FriendOperations<'a, T> {
    pub(crate) fn new(client: &'a TwitterClient<T>) -> Self {
        Self { client }
    }

    /// Profiles the current user follows.
    pub fn friends(&self, cursor: Cursor) -> Result<CursoredList<Profile>> {
        self.client.require_authorization("friends")?;
        self.profile_page(FRIENDS, None, cursor)
    }

    pub fn friends_of(&self, user: &UserRef, cursor: Cursor) -> Result<CursoredList<Profile>> {
        self.profile_page(FRIENDS, Some(user), cursor)
    }

    /// Profiles following the current user.
    pub fn followers(&self, cursor: Cursor) -> Result<CursoredList<Profile>> {
        self.client.require_authorization("followers")?;
        self.profile_page(FOLLOWERS, None, cursor)
    }

    pub fn followers_of(&self, user: &UserRef, cursor: Cursor) -> Result<CursoredList<Profile>> {
        self.profile_page(FOLLOWERS, Some(user), cursor)
    }

    pub fn friend_ids(&self, cursor: Cursor) -> Result<CursoredList<i64>> {
        self.client.require_authorization("friend ids")?;
        self.id_page(FRIEND_IDS, None, cursor)
    }

    pub fn friend_ids_of(&self, user: &UserRef, cursor: Cursor) -> Result<CursoredList<i64>> {
        self.id_page(FRIEND_IDS, Some(user), cursor)
    }

    pub fn follower_ids(&self, cursor: Cursor) -> Result<CursoredList<i64>> {
        self.client.require_authorization("follower ids")?;
        self.id_page(FOLLOWER_IDS, None, cursor)
    }

    pub fn follower_ids_of(&self, user: &UserRef, cursor: Cursor) -> Result<CursoredList<i64>> {
        self.id_page(FOLLOWER_IDS, Some(user), cursor)
    }

    /// Follow `user`; returns the profile the service resolved and followed.
    pub fn follow(&self, user: &UserRef) -> Result<Profile> {
        self.client.require_authorization("follow")?;
        self.post_for_profile("friendships/create.json", user)
    }

    pub fn unfollow(&self, user: &UserRef) -> Result<Profile> {
        self.client.require_authorization("unfollow")?;
        self.post_for_profile("friendships/destroy.json", user)
    }

    /// Turn on device notifications for `user`'s updates.
    pub fn enable_notifications(&self, user: &UserRef) -> Result<Profile> {
        self.client.require_authorization("enable notifications")?;
        self.post_for_profile("notifications/follow.json", user)
    }

    pub fn disable_notifications(&self, user: &UserRef) -> Result<Profile> {
        self.client.require_authorization("disable notifications")?;
        self.post_for_profile("notifications/leave.json", user)
    }

    /// Whether `user_a` follows `user_b`.
    pub fn friendship_exists(&self, user_a: &str, user_b: &str) -> Result<bool> {
        let (_, a) = UserRef::screen_name(user_a).to_param()?;
        let (_, b) = UserRef::screen_name(user_b).to_param()?;
        let query = vec![("user_a".to_string(), a), ("user_b".to_string(), b)];
        let value = self
            .client
            .fetch(HttpRequest::get(self.client.api_url("friendships/exists.json"), query))?;
        map_boolean(&value)
    }

    /// Ids of users with a pending request to follow the current user.
    pub fn incoming_friendships(&self, cursor: Cursor) -> Result<CursoredList<i64>> {
        self.client.require_authorization("incoming friendships")?;
        self.id_page("friendships/incoming.json", None, cursor)
    }

    /// Ids of protected users the current user has asked to follow.
    pub fn outgoing_friendships(&self, cursor: Cursor) -> Result<CursoredList<i64>> {
        self.client.require_authorization("outgoing friendships")?;
        self.id_page("friendships/outgoing.json", None, cursor)
    }

    fn listing(&self, path: &str, user: Option<&UserRef>, cursor: Cursor) -> Result<HttpRequest> {
        let mut query = vec![cursor.to_param()];
        if let Some(user) = user {
            query.push(user.to_param()?);
        }
        Ok(HttpRequest::get(self.client.api_url(path), query))
    }

    fn profile_page(&self, path: &str, user: Option<&UserRef>, cursor: Cursor) -> Result<CursoredList<Profile>> {
        let value = self.client.fetch(self.listing(path, user, cursor)?)?;
        map_profile_page(&value)
    }

    fn id_page(&self, path: &str, user: Option<&UserRef>, cursor: Cursor) -> Result<CursoredList<i64>> {
        let value = self.client.fetch(self.listing(path, user, cursor)?)?;
        map_id_page(&value)
    }

    fn post_for_profile(&self, path: &str, user: &UserRef) -> Result<Profile> {
        let request = HttpRequest::post(self.client.api_url(path), vec![user.to_param()?]);
        let value = self.client.fetch(request)?;
        map_profile(&value)
    }
}
