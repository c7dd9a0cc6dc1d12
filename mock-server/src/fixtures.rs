//! Seed data and the in-memory store behind the mock endpoints.

use serde::Deserialize;
use serde_json::{json, Value};

/// Every status shares one timestamp, rendered in both wire formats.
pub const SEARCH_CREATED_AT: &str = "Thu, 24 Feb 2011 18:50:08 +0000";
pub const TIMELINE_CREATED_AT: &str = "Thu Feb 24 18:50:08 +0000 2011";

pub const CURRENT_USER_ID: i64 = 161064614;

#[derive(Clone, Debug)]
pub struct User {
    pub id: i64,
    pub screen_name: String,
    pub name: String,
    pub description: String,
    pub location: String,
}

#[derive(Clone, Debug)]
pub struct Status {
    pub id: i64,
    pub author_id: i64,
    pub text: String,
    pub in_reply_to_user_id: Option<i64>,
    pub in_reply_to_status_id: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub members: Vec<i64>,
}

/// A canned failure returned for the next request.
#[derive(Clone, Debug, Deserialize)]
pub struct Failure {
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Default)]
pub struct Db {
    pub users: Vec<User>,
    /// `(follower, followed)` in the order the edges were created.
    pub follows: Vec<(i64, i64)>,
    pub notifications: Vec<i64>,
    pub incoming: Vec<i64>,
    pub outgoing: Vec<i64>,
    pub statuses: Vec<Status>,
    pub categories: Vec<Category>,
    pub next_status_id: i64,
    pub fail_next: Option<Failure>,
}

fn user(id: i64, screen_name: &str, name: &str, description: &str, location: &str) -> User {
    User {
        id,
        screen_name: screen_name.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        location: location.to_string(),
    }
}

fn status(id: i64, author_id: i64, text: &str) -> Status {
    Status {
        id,
        author_id,
        text: text.to_string(),
        in_reply_to_user_id: None,
        in_reply_to_status_id: None,
    }
}

impl Db {
    pub fn seeded() -> Self {
        let users = vec![
            user(CURRENT_USER_ID, "artnames", "Art Names", "I'm just a normal kinda guy", "Denton, TX"),
            user(12345, "habuma", "Craig Walls", "Spring Guy", "Plano, TX"),
            user(14846645, "royclarkson", "Roy Clarkson", "Mobile", "Richmond, VA"),
            user(14718006, "kdonald", "Keith Donald", "Web", "Melbourne, FL"),
            user(98765, "oizik2", "Oizik", "", ""),
            user(23456, "tinyrod", "Tiny Rod", "", ""),
            user(i64::MAX, "bigid", "Big Id", "Largest possible id", ""),
        ];
        let follows = vec![
            (CURRENT_USER_ID, 12345),
            (CURRENT_USER_ID, 14846645),
            (CURRENT_USER_ID, 14718006),
            (14846645, CURRENT_USER_ID),
            (14718006, CURRENT_USER_ID),
            (i64::MAX, CURRENT_USER_ID),
            (12345, 14846645),
            (12345, 14718006),
            (14718006, 23456),
        ];
        let mut reply = status(106, 14718006, "@habuma #spring social looks great");
        reply.in_reply_to_user_id = Some(12345);
        reply.in_reply_to_status_id = Some(105);
        let statuses = vec![
            status(101, 12345, "Writing about #spring today"),
            status(102, 14846645, "Android and #spring work well together"),
            status(103, 14718006, "Off to the conference"),
            status(104, CURRENT_USER_ID, "Hello from the art desk"),
            status(105, 12345, "#spring social 1.0 released"),
            reply,
        ];
        let categories = vec![
            Category {
                name: "Art & Design".to_string(),
                slug: "art-design".to_string(),
                members: vec![CURRENT_USER_ID],
            },
            Category {
                name: "SpringSource".to_string(),
                slug: "springsource".to_string(),
                members: vec![14846645, 14718006],
            },
        ];
        Db {
            users,
            follows,
            notifications: Vec::new(),
            incoming: vec![23456, 14846645],
            outgoing: vec![98765],
            statuses,
            categories,
            next_status_id: 1000,
            fail_next: None,
        }
    }

    pub fn user_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_name(&self, screen_name: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.screen_name.eq_ignore_ascii_case(screen_name))
    }

    pub fn follows(&self, follower: i64, followed: i64) -> bool {
        self.follows.contains(&(follower, followed))
    }

    pub fn friend_ids(&self, user_id: i64) -> Vec<i64> {
        self.follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, followed)| *followed)
            .collect()
    }

    pub fn follower_ids(&self, user_id: i64) -> Vec<i64> {
        self.follows
            .iter()
            .filter(|(_, followed)| *followed == user_id)
            .map(|(follower, _)| *follower)
            .collect()
    }

    pub fn profile(&self, user: &User) -> Value {
        json!({
            "id": user.id,
            "screen_name": user.screen_name,
            "name": user.name,
            "description": user.description,
            "location": user.location,
            "url": "http://www.springsource.org",
            "profile_image_url": format!("http://a0.twimg.com/profile_images/{}.png", user.screen_name),
            "created_at": TIMELINE_CREATED_AT,
            "followers_count": self.follower_ids(user.id).len(),
            "friends_count": self.friend_ids(user.id).len(),
            "statuses_count": self.statuses.iter().filter(|s| s.author_id == user.id).count(),
            "protected": false,
        })
    }

    pub fn profiles(&self, ids: &[i64]) -> Vec<Value> {
        ids.iter()
            .filter_map(|id| self.user_by_id(*id))
            .map(|u| self.profile(u))
            .collect()
    }

    /// Timeline shape: author nested under `user`.
    pub fn status_json(&self, status: &Status) -> Value {
        let author = self.user_by_id(status.author_id);
        json!({
            "id": status.id,
            "text": status.text,
            "created_at": TIMELINE_CREATED_AT,
            "source": "web",
            "in_reply_to_user_id": status.in_reply_to_user_id,
            "in_reply_to_status_id": status.in_reply_to_status_id,
            "user": author.map(|u| self.profile(u)),
        })
    }

    /// Search shape: flat, with the author's name and id inline.
    pub fn search_json(&self, status: &Status) -> Value {
        let screen_name = self
            .user_by_id(status.author_id)
            .map(|u| u.screen_name.clone())
            .unwrap_or_default();
        let mut value = json!({
            "id": status.id,
            "from_user": screen_name,
            "from_user_id": status.author_id,
            "text": status.text,
            "iso_language_code": "en",
            "source": "&lt;a href=&quot;http://twitter.com/&quot;&gt;web&lt;/a&gt;",
            "profile_image_url": format!("http://a0.twimg.com/profile_images/{screen_name}.png"),
            "created_at": SEARCH_CREATED_AT,
        });
        if let Some(to) = status.in_reply_to_user_id {
            value["to_user_id"] = json!(to);
        }
        value
    }
}
