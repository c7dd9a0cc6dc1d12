//! Timelines and posting.
//!
//! # Design
//! Reads take an `IdBounds` window; bounds at or below zero are left off the
//! query. Posting sends a form body and returns the status the service
//! stored, so the caller gets the assigned id. Text, ids and coordinates are
//! validated before the request exists.

use crate::client::TwitterClient;
use crate::error::Result;
use crate::http::{HttpRequest, Transport};
use crate::mapping::{map_status, map_statuses};
use crate::request::{positive_id, required_text, IdBounds, UserRef};
use crate::types::{StatusDetails, StatusUpdate};

pub struct TimelineOperations<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<'a, T: Transport> TimelineOperations<'a, T> {
    pub(crate) fn new(client: &'a TwitterClient<T>) -> Self {
        Self { client }
    }

    /// Statuses from the current user and the users they follow, newest first.
    pub fn home_timeline(&self, bounds: IdBounds) -> Result<Vec<StatusUpdate>> {
        self.client.require_authorization("home timeline")?;
        let mut query = Vec::new();
        bounds.append_to(&mut query);
        let request = HttpRequest::get(self.client.api_url("statuses/home_timeline.json"), query);
        map_statuses(&self.client.fetch(request)?)
    }

    pub fn user_timeline(&self, user: &UserRef, bounds: IdBounds) -> Result<Vec<StatusUpdate>> {
        let mut query = vec![user.to_param()?];
        bounds.append_to(&mut query);
        let request = HttpRequest::get(self.client.api_url("statuses/user_timeline.json"), query);
        map_statuses(&self.client.fetch(request)?)
    }

    /// Post a status; returns the status as the service stored it.
    pub fn update_status(&self, text: &str) -> Result<StatusUpdate> {
        self.update_status_with(text, &StatusDetails::default())
    }

    pub fn update_status_with(&self, text: &str, details: &StatusDetails) -> Result<StatusUpdate> {
        self.client.require_authorization("status update")?;
        let mut form = vec![("status".to_string(), required_text(text, "status text")?)];
        form.extend(details.to_params()?);
        let request = HttpRequest::post_form(self.client.api_url("statuses/update.json"), &form);
        map_status(&self.client.fetch(request)?)
    }

    /// Retweet `status_id`; returns the new retweet.
    pub fn retweet(&self, status_id: i64) -> Result<StatusUpdate> {
        self.client.require_authorization("retweet")?;
        let path = format!("statuses/retweet/{}.json", positive_id(status_id, "status id")?);
        let request = HttpRequest::post(self.client.api_url(&path), Vec::new());
        map_status(&self.client.fetch(request)?)
    }
}
