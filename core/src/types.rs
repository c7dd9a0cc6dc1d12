//! Domain records produced by the response mapper.
//!
//! # Design
//! Records are built fresh from each response and handed to the caller by
//! value. Nothing in the core keeps them afterwards, so caching (and any
//! identity map keyed on `id`) is the caller's business. A screen name is
//! only an alias: compare profiles by `id`.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::error::{ApiError, Result};

/// A user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: i64,
    pub screen_name: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub url: String,
    pub profile_image_url: String,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub followers_count: i64,
    pub friends_count: i64,
    pub statuses_count: i64,
    pub protected: bool,
}

/// A status update (tweet), from either a timeline or a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub id: i64,
    pub text: String,
    /// Screen name of the author.
    pub from_user: String,
    pub from_user_id: i64,
    /// Set only for replies.
    pub to_user_id: Option<i64>,
    /// Set only for replies that name the status they answer.
    pub in_reply_to_status_id: Option<i64>,
    pub language_code: String,
    /// Client that posted the status, usually an HTML anchor.
    pub source: String,
    pub profile_image_url: String,
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl StatusUpdate {
    pub fn is_reply(&self) -> bool {
        self.to_user_id.is_some()
    }
}

/// A suggested-users category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionCategory {
    pub name: String,
    pub slug: String,
    /// Number of users in the category.
    pub size: i64,
}

/// Extra metadata for a status update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusDetails {
    pub in_reply_to_status_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub display_coordinates: bool,
}

impl StatusDetails {
    pub fn in_reply_to(status_id: i64) -> Self {
        Self {
            in_reply_to_status_id: Some(status_id),
            ..Self::default()
        }
    }

    pub fn at_location(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn displaying_coordinates(self) -> Self {
        Self {
            display_coordinates: true,
            ..self
        }
    }

    /// Form fields in the order the service documents them. A location must
    /// be finite on both axes.
    pub(crate) fn to_params(&self) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        if let Some(id) = self.in_reply_to_status_id.filter(|id| *id > 0) {
            params.push(("in_reply_to_status_id".to_string(), id.to_string()));
        }
        if let (Some(lat), Some(long)) = (self.latitude, self.longitude) {
            if !(lat.is_finite() && long.is_finite()) {
                return Err(ApiError::invalid(format!("coordinates must be finite, got {lat}, {long}")));
            }
            params.push(("lat".to_string(), lat.to_string()));
            params.push(("long".to_string(), long.to_string()));
        }
        if self.display_coordinates {
            params.push(("display_coordinates".to_string(), "true".to_string()));
        }
        Ok(params)
    }
}
