//! The entry point tying transport, configuration and the operation groups
//! together.
//!
//! # Design
//! `TwitterClient` holds the host's `Transport`, the endpoint configuration
//! and whether the transport carries user credentials. It keeps no mutable
//! state: each operation builds one `HttpRequest`, hands it to the transport
//! once, classifies the response at `check_status`, and maps the body.
//! Concurrent calls need no locking inside the core.

use serde_json::Value;
use tracing::debug;

use crate::classify::check_status;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::friends::FriendOperations;
use crate::http::{HttpRequest, Transport};
use crate::mapping::parse_json;
use crate::request::endpoint;
use crate::search::SearchOperations;
use crate::timeline::TimelineOperations;
use crate::users::UserOperations;

/// Synchronous, stateless client for the Twitter REST and search APIs.
#[derive(Debug, Clone)]
pub struct TwitterClient<T> {
    transport: T,
    config: ClientConfig,
    authorized: bool,
}

impl<T: Transport> TwitterClient<T> {
    /// A client whose transport signs requests for a user.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            authorized: true,
        }
    }

    /// A client without user credentials. Operations that act for the
    /// current user fail with `NotAuthorized` without issuing a request.
    pub fn unauthorized(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            authorized: false,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn friends(&self) -> FriendOperations<'_, T> {
        FriendOperations::new(self)
    }

    pub fn users(&self) -> UserOperations<'_, T> {
        UserOperations::new(self)
    }

    pub fn search(&self) -> SearchOperations<'_, T> {
        SearchOperations::new(self)
    }

    pub fn timeline(&self) -> TimelineOperations<'_, T> {
        TimelineOperations::new(self)
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        endpoint(self.config.api_base(), path)
    }

    pub(crate) fn search_url(&self, path: &str) -> String {
        endpoint(self.config.search_base(), path)
    }

    pub(crate) fn require_authorization(&self, operation: &'static str) -> Result<()> {
        if self.authorized {
            Ok(())
        } else {
            Err(ApiError::NotAuthorized { operation })
        }
    }

    /// Issue `request` once and return the parsed body of a 2xx response.
    pub(crate) fn fetch(&self, request: HttpRequest) -> Result<Value> {
        debug!(method = request.method.as_str(), url = %request.full_url(), "issuing request");
        let response = self.transport.issue(&request)?;
        debug!(status = response.status, bytes = response.body.len(), "response received");
        let response = check_status(response)?;
        parse_json(&response.body)
    }
}
