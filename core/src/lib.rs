//! Synchronous client core for the Twitter REST and search APIs.
//!
//! # Overview
//! Builds parameterized requests, maps loosely typed JSON into typed
//! records, and turns failed responses into a precise error taxonomy. The
//! host supplies the `Transport` that signs and sends requests; the core
//! never opens a connection itself.
//!
//! # Design
//! - `TwitterClient` is stateless apart from its transport and
//!   configuration. Every operation issues at most one request.
//! - Arguments are validated before a request exists (`InvalidRequest`,
//!   `NotAuthorized`), so misuse never reaches the network.
//! - Responses are classified once, in `classify::check_status`, right after
//!   the transport returns.
//! - Cursor pagination (`CursoredList`) and page/id-bound pagination
//!   (`SearchParams` / `SearchResults`) are separate on purpose.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod friends;
pub mod http;
pub mod mapping;
pub mod pagination;
pub mod request;
pub mod search;
pub mod timeline;
pub mod types;
pub mod users;

pub use client::TwitterClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind, Result, TransportError};
pub use friends::FriendOperations;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use pagination::{CursoredList, SearchParams, SearchResults};
pub use request::{Cursor, IdBounds, UserLookup, UserRef};
pub use search::SearchOperations;
pub use timeline::TimelineOperations;
pub use types::{Profile, StatusDetails, StatusUpdate, SuggestionCategory};
pub use users::UserOperations;
