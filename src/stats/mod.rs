//! COVID-19 statistics provider integration and API client.
//!
//! This module provides integration with a disease.sh compatible API, handling
//! HTTP communication and turning every response into an explicit [`Lookup`].
//!
//! # Modules
//!
//! - `requester` - HTTP client for making API requests to the stats provider
//! - `response_structs` - Data structures for API responses
//! - `service` - Maps requester results to [`Lookup`] values
//!
//! # Examples
//!
//! ```no_run
//! use covibot::stats::{StatsRequester, StatsService};
//!
//! let service = StatsService::new(StatsRequester::new("https://disease.sh/v3/covid-19"), false);
//! let lookup = service.country_stats("Japan").await;
//! ```

mod requester;
mod response_structs;
mod service;

#[cfg(test)]
pub use crate::stats::requester::{ALL_COUNTRIES, MockRequester};
pub use crate::stats::requester::{Requester, StatsRequester};
#[cfg(test)]
pub use crate::stats::response_structs::CountryListing;
pub use crate::stats::response_structs::CountryStats;
pub use crate::stats::service::StatsService;

use std::fmt;

/// Errors that can occur while requesting the stats provider.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The provider answered with HTTP 404, the requested entity does not exist.
    NotFound,
    /// The provider answered with another non-success status.
    Status(u16),
    /// The provider could not be reached or the connection failed.
    Transport(String),
    /// The response body is not the expected JSON.
    Decode(String),
    /// The configured base url cannot be used to build endpoints.
    InvalidUrl(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::NotFound => write!(f, "not found"),
            RequestError::Status(status) => write!(f, "unexpected status {}", status),
            RequestError::Transport(e) => write!(f, "transport error: {}", e),
            RequestError::Decode(e) => write!(f, "invalid response body: {}", e),
            RequestError::InvalidUrl(url) => write!(f, "invalid base url {}", url),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RequestError::Decode(error.to_string())
        } else {
            RequestError::Transport(error.to_string())
        }
    }
}

/// Outcome of a lookup against the stats provider.
///
/// Every call site matches the three cases explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The provider returned usable data.
    Found(T),
    /// The provider does not know the requested entity, or returned an empty list.
    NotFound,
    /// The provider could not be reached or answered with garbage.
    UpstreamError(RequestError),
}
