//! HTTP client for the stats provider API.
//!
//! This module provides the [`StatsRequester`] struct for making HTTP requests
//! to a disease.sh compatible server.

use log::{debug, info};
use mockall::automock;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::stats::{
    RequestError,
    response_structs::{CountryListing, CountryStats},
};

/// Country name selecting the worldwide aggregate instead of a single country.
pub const ALL_COUNTRIES: &str = "all";

/// HTTP client for requesting data from the stats provider.
///
/// # Examples
///
/// ```no_run
/// let requester = StatsRequester::new("https://disease.sh/v3/covid-19");
/// let stats = requester.get_country_stats("Japan").await.unwrap();
/// println!("Stats: {}", stats);
/// ```
pub struct StatsRequester {
    /// Base url of the stats provider, without trailing slash
    url: String,
    /// HTTP client
    client: Client,
}

/// Trait for making requests to the stats provider.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait Requester {
    /// Fetches the statistics of a country, or of the world for [`ALL_COUNTRIES`].
    async fn get_country_stats(&self, country: &str) -> Result<CountryStats, RequestError>;
    /// Fetches the list of countries known by the provider.
    async fn get_countries(&self) -> Result<Vec<CountryListing>, RequestError>;
}

impl StatsRequester {
    /// Create a new [StatsRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the stats provider.
    pub fn new(url: &str) -> Self {
        let client = reqwest::Client::new();
        StatsRequester {
            url: url.to_string(),
            client,
        }
    }

    /// Builds an endpoint url by appending path segments to the base url.
    ///
    /// Segments are percent encoded, so a country name like `United Kingdom`
    /// stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url =
            Url::parse(&self.url).map_err(|_| RequestError::InvalidUrl(self.url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl(self.url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RequestError> {
        debug!("request {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        debug!("response from {} -> {}", url, status);
        if status == StatusCode::NOT_FOUND {
            return Err(RequestError::NotFound);
        }
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

impl Requester for StatsRequester {
    /// Request `/countries/{country}`, or `/all` when `country` is [`ALL_COUNTRIES`].
    ///
    /// This api call returns a json object:
    /// ```json
    /// {
    ///   country: "Japan",
    ///   population: 125584838,
    ///   cases: 33803572,
    ///   ...
    /// }
    /// ```
    /// An unknown country is answered with a 404 status, reported as
    /// [`RequestError::NotFound`].
    async fn get_country_stats(&self, country: &str) -> Result<CountryStats, RequestError> {
        let url = match country {
            ALL_COUNTRIES => self.endpoint(&["all"])?,
            _ => self.endpoint(&["countries", country])?,
        };
        info!("request stats of {}", country);

        self.get_json(url).await
    }

    /// Request `/countries` to get the list of countries.
    ///
    /// This api call returns a json array with the statistics of every
    /// country; only the names are kept.
    async fn get_countries(&self) -> Result<Vec<CountryListing>, RequestError> {
        let url = self.endpoint(&["countries"])?;
        info!("request list of countries");

        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_country_stats() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/v3/covid-19", server.url());
        let body = r#"{"country": "Japan", "population": 125584838, "active": 725138}"#;

        let mock = server
            .mock("GET", "/v3/covid-19/countries/Japan")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = StatsRequester::new(&url);
        let stats = requester.get_country_stats("Japan").await.unwrap();

        mock.assert_async().await;
        assert_eq!(stats.country.as_deref(), Some("Japan"));
        assert_eq!(stats.population, Some(125_584_838));
        assert_eq!(stats.active, Some(725_138));
    }

    #[tokio::test]
    async fn test_get_country_stats_all_uses_aggregate_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"population": 7900000000, "cases": 704753890}"#;

        let all_mock = server
            .mock("GET", "/all")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        let country_mock = server
            .mock("GET", "/countries/all")
            .expect(0)
            .create_async()
            .await;

        let requester = StatsRequester::new(&server.url());
        let stats = requester.get_country_stats(ALL_COUNTRIES).await.unwrap();

        all_mock.assert_async().await;
        country_mock.assert_async().await;
        assert_eq!(stats.country, None);
        assert_eq!(stats.cases, Some(704_753_890));
    }

    #[tokio::test]
    async fn test_get_country_stats_encodes_country_name() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/countries/United%20Kingdom")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"country": "UK"}"#)
            .create_async()
            .await;

        let requester = StatsRequester::new(&server.url());
        let stats = requester.get_country_stats("United Kingdom").await;

        mock.assert_async().await;
        assert!(stats.is_ok());
    }

    #[tokio::test]
    async fn test_get_country_stats_not_found() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/countries/Atlantis")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Country not found or doesn't have any cases"}"#)
            .create_async()
            .await;

        let requester = StatsRequester::new(&server.url());
        let result = requester.get_country_stats("Atlantis").await;

        assert!(matches!(result, Err(RequestError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_country_stats_server_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/countries/Japan")
            .with_status(502)
            .create_async()
            .await;

        let requester = StatsRequester::new(&server.url());
        let result = requester.get_country_stats("Japan").await;

        assert!(matches!(result, Err(RequestError::Status(502))));
    }

    #[tokio::test]
    async fn test_get_country_stats_unparsable_body() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/countries/Japan")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let requester = StatsRequester::new(&server.url());
        let result = requester.get_country_stats("Japan").await;

        assert!(matches!(result, Err(RequestError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_countries() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"[{"country": "Afghanistan"}, {"country": "Albania"}, {"country": "Algeria"}]"#;

        server
            .mock("GET", "/countries")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = StatsRequester::new(&server.url());
        let countries = requester.get_countries().await.unwrap();

        assert_eq!(countries.len(), 3);
        assert_eq!(countries.first().unwrap().country, "Afghanistan");
        assert_eq!(countries.last().unwrap().country, "Algeria");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        // Nothing listens on the discard port
        let requester = StatsRequester::new("http://127.0.0.1:9");
        let result = requester.get_countries().await;

        assert!(matches!(result, Err(RequestError::Transport(_))));
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let requester = StatsRequester::new("not a url");
        let result = requester.get_countries().await;

        assert!(matches!(result, Err(RequestError::InvalidUrl(_))));
    }
}
