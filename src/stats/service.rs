//! Lookups against the stats provider.
//!
//! This module provides the [`StatsService`] struct which wraps a [`Requester`]
//! and converts its results into [`Lookup`] values, so that a missing country,
//! an empty catalogue and a failing provider are distinct cases.

use log::{debug, warn};

use crate::stats::{CountryStats, Lookup, RequestError, requester::Requester};

/// Fetches statistics and countries from the stats provider.
///
/// # Examples
///
/// ```no_run
/// use covibot::stats::{StatsRequester, StatsService};
///
/// # #[tokio::main]
/// # async fn main() {
/// let service = StatsService::new(StatsRequester::new("https://disease.sh/v3/covid-19"), false);
/// let countries = service.country_names().await;
/// # }
/// ```
pub struct StatsService<R: Requester> {
    /// Requester to interact with the stats provider
    requester: R,
    /// Log raw provider results
    diagnostics: bool,
}

impl<R: Requester> StatsService<R> {
    /// Create a new [StatsService].
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [Requester] trait.
    /// * `diagnostics` - Whether raw provider results are logged.
    pub fn new(requester: R, diagnostics: bool) -> Self {
        StatsService {
            requester,
            diagnostics,
        }
    }

    /// Looks up the statistics of a country.
    ///
    /// A 404 from the provider is [`Lookup::NotFound`], any other failure is
    /// [`Lookup::UpstreamError`].
    pub async fn country_stats(&self, country: &str) -> Lookup<CountryStats> {
        match self.requester.get_country_stats(country).await {
            Ok(stats) => {
                if self.diagnostics {
                    debug!("stats of {} -> {}", country, stats);
                }
                Lookup::Found(stats)
            }
            Err(RequestError::NotFound) => {
                debug!("country {} not found", country);
                Lookup::NotFound
            }
            Err(e) => {
                warn!("failed to request stats of {}: {}", country, e);
                Lookup::UpstreamError(e)
            }
        }
    }

    /// Looks up the names of every country, in the provider's order.
    ///
    /// An empty list is [`Lookup::NotFound`].
    pub async fn country_names(&self) -> Lookup<Vec<String>> {
        match self.requester.get_countries().await {
            Ok(listings) => {
                if self.diagnostics {
                    debug!("countries -> {:?}", listings);
                }
                if listings.is_empty() {
                    debug!("the country list is empty");
                    return Lookup::NotFound;
                }
                Lookup::Found(listings.into_iter().map(|l| l.country).collect())
            }
            Err(RequestError::NotFound) => {
                debug!("country list not found");
                Lookup::NotFound
            }
            Err(e) => {
                warn!("failed to request the country list: {}", e);
                Lookup::UpstreamError(e)
            }
        }
    }
}
