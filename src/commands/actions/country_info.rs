//! Country info handler.
//!
//! Fetches the stats of a country, or of the whole world for `all`, and
//! renders them. Any failure answers "No information found for ...".

use log::debug;

use crate::{
    commands::{
        CommandResult,
        block_response::{format_country_info, format_country_not_found},
    },
    stats::{Lookup, Requester, StatsService},
};

/// Builds the stats document of a country.
///
/// # Arguments
///
/// * `stats` - The service used to fetch the stats
/// * `country` - The country name as typed or selected by the user
pub async fn handle_country_info<R: Requester>(
    stats: &StatsService<R>,
    country: &str,
) -> CommandResult {
    debug!("handling country info for {}", country);

    let reply = match stats.country_stats(country).await {
        Lookup::Found(country_stats) => format_country_info(country, &country_stats),
        Lookup::NotFound | Lookup::UpstreamError(_) => format_country_not_found(country),
    };

    CommandResult { reply }
}
