//! Country list handler.
//!
//! Fetches the country list and renders it as a paginated menu. An empty list
//! and an unavailable provider both answer "Country list not found.".

use log::debug;

use crate::{
    commands::{
        CommandResult,
        block_response::{format_country_list_not_found, format_country_menu},
        menu::paginate,
    },
    stats::{Lookup, Requester, StatsService},
};

/// Builds the country menu.
///
/// # Arguments
///
/// * `stats` - The service used to fetch the country list
/// * `page_size` - Number of countries per menu
pub async fn handle_country_list<R: Requester>(
    stats: &StatsService<R>,
    page_size: usize,
) -> CommandResult {
    debug!("handling country list");

    let countries = match stats.country_names().await {
        Lookup::Found(countries) => countries,
        Lookup::NotFound | Lookup::UpstreamError(_) => {
            return CommandResult {
                reply: format_country_list_not_found(),
            };
        }
    };

    let reply = match paginate(&countries, page_size) {
        Some(pages) => {
            debug!("{} countries in {} menus", countries.len(), pages.len());
            format_country_menu(&pages)
        }
        None => format_country_list_not_found(),
    };

    CommandResult { reply }
}
