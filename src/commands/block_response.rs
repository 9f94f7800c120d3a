//! Reply formatters.
//!
//! This module provides functions to build the replies of the bot: greeting
//! texts and Block Kit documents for the country menu and country stats.

use crate::{
    commands::{
        command::{ACTION_GET_COUNTRIES, ACTION_GET_INFO, ACTION_SELECT_COUNTRY},
        menu::MenuPage,
    },
    slack::{Block, Element, ReplyPayload, SelectOption, TextObject},
    stats::CountryStats,
    utils::format_count,
};

/// Formats the answer to a message containing the greeting keyword.
///
/// # Examples
///
/// ```
/// # use covibot::commands::block_response::format_greeting;
/// # use covibot::slack::ReplyPayload;
/// assert_eq!(format_greeting("U1"), ReplyPayload::Text("Hello <@U1>!".to_string()));
/// ```
pub fn format_greeting(user_id: &str) -> ReplyPayload {
    ReplyPayload::Text(format!("Hello <@{}>!", user_id))
}

/// Returns the greeting for a local hour.
///
/// - from 4 to 9: `Good morning`
/// - from 10 to 17: `Hello`
/// - otherwise: `Good evening`
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        4..10 => "Good morning",
        10..18 => "Hello",
        _ => "Good evening",
    }
}

/// Formats the answer to `/hello`.
pub fn format_hour_greeting(hour: u32, user_id: &str) -> ReplyPayload {
    ReplyPayload::Text(format!("{} <@{}>!", greeting_for_hour(hour), user_id))
}

/// Formats the stats of a country.
///
/// The document contains a header with the country and its population, the
/// six counters as fields, a back button, a refresh button and a divider.
/// Missing counters are shown as `0`.
///
/// # Arguments
///
/// * `country` - The requested country, used in the header and button values
/// * `stats` - The stats returned by the provider
pub fn format_country_info(country: &str, stats: &CountryStats) -> ReplyPayload {
    let field = |name: &str, value: Option<i64>| {
        TextObject::mrkdwn(format!("*{}:*\n{}", name, format_count(value)))
    };

    ReplyPayload::Blocks(vec![
        Block::header(format!(
            "[Country] {} [Population] {}",
            country,
            format_count(stats.population)
        )),
        Block::fields(vec![
            field("Active", stats.active),
            field("Critical", stats.critical),
            field("Recovered", stats.recovered),
            field("Total cases", stats.cases),
            field("Total deaths", stats.deaths),
            field("Tests", stats.tests),
        ]),
        Block::actions(vec![
            Element::button(ACTION_GET_COUNTRIES, "Back to country list", country),
            Element::button(ACTION_GET_INFO, "Refresh", country),
        ]),
        Block::Divider,
    ])
}

/// Formats the answer when no stats are available for a country.
pub fn format_country_not_found(country: &str) -> ReplyPayload {
    ReplyPayload::PlainText(format!("No information found for {}.", country))
}

/// Formats the answer when the country list is unavailable.
pub fn format_country_list_not_found() -> ReplyPayload {
    ReplyPayload::PlainText("Country list not found.".to_owned())
}

/// Formats the country menu, one `static_select` per page.
pub fn format_country_menu(pages: &[MenuPage]) -> ReplyPayload {
    let mut blocks = Vec::with_capacity(pages.len() + 2);
    blocks.push(Block::header("Countries"));

    for page in pages {
        let options = page
            .options
            .iter()
            .map(|option| SelectOption {
                text: TextObject::plain(option.text.as_str()),
                value: option.value.clone(),
            })
            .collect();

        blocks.push(Block::section_with_accessory(
            TextObject::mrkdwn(page.label()),
            Element::static_select(ACTION_SELECT_COUNTRY, "Select a country", options),
        ));
    }

    blocks.push(Block::Divider);

    ReplyPayload::Blocks(blocks)
}
