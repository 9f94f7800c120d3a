//! Operation handlers.
//!
//! Individual handler functions for each [`Operation`](crate::commands::command::Operation).
//! Each handler returns a [`CommandResult`](crate::commands::CommandResult)
//! holding the reply to deliver.
//!
//! # Available Handlers
//!
//! - [`handle_greeting`] - Fixed greeting for a message
//! - [`handle_hello`] - Greeting depending on the hour
//! - [`handle_country_list`] - Paginated country menu
//! - [`handle_country_info`] - Stats of a country
//!
//! Handlers never fail: an unavailable provider is rendered as a "not found"
//! reply.

mod country_info;
mod country_list;
mod greeting;
mod hello;

pub use crate::commands::actions::{
    country_info::handle_country_info, country_list::handle_country_list,
    greeting::handle_greeting, hello::handle_hello,
};
