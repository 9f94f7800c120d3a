//! Slack integration over Socket Mode.
//!
//! This module connects the bot to a Slack workspace without a public HTTP
//! endpoint: events arrive on a WebSocket opened with the app-level token and
//! replies are posted with the Web API or to interaction response urls.
//!
//! # Modules
//!
//! - `blocks` - Block Kit structures and [`ReplyPayload`]
//! - `client` - Web API client, implements [`Responder`]
//! - `events` - Envelope and event decoding
//! - `socket` - Socket Mode connection loop and reconnect policy

mod blocks;
mod client;
mod events;
mod socket;

pub use crate::slack::blocks::{Block, Element, ReplyPayload, SelectOption, TextObject};
pub use crate::slack::client::SlackClient;
pub use crate::slack::events::{
    BlockActionPayload, MessageEvent, SlackEnvelope, SlackEvent, SlashCommandPayload,
};
pub use crate::slack::socket::SocketMode;

use mockall::automock;

/// Outbound operations available while handling an envelope.
///
/// Every envelope must be acknowledged within three seconds, the reply is
/// then delivered separately with [`Responder::respond`] or [`Responder::say`].
#[automock]
pub trait Responder {
    /// Acknowledges an envelope.
    async fn acknowledge(&self, envelope_id: &str) -> Result<(), anyhow::Error>;
    /// Replies to a slash command or block action through its response url.
    async fn respond(&self, response_url: &str, reply: &ReplyPayload) -> Result<(), anyhow::Error>;
    /// Posts a message in a channel.
    async fn say(&self, channel: &str, reply: &ReplyPayload) -> Result<(), anyhow::Error>;
}
