//! Trigger parsing, routing and reply formatting.
//!
//! This module turns Slack events into replies. It owns the routing table
//! between the trigger kinds the bot reacts to and the operations it runs.
//!
//! # Overview
//!
//! 1. **Parsing** - A [`SlackEnvelope`](crate::slack::SlackEnvelope) becomes an
//!    [`Invocation`](command::Invocation): a [`Trigger`](command::Trigger),
//!    the user and where to deliver the reply
//! 2. **Routing** - [`Trigger::operation`](command::Trigger::operation) picks
//!    the [`Operation`](command::Operation) to run
//! 3. **Execution** - The action handler fetches stats if needed
//! 4. **Response** - The result is rendered as a [`ReplyPayload`]
//!
//! # Architecture
//!
//! ```text
//! SlackEnvelope
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + execute()
//! └─────────────┘
//!      │
//!      ├── parse() ──────────► Invocation { Trigger, ReplyTarget }
//!      │
//!      └── execute() ─► Trigger::operation()
//!                              │
//!                              ▼
//!                   ┌──────────────────────────┐
//!                   │ Action Handlers          │
//!                   │  - handle_greeting       │
//!                   │  - handle_hello          │
//!                   │  - handle_country_list   │
//!                   │  - handle_country_info   │
//!                   └──────────────────────────┘
//!                              │
//!                              ▼
//!                   CommandResult { ReplyPayload }
//! ```
//!
//! # Triggers
//!
//! | Trigger | Source | Operation |
//! |---------|--------|-----------|
//! | `GreetingMessage` | message containing `hello` | `Greet` |
//! | `HelloCommand` | `/hello` | `GreetByHour` |
//! | `CountryCommand` | `/covid19 [country]` | `CountryList` or `CountryInfo` |
//! | `RefreshCountry` | `action-get-info` button | `CountryInfo` |
//! | `SelectCountry` | `action-select-country` menu | `CountryInfo` |
//! | `BackToList` | `action-get-countries` button | `CountryList` |
//!
//! Events matching no trigger produce a [`CommandParseError`] and are ignored.
//!
//! # Module Organization
//!
//! - [`commander`] - Parses envelopes and executes triggers
//! - [`command`] - Trigger and operation definitions, routing table
//! - [`actions`] - Individual operation handlers
//! - [`menu`] - Country menu pagination
//! - [`block_response`] - Reply formatting

use std::fmt;

mod actions;
mod block_response;
mod command;
mod commander;
mod menu;

pub use crate::commands::command::ReplyTarget;
pub use crate::commands::commander::Commander;
use crate::slack::ReplyPayload;

/// Runtime context for executing a trigger.
///
/// # Examples
///
/// ```
/// # use covibot::commands::CommandContext;
/// let context = CommandContext {
///     user_id: "U012AB3CD".to_string(),
///     hour: 9,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Slack user id of the user who triggered the event
    pub user_id: String,
    /// Local hour of the bot host, from 0 to 23
    pub hour: u32,
}

/// Result of executing a trigger.
#[derive(Debug, PartialEq)]
pub struct CommandResult {
    /// Reply to deliver to Slack
    pub reply: ReplyPayload,
}

/// Reasons for which an event is not handled by the bot.
///
/// None of them is reported to the user, the event is only acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    /// The message was posted by a bot or is not a plain user message
    BotMessage,
    /// The message does not contain the greeting keyword
    NotForBot,
    /// A slash command the bot does not handle
    UnknownCommand(String),
    /// A block action the bot does not handle
    UnknownAction(String),
    /// A block action without a usable value
    MissingValue(String),
    /// An event kind the bot does not listen to
    Unsupported(String),
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandParseError::BotMessage => write!(f, "message posted by a bot"),
            CommandParseError::NotForBot => write!(f, "message not for the bot"),
            CommandParseError::UnknownCommand(command) => write!(f, "unknown command {}", command),
            CommandParseError::UnknownAction(action) => write!(f, "unknown action {}", action),
            CommandParseError::MissingValue(action) => write!(f, "action {} has no value", action),
            CommandParseError::Unsupported(kind) => write!(f, "unsupported event {}", kind),
        }
    }
}
