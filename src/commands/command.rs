//! Trigger parsing and routing.
//!
//! This module converts Slack events into structured [`Trigger`] values and
//! holds the routing table from triggers to [`Operation`]s.

use log::debug;

use crate::{
    commands::CommandParseError,
    slack::{BlockActionPayload, MessageEvent, SlackEvent, SlashCommandPayload},
};

/// Keyword a message must contain to be greeted.
pub const GREETING_KEYWORD: &str = "hello";
/// Slash command greeting the user depending on the time of day.
pub const HELLO_COMMAND: &str = "/hello";
/// Slash command showing the country list or the stats of a country.
pub const COVID19_COMMAND: &str = "/covid19";
/// Button going back to the country list.
pub const ACTION_GET_COUNTRIES: &str = "action-get-countries";
/// Button refreshing the stats of a country.
pub const ACTION_GET_INFO: &str = "action-get-info";
/// Menu selecting a country.
pub const ACTION_SELECT_COUNTRY: &str = "action-select-country";

/// An inbound event the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A channel message containing the greeting keyword
    GreetingMessage { user_id: String },
    /// The `/hello` slash command
    HelloCommand { user_id: String },
    /// The `/covid19` slash command with its trimmed argument
    CountryCommand(String),
    /// The refresh button of a country
    RefreshCountry(String),
    /// A country chosen in the menu
    SelectCountry(String),
    /// The back button, its value is not used
    BackToList(String),
}

/// What the bot does for a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Fixed greeting, no fetch
    Greet,
    /// Greeting depending on the hour
    GreetByHour,
    /// Paginated country menu
    CountryList,
    /// Stats of a country
    CountryInfo(String),
}

/// Where a reply has to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTarget {
    /// Posted in a channel with `chat.postMessage`
    Channel(String),
    /// Posted to an interaction response url
    ResponseUrl(String),
}

/// A parsed event: the trigger, who sent it and where to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub trigger: Trigger,
    pub user_id: String,
    pub target: ReplyTarget,
}

impl Trigger {
    /// Parses a Slack event into an [`Invocation`].
    ///
    /// # Errors
    ///
    /// Returns a [`CommandParseError`] describing why the event is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use covibot::commands::command::Trigger;
    /// # use covibot::slack::{SlackEvent, SlashCommandPayload};
    /// let event = SlackEvent::SlashCommand(SlashCommandPayload {
    ///     command: "/covid19".to_string(),
    ///     text: " Japan ".to_string(),
    ///     user_id: "U1".to_string(),
    ///     channel_id: "C1".to_string(),
    ///     response_url: "https://hooks.slack.com/commands/1".to_string(),
    /// });
    /// let invocation = Trigger::parse(&event).unwrap();
    /// assert_eq!(invocation.trigger, Trigger::CountryCommand("Japan".to_string()));
    /// ```
    pub fn parse(event: &SlackEvent) -> Result<Invocation, CommandParseError> {
        match event {
            SlackEvent::Message(message) => Self::parse_message(message),
            SlackEvent::SlashCommand(command) => Self::parse_slash_command(command),
            SlackEvent::BlockAction(action) => Self::parse_block_action(action),
            SlackEvent::Unsupported { event_type } => {
                Err(CommandParseError::Unsupported(event_type.clone()))
            }
        }
    }

    fn parse_message(message: &MessageEvent) -> Result<Invocation, CommandParseError> {
        if message.bot_id.is_some() || message.subtype.is_some() {
            return Err(CommandParseError::BotMessage);
        }
        let Some(user_id) = message.user.clone() else {
            return Err(CommandParseError::BotMessage);
        };
        if !message.text.contains(GREETING_KEYWORD) {
            return Err(CommandParseError::NotForBot);
        }

        debug!("greeting message from {}", user_id);

        Ok(Invocation {
            trigger: Trigger::GreetingMessage {
                user_id: user_id.clone(),
            },
            user_id,
            target: ReplyTarget::Channel(message.channel.clone()),
        })
    }

    fn parse_slash_command(command: &SlashCommandPayload) -> Result<Invocation, CommandParseError> {
        let trigger = match command.command.as_str() {
            HELLO_COMMAND => Trigger::HelloCommand {
                user_id: command.user_id.clone(),
            },
            COVID19_COMMAND => Trigger::CountryCommand(command.text.trim().to_owned()),
            other => return Err(CommandParseError::UnknownCommand(other.to_owned())),
        };

        debug!("slash command {} -> {:?}", command.command, trigger);

        Ok(Invocation {
            trigger,
            user_id: command.user_id.clone(),
            target: ReplyTarget::ResponseUrl(command.response_url.clone()),
        })
    }

    fn parse_block_action(action: &BlockActionPayload) -> Result<Invocation, CommandParseError> {
        let value = action.value.clone().unwrap_or_default();

        let trigger = match action.action_id.as_str() {
            ACTION_GET_COUNTRIES => Trigger::BackToList(value),
            ACTION_GET_INFO if !value.is_empty() => Trigger::RefreshCountry(value),
            ACTION_SELECT_COUNTRY if !value.is_empty() => Trigger::SelectCountry(value),
            ACTION_GET_INFO | ACTION_SELECT_COUNTRY => {
                return Err(CommandParseError::MissingValue(action.action_id.clone()));
            }
            other => return Err(CommandParseError::UnknownAction(other.to_owned())),
        };

        debug!("block action {} -> {:?}", action.action_id, trigger);

        Ok(Invocation {
            trigger,
            user_id: action.user_id.clone(),
            target: ReplyTarget::ResponseUrl(action.response_url.clone()),
        })
    }

    /// Routing table from triggers to operations.
    pub fn operation(&self) -> Operation {
        match self {
            Trigger::GreetingMessage { .. } => Operation::Greet,
            Trigger::HelloCommand { .. } => Operation::GreetByHour,
            Trigger::CountryCommand(country) if country.is_empty() => Operation::CountryList,
            Trigger::CountryCommand(country) => Operation::CountryInfo(country.clone()),
            Trigger::RefreshCountry(country) | Trigger::SelectCountry(country) => {
                Operation::CountryInfo(country.clone())
            }
            Trigger::BackToList(_) => Operation::CountryList,
        }
    }
}
