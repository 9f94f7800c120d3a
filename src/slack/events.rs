//! Slack Socket Mode envelopes and the events they carry.
//!
//! Socket Mode wraps every delivery in an envelope:
//!
//! ```json
//! {
//!   "envelope_id": "57d6a792-4d35-4d0b-b6aa-3361493e1caf",
//!   "type": "slash_commands",
//!   "payload": { ... },
//!   "accepts_response_payload": true
//! }
//! ```
//!
//! The payload is converted into a [`SlackEvent`]. Only messages, slash
//! commands and block actions are understood, everything else is
//! [`SlackEvent::Unsupported`]. A payload that cannot be decoded is also
//! unsupported, so its envelope is still acknowledged.

use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// An envelope received from Socket Mode.
#[derive(Clone, Debug, PartialEq)]
pub struct SlackEnvelope {
    /// Identifier to acknowledge.
    pub envelope_id: String,
    /// The decoded event.
    pub event: SlackEvent,
    /// The raw payload, kept for diagnostics.
    pub payload: Value,
}

/// An event carried by an envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackEvent {
    /// A message posted in a channel the bot is in.
    Message(MessageEvent),
    /// A slash command invocation.
    SlashCommand(SlashCommandPayload),
    /// A click on a button or a choice in a menu.
    BlockAction(BlockActionPayload),
    /// Anything else.
    Unsupported { event_type: String },
}

/// A `message` event from the Events API.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    pub channel: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Set for edits, joins, bot messages and other non plain messages.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Set when the message was posted by a bot, including this one.
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// A slash command invocation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SlashCommandPayload {
    /// The command, including the leading slash.
    pub command: String,
    /// Everything typed after the command.
    #[serde(default)]
    pub text: String,
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    /// Url to post the reply to.
    pub response_url: String,
}

/// The first action of a `block_actions` interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockActionPayload {
    pub user_id: String,
    pub response_url: String,
    pub action_id: String,
    /// The button value, or the value of the selected menu option.
    pub value: Option<String>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    envelope_id: String,
    #[serde(rename = "type")]
    envelope_type: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Deserialize)]
struct RawEventCallback {
    #[serde(default)]
    event: Value,
}

#[derive(Deserialize)]
struct RawInteraction {
    #[serde(rename = "type")]
    interaction_type: String,
    user: RawUser,
    #[serde(default)]
    response_url: String,
    #[serde(default)]
    actions: Vec<RawAction>,
}

#[derive(Deserialize)]
struct RawUser {
    id: String,
}

#[derive(Deserialize)]
struct RawAction {
    action_id: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    selected_option: Option<RawSelectedOption>,
}

#[derive(Deserialize)]
struct RawSelectedOption {
    value: String,
}

impl SlackEnvelope {
    /// Decodes an envelope frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not an envelope, that is when it has
    /// no `envelope_id` or no `type`.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawEnvelope = serde_json::from_str(text)?;
        let event = match parse_event(&raw.envelope_type, &raw.payload) {
            Ok(event) => event,
            Err(e) => {
                debug!(
                    "undecodable {} payload in {}: {}",
                    raw.envelope_type, raw.envelope_id, e
                );
                SlackEvent::Unsupported {
                    event_type: format!("{}/undecodable", raw.envelope_type),
                }
            }
        };

        Ok(SlackEnvelope {
            envelope_id: raw.envelope_id,
            event,
            payload: raw.payload,
        })
    }
}

fn parse_event(envelope_type: &str, payload: &Value) -> Result<SlackEvent, serde_json::Error> {
    match envelope_type {
        "events_api" => {
            let callback = RawEventCallback::deserialize(payload)?;
            match callback.event.get("type").and_then(Value::as_str) {
                Some("message") => Ok(SlackEvent::Message(MessageEvent::deserialize(
                    &callback.event,
                )?)),
                other => Ok(SlackEvent::Unsupported {
                    event_type: format!("events_api/{}", other.unwrap_or("unknown")),
                }),
            }
        }
        "slash_commands" => Ok(SlackEvent::SlashCommand(SlashCommandPayload::deserialize(
            payload,
        )?)),
        "interactive" => {
            let interaction = RawInteraction::deserialize(payload)?;
            if interaction.interaction_type != "block_actions" {
                return Ok(SlackEvent::Unsupported {
                    event_type: format!("interactive/{}", interaction.interaction_type),
                });
            }
            let Some(action) = interaction.actions.into_iter().next() else {
                return Ok(SlackEvent::Unsupported {
                    event_type: "interactive/block_actions".to_owned(),
                });
            };
            let value = action
                .selected_option
                .map(|option| option.value)
                .or(action.value);

            Ok(SlackEvent::BlockAction(BlockActionPayload {
                user_id: interaction.user.id,
                response_url: interaction.response_url,
                action_id: action.action_id,
                value,
            }))
        }
        other => Ok(SlackEvent::Unsupported {
            event_type: other.to_owned(),
        }),
    }
}
