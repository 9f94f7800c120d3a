//! Block Kit structures and reply payloads.
//!
//! Only the subset of Block Kit used by the bot is modelled: headers,
//! sections with fields or a select accessory, action buttons and dividers.

use serde::{Serialize, Serializer, ser::SerializeMap};

/// A Block Kit text object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    Mrkdwn {
        text: String,
    },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: None,
        }
    }

    /// Plain text with emoji shortcodes rendered.
    pub fn plain_emoji(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: Some(true),
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text, .. } | Self::Mrkdwn { text } => text,
        }
    }
}

/// An option of a `static_select` menu.
///
/// `value` is sent back verbatim in the block action when the option is chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: TextObject,
    pub value: String,
}

/// An interactive element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        value: String,
        action_id: String,
    },
    StaticSelect {
        action_id: String,
        placeholder: TextObject,
        options: Vec<SelectOption>,
    },
}

impl Element {
    pub fn button(
        action_id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Button {
            text: TextObject::plain_emoji(label),
            value: value.into(),
            action_id: action_id.into(),
        }
    }

    pub fn static_select(
        action_id: impl Into<String>,
        placeholder: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::StaticSelect {
            action_id: action_id.into(),
            placeholder: TextObject::plain(placeholder),
            options,
        }
    }
}

/// A layout block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Actions {
        elements: Vec<Element>,
    },
    Divider,
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: TextObject::plain_emoji(text),
        }
    }

    pub fn fields(fields: Vec<TextObject>) -> Self {
        Self::Section {
            text: None,
            fields,
            accessory: None,
        }
    }

    pub fn section_with_accessory(text: TextObject, accessory: Element) -> Self {
        Self::Section {
            text: Some(text),
            fields: Vec::new(),
            accessory: Some(accessory),
        }
    }

    pub fn actions(elements: Vec<Element>) -> Self {
        Self::Actions { elements }
    }
}

/// The content sent back to Slack for a trigger.
///
/// Serializes to one of:
/// - `{"blocks": [...]}`
/// - `{"type": "plain_text", "text": "...", "emoji": true}`
/// - `{"text": "..."}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyPayload {
    /// A Block Kit document.
    Blocks(Vec<Block>),
    /// A plain text object, used for "not found" answers.
    PlainText(String),
    /// An ordinary message text.
    Text(String),
}

impl Serialize for ReplyPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReplyPayload::Blocks(blocks) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("blocks", blocks)?;
                map.end()
            }
            ReplyPayload::PlainText(text) => TextObject::plain_emoji(text).serialize(serializer),
            ReplyPayload::Text(text) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("text", text)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_reply_shape() {
        let reply = ReplyPayload::PlainText("Country list not found.".to_owned());

        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"type": "plain_text", "text": "Country list not found.", "emoji": true})
        );
    }

    #[test]
    fn test_text_reply_shape() {
        let reply = ReplyPayload::Text("Hello <@U1>!".to_owned());

        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"text": "Hello <@U1>!"})
        );
    }

    #[test]
    fn test_blocks_reply_shape() {
        let reply = ReplyPayload::Blocks(vec![
            Block::header("Countries"),
            Block::fields(vec![TextObject::mrkdwn("*Active:* 1")]),
            Block::actions(vec![Element::button("action-get-info", "Refresh", "Japan")]),
            Block::Divider,
        ]);

        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({
                "blocks": [
                    {"type": "header", "text": {"type": "plain_text", "text": "Countries", "emoji": true}},
                    {"type": "section", "fields": [{"type": "mrkdwn", "text": "*Active:* 1"}]},
                    {"type": "actions", "elements": [{
                        "type": "button",
                        "text": {"type": "plain_text", "text": "Refresh", "emoji": true},
                        "value": "Japan",
                        "action_id": "action-get-info"
                    }]},
                    {"type": "divider"}
                ]
            })
        );
    }

    #[test]
    fn test_static_select_shape() {
        let block = Block::section_with_accessory(
            TextObject::mrkdwn("[1] From: Japan…"),
            Element::static_select(
                "action-select-country",
                "Select a country",
                vec![SelectOption {
                    text: TextObject::plain("Japan"),
                    value: "Japan".to_owned(),
                }],
            ),
        );

        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "section",
                "text": {"type": "mrkdwn", "text": "[1] From: Japan…"},
                "accessory": {
                    "type": "static_select",
                    "action_id": "action-select-country",
                    "placeholder": {"type": "plain_text", "text": "Select a country"},
                    "options": [{"text": {"type": "plain_text", "text": "Japan"}, "value": "Japan"}]
                }
            })
        );
    }

    #[test]
    fn test_text_object_text() {
        assert_eq!(TextObject::plain("a").text(), "a");
        assert_eq!(TextObject::mrkdwn("*b*").text(), "*b*");
    }
}
