//! Greeting message handler.
//!
//! Answers a channel message containing `hello` with a fixed greeting
//! mentioning its author.

use log::debug;

use crate::commands::{CommandContext, CommandResult, block_response::format_greeting};

/// Greets the user who posted the message.
pub fn handle_greeting(context: &CommandContext) -> CommandResult {
    debug!("handling greeting message from {}", context.user_id);

    CommandResult {
        reply: format_greeting(&context.user_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::ReplyPayload;

    #[test]
    fn test_handle_greeting() {
        let context = CommandContext {
            user_id: "U012AB3CD".to_string(),
            hour: 3,
        };

        let result = handle_greeting(&context);

        assert_eq!(
            result.reply,
            ReplyPayload::Text("Hello <@U012AB3CD>!".to_string())
        );
    }
}
