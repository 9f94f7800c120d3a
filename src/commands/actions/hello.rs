//! `/hello` command handler.

use log::debug;

use crate::commands::{CommandContext, CommandResult, block_response::format_hour_greeting};

/// Greets the user depending on the local hour of the context.
pub fn handle_hello(context: &CommandContext) -> CommandResult {
    debug!(
        "handling hello command from {} at {}h",
        context.user_id, context.hour
    );

    CommandResult {
        reply: format_hour_greeting(context.hour, &context.user_id),
    }
}
