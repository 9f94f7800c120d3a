//! Trigger orchestration and execution.
//!
//! This module provides the [`Commander`] struct, the main entry point for
//! processing Slack events. It parses envelopes into [`Invocation`]s and
//! routes their triggers to the operation handlers.
//!
//! # Flow
//!
//! ```text
//! SlackEnvelope → parse() → Invocation → execute() → CommandResult
//! ```
//!
//! # Examples
//!
//! ```no_run
//! # use covibot::commands::{Commander, CommandContext};
//! # use covibot::stats::StatsRequester;
//! # async fn example(envelope: covibot::slack::SlackEnvelope) {
//! let commander = Commander::new(StatsRequester::new("https://disease.sh/v3/covid-19"), 20, false);
//!
//! if let Ok(invocation) = commander.parse(&envelope) {
//!     let context = CommandContext {
//!         user_id: invocation.user_id.clone(),
//!         hour: 14,
//!     };
//!     let result = commander.execute(&invocation.trigger, &context).await;
//! }
//! # }
//! ```

use log::debug;

use crate::{
    commands::{
        CommandContext, CommandParseError, CommandResult,
        actions::{handle_country_info, handle_country_list, handle_greeting, handle_hello},
        command::{Invocation, Operation, Trigger},
    },
    slack::SlackEnvelope,
    stats::{Requester, StatsService},
};

/// Trigger orchestrator.
///
/// The Commander is responsible for:
/// - Parsing Slack envelopes into structured triggers
/// - Routing triggers to the operation handlers
/// - Logging raw payloads when diagnostics are enabled
pub struct Commander<R: Requester> {
    /// Stats lookups used by the country handlers
    stats: StatsService<R>,
    /// Number of countries per menu
    menu_page_size: usize,
    /// Log raw payloads
    diagnostics: bool,
}

impl<R: Requester> Commander<R> {
    /// Creates a new Commander.
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [Requester] trait.
    /// * `menu_page_size` - Number of countries per menu.
    /// * `diagnostics` - Whether raw payloads and fetch results are logged.
    pub fn new(requester: R, menu_page_size: usize, diagnostics: bool) -> Self {
        Commander {
            stats: StatsService::new(requester, diagnostics),
            menu_page_size,
            diagnostics,
        }
    }

    /// Parses an envelope into an [`Invocation`].
    ///
    /// # Returns
    ///
    /// * `Ok(Invocation)` - The event is a trigger of the bot
    /// * `Err(CommandParseError)` - The event must be ignored
    pub fn parse(&self, envelope: &SlackEnvelope) -> Result<Invocation, CommandParseError> {
        if self.diagnostics {
            debug!("payload of {} -> {}", envelope.envelope_id, envelope.payload);
        }

        Trigger::parse(&envelope.event)
    }

    /// Executes a trigger and returns the reply.
    ///
    /// # Command Handlers
    ///
    /// - [`Operation::Greet`] → [`handle_greeting`]
    /// - [`Operation::GreetByHour`] → [`handle_hello`]
    /// - [`Operation::CountryList`] → [`handle_country_list`]
    /// - [`Operation::CountryInfo`] → [`handle_country_info`]
    pub async fn execute(&self, trigger: &Trigger, context: &CommandContext) -> CommandResult {
        let operation = trigger.operation();
        debug!("{:?} -> {:?}", trigger, operation);

        match operation {
            Operation::Greet => handle_greeting(context),
            Operation::GreetByHour => handle_hello(context),
            Operation::CountryList => handle_country_list(&self.stats, self.menu_page_size).await,
            Operation::CountryInfo(country) => handle_country_info(&self.stats, &country).await,
        }
    }
}
