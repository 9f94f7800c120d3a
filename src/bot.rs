//! Bot module wiring Slack and the stats provider.
//!
//! This module provides the main [`Bot`] implementation. It connects to Slack
//! with Socket Mode and answers every envelope in its own task.
//!
//! # Envelope Processing Flow
//!
//! ```text
//! Envelope → Acknowledge → Parse Trigger → Execute → Respond / Say
//! ```
//!
//! The envelope is always acknowledged first, whatever happens next. Events
//! that are not triggers of the bot are dropped after the acknowledgment.
//!
//! # Example
//!
//! ```no_run
//! # use covibot::bot::Bot;
//! # use covibot::config::Config;
//! # async fn run() -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config);
//! bot.start().await?; // Runs until too many reconnections fail
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::{Local, Timelike};
use log::{debug, error, info, warn};

use crate::{
    commands::{CommandContext, Commander, ReplyTarget},
    config::Config,
    slack::{Responder, SlackClient, SlackEnvelope, SocketMode},
    stats::{Requester, StatsRequester},
};

/// Main bot structure.
///
/// All shared state is wrapped in `Arc` and only read by the envelope tasks.
pub struct Bot {
    /// Slack Web API client, also holding the Socket Mode write half
    slack_client: Arc<SlackClient>,
    /// Trigger parser and executor
    commander: Arc<Commander<StatsRequester>>,
}

impl Bot {
    /// Creates a new Bot from the configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration loaded with [`Config::load`]
    pub fn new(config: Config) -> Self {
        let slack_client = Arc::new(SlackClient::new(
            &config.slack.bot_token,
            &config.slack.app_token,
        ));

        let commander = Arc::new(Commander::new(
            StatsRequester::new(&config.stats.url),
            config.stats.menu_page_size,
            config.mode.is_development(),
        ));

        Bot {
            slack_client,
            commander,
        }
    }

    /// Connects to Slack and processes envelopes.
    ///
    /// Each envelope is handled in a spawned task so a slow stats provider
    /// never delays the acknowledgment of the next envelopes.
    ///
    /// # Errors
    ///
    /// Returns an error when Socket Mode gives up reconnecting.
    pub async fn start(self) -> Result<(), anyhow::Error> {
        info!("connecting to slack");

        let socket = SocketMode::new(Arc::clone(&self.slack_client));

        let slack_client = Arc::clone(&self.slack_client);
        let commander = Arc::clone(&self.commander);
        let on_envelope = move |envelope: SlackEnvelope| {
            let slack_client = Arc::clone(&slack_client);
            let commander = Arc::clone(&commander);
            tokio::spawn(async move {
                let hour = Local::now().hour();
                handle_envelope(envelope, &commander, slack_client.as_ref(), hour).await;
            });
        };

        socket.run(on_envelope).await
    }
}

/// Handles one envelope from acknowledgment to reply delivery.
///
/// # Arguments
///
/// * `envelope` - The envelope received from Socket Mode
/// * `commander` - Parses and executes the trigger
/// * `responder` - Acknowledges and delivers the reply
/// * `hour` - Local hour, used by the `/hello` greeting
pub async fn handle_envelope<R: Requester, S: Responder>(
    envelope: SlackEnvelope,
    commander: &Commander<R>,
    responder: &S,
    hour: u32,
) {
    if let Err(e) = responder.acknowledge(&envelope.envelope_id).await {
        error!("failed to acknowledge {}: {:#}", envelope.envelope_id, e);
    }

    let invocation = match commander.parse(&envelope) {
        Ok(invocation) => invocation,
        Err(e) => {
            debug!("ignoring {}: {}", envelope.envelope_id, e);
            return;
        }
    };

    let context = CommandContext {
        user_id: invocation.user_id.clone(),
        hour,
    };
    let result = commander.execute(&invocation.trigger, &context).await;

    let delivery = match &invocation.target {
        ReplyTarget::Channel(channel) => responder.say(channel, &result.reply).await,
        ReplyTarget::ResponseUrl(url) => responder.respond(url, &result.reply).await,
    };
    if let Err(e) = delivery {
        warn!(
            "failed to deliver the reply to {}: {:#}",
            envelope.envelope_id, e
        );
    }
}
