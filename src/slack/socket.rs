//! Socket Mode connection loop.
//!
//! The loop opens a WebSocket url with `apps.connections.open`, reads frames
//! until the connection drops, then reconnects with a [`ReconnectPolicy`].
//! Every envelope is handed to a callback which is responsible for
//! acknowledging it.

use std::{sync::Arc, time::Duration};

use anyhow::bail;
use futures::StreamExt;
use log::{debug, error, info, warn};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::slack::{client::SlackClient, events::SlackEnvelope};

/// Delay added for each consecutive failure.
pub const RECONNECT_DELAY_SECS: u64 = 5;
/// Upper bound of the reconnect delay.
pub const MAX_RECONNECT_DELAY_SECS: u64 = 30;
/// Number of consecutive failures after which the loop gives up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// A text frame received from Socket Mode.
#[derive(Debug, PartialEq)]
pub enum Frame {
    /// Sent once the connection is ready.
    Hello,
    /// Slack is about to close the connection, with the reason.
    Disconnect(String),
    /// An envelope to acknowledge and process.
    Envelope(SlackEnvelope),
    /// Anything that could not be understood.
    Unknown,
}

/// Decodes a text frame.
pub fn parse_frame(text: &str) -> Frame {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Frame::Unknown;
    };

    match value.get("type").and_then(Value::as_str) {
        Some("hello") => Frame::Hello,
        Some("disconnect") => Frame::Disconnect(
            value
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_owned(),
        ),
        _ => match SlackEnvelope::parse(text) {
            Ok(envelope) => Frame::Envelope(envelope),
            Err(e) => {
                debug!("failed to parse socket mode frame: {}", e);
                Frame::Unknown
            }
        },
    }
}

/// Linear backoff between reconnection attempts.
///
/// The delay grows by [`RECONNECT_DELAY_SECS`] for each consecutive failure,
/// up to [`MAX_RECONNECT_DELAY_SECS`]. Only a connection that received the
/// `hello` frame resets it.
#[derive(Debug, Default)]
pub struct ReconnectPolicy {
    failures: u32,
}

impl ReconnectPolicy {
    /// Records a failure and returns the delay before the next attempt, or
    /// `None` when too many consecutive attempts failed.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.failures += 1;
        if self.failures > MAX_RECONNECT_ATTEMPTS {
            return None;
        }

        let secs = (RECONNECT_DELAY_SECS * u64::from(self.failures)).min(MAX_RECONNECT_DELAY_SECS);
        Some(Duration::from_secs(secs))
    }

    /// Returns the delay before reconnecting once a connection closed.
    ///
    /// A connection that never received `hello` counts as a failure.
    pub fn connection_closed(&mut self, ready: bool) -> Option<Duration> {
        if ready {
            self.reset();
            return Some(Duration::ZERO);
        }
        self.next_delay()
    }

    /// Forgets previous failures.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

/// Socket Mode connection driver.
pub struct SocketMode {
    client: Arc<SlackClient>,
}

impl SocketMode {
    pub fn new(client: Arc<SlackClient>) -> Self {
        SocketMode { client }
    }

    /// Runs the connection loop.
    ///
    /// `on_envelope` is called for every envelope received; it must not block.
    ///
    /// # Errors
    ///
    /// Returns an error once [`MAX_RECONNECT_ATTEMPTS`] consecutive attempts
    /// to connect failed.
    pub async fn run<F>(&self, on_envelope: F) -> Result<(), anyhow::Error>
    where
        F: Fn(SlackEnvelope) + Send + Sync + 'static,
    {
        let mut policy = ReconnectPolicy::default();

        loop {
            let delay = match self.connect_and_read(&on_envelope).await {
                Ok(ready) => {
                    info!("socket mode connection closed");
                    policy.connection_closed(ready)
                }
                Err(e) => {
                    error!("socket mode connection failed: {:#}", e);
                    policy.next_delay()
                }
            };

            let Some(delay) = delay else {
                bail!(
                    "giving up after {} failed socket mode connections",
                    MAX_RECONNECT_ATTEMPTS
                );
            };
            if delay.is_zero() {
                info!("reconnecting");
                continue;
            }
            info!(
                "reconnecting in {} seconds (attempt {})",
                delay.as_secs(),
                policy.failures()
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Opens one connection and reads it until it closes.
    ///
    /// Returns `Ok` when an established connection ends, with whether it
    /// received the `hello` frame, and `Err` when the connection could not be
    /// established.
    async fn connect_and_read<F>(&self, on_envelope: &F) -> Result<bool, anyhow::Error>
    where
        F: Fn(SlackEnvelope),
    {
        let ws_url = self.client.open_connection().await?;
        let (stream, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
        info!("connected to slack socket mode");

        let (write, mut read) = stream.split();
        self.client.attach(write).await;

        let mut ready = false;
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match parse_frame(text.as_str()) {
                    Frame::Hello => {
                        info!("socket mode is ready");
                        ready = true;
                    }
                    Frame::Disconnect(reason) => {
                        info!("slack requested a disconnect: {}", reason);
                        break;
                    }
                    Frame::Envelope(envelope) => on_envelope(envelope),
                    Frame::Unknown => debug!("ignoring frame {}", text.as_str()),
                },
                Ok(Message::Close(_)) => {
                    info!("socket mode connection closed by slack");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("socket mode read error: {}", e);
                    break;
                }
            }
        }

        self.client.detach().await;
        Ok(ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::events::SlackEvent;

    #[test]
    fn test_parse_hello_frame() {
        let frame = r#"{"type": "hello", "num_connections": 1, "connection_info": {"app_id": "A1"}}"#;

        assert_eq!(parse_frame(frame), Frame::Hello);
    }

    #[test]
    fn test_parse_disconnect_frame() {
        let frame = r#"{"type": "disconnect", "reason": "refresh_requested"}"#;

        assert_eq!(
            parse_frame(frame),
            Frame::Disconnect("refresh_requested".to_owned())
        );
    }

    #[test]
    fn test_parse_envelope_frame() {
        let frame = r#"{
            "envelope_id": "env-1",
            "type": "slash_commands",
            "payload": {"command": "/hello", "text": "", "user_id": "U1", "response_url": "https://hooks.slack.com/1"}
        }"#;

        match parse_frame(frame) {
            Frame::Envelope(envelope) => {
                assert_eq!(envelope.envelope_id, "env-1");
                assert!(matches!(envelope.event, SlackEvent::SlashCommand(_)));
            }
            other => panic!("Expected Envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_undecodable_envelope_is_still_an_envelope() {
        let frame = r#"{"envelope_id":"env-9","type":"interactive","payload":{"type":"block_actions","actions":[]}}"#;

        match parse_frame(frame) {
            Frame::Envelope(envelope) => {
                assert_eq!(envelope.envelope_id, "env-9");
                assert!(matches!(envelope.event, SlackEvent::Unsupported { .. }));
            }
            other => panic!("Expected Envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_frame() {
        assert_eq!(parse_frame("not json"), Frame::Unknown);
        assert_eq!(parse_frame(r#"{"type": "events_api"}"#), Frame::Unknown);
    }

    #[test]
    fn test_reconnect_delay_grows_linearly_and_is_capped() {
        let mut policy = ReconnectPolicy::default();

        let delays: Vec<u64> = (0..8)
            .map(|_| policy.next_delay().unwrap().as_secs())
            .collect();

        assert_eq!(delays, vec![5, 10, 15, 20, 25, 30, 30, 30]);
    }

    #[test]
    fn test_reconnect_gives_up_after_max_attempts() {
        let mut policy = ReconnectPolicy::default();

        for _ in 0..MAX_RECONNECT_ATTEMPTS {
            assert!(policy.next_delay().is_some());
        }

        assert_eq!(policy.next_delay(), None);
    }

    #[test]
    fn test_reconnect_reset() {
        let mut policy = ReconnectPolicy::default();
        policy.next_delay();
        policy.next_delay();

        policy.reset();

        assert_eq!(policy.failures(), 0);
        assert_eq!(policy.next_delay(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_connection_closed_before_hello_backs_off() {
        let mut policy = ReconnectPolicy::default();

        let delays: Vec<Option<Duration>> = (0..MAX_RECONNECT_ATTEMPTS + 1)
            .map(|_| policy.connection_closed(false))
            .collect();

        assert_eq!(delays[0], Some(Duration::from_secs(5)));
        assert_eq!(delays[1], Some(Duration::from_secs(10)));
        assert!(delays[..MAX_RECONNECT_ATTEMPTS as usize]
            .iter()
            .all(|delay| delay.is_some_and(|delay| !delay.is_zero())));
        assert_eq!(delays[MAX_RECONNECT_ATTEMPTS as usize], None);
    }

    #[test]
    fn test_connection_closed_after_hello_resets() {
        let mut policy = ReconnectPolicy::default();
        policy.next_delay();
        policy.next_delay();

        assert_eq!(policy.connection_closed(true), Some(Duration::ZERO));
        assert_eq!(policy.failures(), 0);
        assert_eq!(policy.connection_closed(false), Some(Duration::from_secs(5)));
    }
}
