//! Slack Web API client.
//!
//! This module provides the [`SlackClient`] struct which opens Socket Mode
//! connections, sends acknowledgments over the WebSocket and posts replies.

use anyhow::{Context, anyhow, bail};
use futures::{SinkExt, stream::SplitSink};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpStream, sync::Mutex};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use crate::slack::{Responder, blocks::ReplyPayload};

/// Base url of the Slack Web API.
pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Write half of a Socket Mode connection.
pub type WsSender = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Answer of the Slack Web API.
///
/// Slack always answers with HTTP 200, failures are reported with `ok: false`.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Body of `chat.postMessage`.
#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    #[serde(flatten)]
    reply: &'a ReplyPayload,
}

/// Client for the Slack Web API and the Socket Mode write half.
pub struct SlackClient {
    /// HTTP client
    http: Client,
    /// Bot token (`xoxb-`), used to post messages
    bot_token: String,
    /// App-level token (`xapp-`), used to open Socket Mode connections
    app_token: String,
    /// Base url of the Web API
    api_url: String,
    /// Write half of the current Socket Mode connection, if any
    ws_write: Mutex<Option<WsSender>>,
}

impl SlackClient {
    /// Create a new [SlackClient] talking to the public Slack API.
    ///
    /// # Arguments
    ///
    /// * `bot_token` - The bot user OAuth token.
    /// * `app_token` - The app-level token with the `connections:write` scope.
    pub fn new(bot_token: &str, app_token: &str) -> Self {
        Self::with_api_url(bot_token, app_token, SLACK_API_URL)
    }

    /// Create a new [SlackClient] talking to another Web API base url.
    pub fn with_api_url(bot_token: &str, app_token: &str, api_url: &str) -> Self {
        SlackClient {
            http: Client::new(),
            bot_token: bot_token.to_owned(),
            app_token: app_token.to_owned(),
            api_url: api_url.trim_end_matches('/').to_owned(),
            ws_write: Mutex::new(None),
        }
    }

    /// Requests a Socket Mode WebSocket url with `apps.connections.open`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or if Slack refuses the app token.
    pub async fn open_connection(&self) -> Result<String, anyhow::Error> {
        let response: ApiResponse = self
            .http
            .post(format!("{}/apps.connections.open", self.api_url))
            .bearer_auth(&self.app_token)
            .send()
            .await
            .context("failed to call apps.connections.open")?
            .json()
            .await
            .context("invalid apps.connections.open response")?;

        if !response.ok {
            bail!(
                "apps.connections.open failed: {}",
                response.error.unwrap_or_else(|| "unknown error".to_owned())
            );
        }

        response
            .url
            .ok_or_else(|| anyhow!("apps.connections.open returned no url"))
    }

    /// Stores the write half of a new connection.
    pub async fn attach(&self, sender: WsSender) {
        *self.ws_write.lock().await = Some(sender);
    }

    /// Drops the write half of the current connection.
    pub async fn detach(&self) {
        *self.ws_write.lock().await = None;
    }

    /// Sends a raw frame on the current connection.
    pub async fn send_frame(&self, message: Message) -> Result<(), anyhow::Error> {
        let mut guard = self.ws_write.lock().await;
        let Some(sender) = guard.as_mut() else {
            bail!("socket mode is not connected");
        };
        sender.send(message).await?;
        Ok(())
    }

    async fn check_api_response(response: reqwest::Response, method: &str) -> anyhow::Result<()> {
        let status = response.status();
        if !status.is_success() {
            bail!("{} failed with status {}", method, status);
        }

        let body: ApiResponse = response
            .json()
            .await
            .with_context(|| format!("invalid {} response", method))?;
        if !body.ok {
            bail!(
                "{} failed: {}",
                method,
                body.error.unwrap_or_else(|| "unknown error".to_owned())
            );
        }

        Ok(())
    }
}

impl Responder for SlackClient {
    /// Sends `{"envelope_id": ...}` on the Socket Mode connection.
    async fn acknowledge(&self, envelope_id: &str) -> Result<(), anyhow::Error> {
        let ack = json!({ "envelope_id": envelope_id }).to_string();
        debug!("ack {}", envelope_id);

        self.send_frame(Message::Text(ack.into())).await
    }

    /// Posts the reply to an interaction `response_url`.
    ///
    /// Response urls answer with a bare `ok` body rather than JSON, so only
    /// the status is checked.
    async fn respond(&self, response_url: &str, reply: &ReplyPayload) -> Result<(), anyhow::Error> {
        let response = self
            .http
            .post(response_url)
            .json(reply)
            .send()
            .await
            .context("failed to post to response_url")?;

        let status = response.status();
        if !status.is_success() {
            bail!("response_url answered with status {}", status);
        }

        Ok(())
    }

    /// Posts the reply to a channel with `chat.postMessage`.
    async fn say(&self, channel: &str, reply: &ReplyPayload) -> Result<(), anyhow::Error> {
        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(&self.bot_token)
            .json(&PostMessage { channel, reply })
            .send()
            .await
            .context("failed to call chat.postMessage")?;

        Self::check_api_response(response, "chat.postMessage").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_open_connection() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/apps.connections.open")
            .match_header("authorization", "Bearer xapp-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "url": "wss://wss-primary.slack.com/link/?ticket=1"}"#)
            .create_async()
            .await;

        let client = SlackClient::with_api_url("xoxb-1", "xapp-1", &server.url());
        let url = client.open_connection().await.unwrap();

        mock.assert_async().await;
        assert_eq!(url, "wss://wss-primary.slack.com/link/?ticket=1");
    }

    #[tokio::test]
    async fn test_open_connection_refused() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/apps.connections.open")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": false, "error": "invalid_auth"}"#)
            .create_async()
            .await;

        let client = SlackClient::with_api_url("xoxb-1", "xapp-1", &server.url());
        let error = client.open_connection().await.unwrap_err();

        assert!(error.to_string().contains("invalid_auth"));
    }

    #[tokio::test]
    async fn test_say_posts_to_channel() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/chat.postMessage")
            .match_header("authorization", "Bearer xoxb-1")
            .match_body(Matcher::Json(json!({
                "channel": "C1",
                "text": "Hello <@U1>!"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = SlackClient::with_api_url("xoxb-1", "xapp-1", &server.url());
        let result = client
            .say("C1", &ReplyPayload::Text("Hello <@U1>!".to_owned()))
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_say_reports_slack_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/chat.postMessage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": false, "error": "channel_not_found"}"#)
            .create_async()
            .await;

        let client = SlackClient::with_api_url("xoxb-1", "xapp-1", &server.url());
        let error = client
            .say("C404", &ReplyPayload::Text("Hello".to_owned()))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("channel_not_found"));
    }

    #[tokio::test]
    async fn test_respond_posts_reply_to_response_url() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/commands/T1/42")
            .match_body(Matcher::Json(json!({
                "type": "plain_text",
                "text": "Country list not found.",
                "emoji": true
            })))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = SlackClient::with_api_url("xoxb-1", "xapp-1", &server.url());
        let response_url = format!("{}/commands/T1/42", server.url());
        let result = client
            .respond(
                &response_url,
                &ReplyPayload::PlainText("Country list not found.".to_owned()),
            )
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_respond_expired_response_url() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/actions/T1/7")
            .with_status(404)
            .with_body("expired_url")
            .create_async()
            .await;

        let client = SlackClient::with_api_url("xoxb-1", "xapp-1", &server.url());
        let response_url = format!("{}/actions/T1/7", server.url());
        let result = client
            .respond(&response_url, &ReplyPayload::Text("Hello".to_owned()))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_acknowledge_without_connection_fails() {
        let client = SlackClient::new("xoxb-1", "xapp-1");

        assert!(client.acknowledge("env-1").await.is_err());
    }
}
