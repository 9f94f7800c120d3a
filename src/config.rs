//! Configuration structures for the covibot.
//!
//! This module defines the configuration format. The configuration is split into
//! the stats provider settings, the Slack credentials and the operating mode.
//! Values are read from an optional YAML file and overridden by environment
//! variables.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Stats provider configuration
//! stats:
//!   # Base URL of the disease.sh compatible API
//!   url: "https://disease.sh/v3/covid-19"
//!   # Number of countries per selection menu
//!   menu_page_size: 20
//!
//! # Slack application configuration
//! slack:
//!   # Bot user OAuth token, used to post messages
//!   bot_token: "xoxb-..."
//!   # App-level token, used to open the Socket Mode connection
//!   app_token: "xapp-..."
//!
//! # production or development
//! mode: production
//! ```
//!
//! # Environment Variables
//!
//! Any value can be overridden with the `COVIBOT_` prefix, nested keys being
//! separated by `__` (for example `COVIBOT_SLACK__BOT_TOKEN`). The flat
//! variables `BASE_URL`, `NUM_OF_MENU_ITEMS`, `SLACK_BOT_TOKEN`,
//! `SLACK_APP_TOKEN` and `MODE` are also recognized and take precedence.
//! `NODE_ENV=development` turns the development mode on unless `MODE` is set.

use std::fmt;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Deserializer, de::IgnoredAny};

/// Default base URL of the stats provider.
pub const DEFAULT_STATS_URL: &str = "https://disease.sh/v3/covid-19";

/// Default number of countries displayed in a single selection menu.
pub const DEFAULT_MENU_PAGE_SIZE: usize = 20;

/// Slack refuses `static_select` menus with more options than this.
pub const MAX_MENU_PAGE_SIZE: usize = 100;

/// Root configuration structure for the covibot.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Stats provider configuration
    #[serde(default)]
    pub stats: Stats,
    /// Slack application configuration
    pub slack: Slack,
    /// Operating mode
    #[serde(default)]
    pub mode: Mode,
}

/// Stats provider configuration.
///
/// # YAML Section
///
/// ```yaml
/// stats:
///   url: "https://disease.sh/v3/covid-19"
///   menu_page_size: 20
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Stats {
    /// Base URL of the stats provider.
    ///
    /// Trailing slashes are removed by [`Config::load`].
    #[serde(default = "default_stats_url")]
    pub url: String,

    /// Number of countries per selection menu.
    ///
    /// Anything that is not a positive integer falls back to
    /// [`DEFAULT_MENU_PAGE_SIZE`], and values above [`MAX_MENU_PAGE_SIZE`] are
    /// clamped.
    #[serde(default = "default_menu_page_size", deserialize_with = "lenient_page_size")]
    pub menu_page_size: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            url: default_stats_url(),
            menu_page_size: DEFAULT_MENU_PAGE_SIZE,
        }
    }
}

/// Slack application credentials.
///
/// # YAML Section
///
/// ```yaml
/// slack:
///   bot_token: "xoxb-..."
///   app_token: "xapp-..."
/// ```
#[derive(Deserialize, Clone, PartialEq)]
pub struct Slack {
    /// Bot user OAuth token (`xoxb-`), used with `chat.postMessage`.
    pub bot_token: String,
    /// App-level token (`xapp-`), used with `apps.connections.open`.
    pub app_token: String,
}

impl fmt::Debug for Slack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Slack")
            .field("bot_token", &redact(&self.bot_token))
            .field("app_token", &redact(&self.app_token))
            .finish()
    }
}

/// Operating mode of the bot.
///
/// The development mode turns on verbose diagnostics: raw Slack payloads and
/// raw stats provider responses are written to the log. Any value other than
/// `development` (case insensitive) selects the production mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Production,
    Development,
}

impl Mode {
    pub fn is_development(&self) -> bool {
        *self == Mode::Development
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawMode {
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match RawMode::deserialize(deserializer)? {
            RawMode::Text(text) if text.trim().eq_ignore_ascii_case("development") => {
                Mode::Development
            }
            _ => Mode::Production,
        })
    }
}

impl Config {
    /// Loads the configuration from a YAML file and the environment.
    ///
    /// The file is optional: a missing file is ignored and every value can be
    /// provided through the environment instead.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value (the Slack tokens) is missing or
    /// if a value has the wrong type.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(node_env())
            .merge(Env::prefixed("COVIBOT_").split("__"))
            .merge(legacy_env())
            .extract()?;

        // Endpoints are built by appending path segments
        let trimmed_len = config.stats.url.trim_end_matches('/').len();
        config.stats.url.truncate(trimmed_len);

        Ok(config)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "stats.url={}, stats.menu_page_size={}, slack.bot_token={}, slack.app_token={}, mode={:?}",
            self.stats.url,
            self.stats.menu_page_size,
            redact(&self.slack.bot_token),
            redact(&self.slack.app_token),
            self.mode
        )
    }
}

/// Flat variable names kept for existing deployments.
fn legacy_env() -> Env {
    Env::raw()
        .only(&[
            "BASE_URL",
            "NUM_OF_MENU_ITEMS",
            "SLACK_BOT_TOKEN",
            "SLACK_APP_TOKEN",
            "MODE",
        ])
        .map(|key| match key.as_str().to_ascii_uppercase().as_str() {
            "BASE_URL" => "stats.url".into(),
            "NUM_OF_MENU_ITEMS" => "stats.menu_page_size".into(),
            "SLACK_BOT_TOKEN" => "slack.bot_token".into(),
            "SLACK_APP_TOKEN" => "slack.app_token".into(),
            _ => "mode".into(),
        })
}

/// `NODE_ENV` selects the mode of deployments predating `MODE`, which wins
/// when both are set.
fn node_env() -> Env {
    Env::raw().only(&["NODE_ENV"]).map(|_| "mode".into())
}

fn default_stats_url() -> String {
    DEFAULT_STATS_URL.to_owned()
}

fn default_menu_page_size() -> usize {
    DEFAULT_MENU_PAGE_SIZE
}

/// Accepts numbers and strings starting with an integer (`"25abc"` is 25),
/// anything else means "use the default". Fractions are truncated.
fn lenient_page_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPageSize {
        Number(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let requested = match RawPageSize::deserialize(deserializer)? {
        RawPageSize::Number(n) => Some(n),
        RawPageSize::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        RawPageSize::Float(_) | RawPageSize::Other(_) => None,
        RawPageSize::Text(text) => leading_integer(&text),
    };

    Ok(match requested {
        Some(n) if n > 0 => (n as u64).min(MAX_MENU_PAGE_SIZE as u64) as usize,
        _ => DEFAULT_MENU_PAGE_SIZE,
    })
}

/// Parses the optional sign and the digits at the start of `text`, after
/// leading whitespace.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }

    let sign_len = text.len() - unsigned.len();
    text[..sign_len + digits].parse::<i64>().ok()
}

fn redact(token: &str) -> String {
    match token.split_once('-') {
        Some((kind, _)) if !kind.is_empty() => format!("{}-***", kind),
        _ => "***".to_owned(),
    }
}
