//! Covibot - A Slack bot displaying COVID-19 statistics.
//!
//! This is the main entry point for covibot, which answers Slack messages,
//! slash commands and menu actions with statistics fetched from a disease.sh
//! compatible API.
//!
//! # Features
//!
//! - **Greetings**: Answers messages containing `hello` and the `/hello` command
//! - **Country Menu**: `/covid19` lists every country in paginated select menus
//! - **Country Stats**: `/covid19 <country>` shows active, critical, recovered,
//!   cases, deaths and tests, with refresh and back buttons
//! - **World Stats**: `/covid19 all` shows the worldwide aggregate
//! - **Socket Mode**: No public endpoint needed, the bot connects to Slack
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! stats:
//!   url: "https://disease.sh/v3/covid-19"
//!   menu_page_size: 20
//!
//! slack:
//!   bot_token: "xoxb-..."
//!   app_token: "xapp-..."
//!
//! mode: production
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export COVIBOT_SLACK__BOT_TOKEN="xoxb-..."
//! export COVIBOT_SLACK__APP_TOKEN="xapp-..."
//! # or the flat variables
//! export BASE_URL="https://disease.sh/v3/covid-19"
//! export NUM_OF_MENU_ITEMS=25
//! export SLACK_BOT_TOKEN="xoxb-..."
//! export SLACK_APP_TOKEN="xapp-..."
//! export MODE=development
//! ```
//!
//! # Usage
//!
//! ```bash
//! covibot --config config.yaml
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Socket Mode loop and envelope handling
//! - [`commands`] - Trigger parsing, routing and reply formatting
//! - [`config`] - Configuration loading with environment variable support
//! - [`slack`] - Slack Socket Mode, Web API client and Block Kit types
//! - [`stats`] - Stats provider API client
//! - [`utils`] - Number formatting
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`, `debug` in development mode)

use chrono::Local;
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod slack;
mod stats;
mod utils;

/// Command-line arguments for covibot.
///
/// # Examples
///
/// ```bash
/// covibot --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// The file is optional when every required value is provided through
    /// environment variables.
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

/// Main entry point for covibot.
///
/// 1. **Argument Parsing**: Parses command-line arguments using `clap`
/// 2. **Configuration Loading**: Reads the YAML file and environment variables
/// 3. **Logging Setup**: `info` by default, `debug` in development mode
///    (can be overridden with the `RUST_LOG` environment variable)
/// 4. **Bot Execution**: Connects to Slack and answers envelopes until Socket
///    Mode gives up reconnecting
///
/// # Examples
///
/// ```bash
/// RUST_LOG=covibot=debug covibot --config config.yaml
/// ```
#[tokio::main]
async fn main() {
    let args = Args::parse();

    // The mode selects the default log level, so the configuration is loaded first
    let config = Config::load(&args.config);
    let default_filter = match &config {
        Ok(config) if config.mode.is_development() => "debug",
        _ => "info",
    };
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", default_filter));

    info!("Starting covibot {}...", env!("CARGO_PKG_VERSION"));
    info!("Local time is {}", Local::now().format("%Y-%m-%d %H:%M:%S %:z"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    if config.mode.is_development() {
        debug!("Configuration:\n{}", config);
    }

    let bot = Bot::new(config);
    if let Err(e) = bot.start().await {
        error!("Slack connection ended: {:#}", e);
    }
}
