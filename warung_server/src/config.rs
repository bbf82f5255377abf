use std::env;

use log::*;
use tripay_tools::TripayConfig;
use warung_common::Secret;
use warung_engine::db_url;

const DEFAULT_WARUNG_HOST: &str = "127.0.0.1";
const DEFAULT_WARUNG_PORT: u16 = 8370;
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The externally reachable base URL of this server. Tripay posts callbacks to
    /// `<public_url>/tripay-callback` and sends buyers back to `<public_url>/return`.
    pub public_url: String,
    /// An identity to insert into the admin set at startup, so a fresh store has at least one
    /// administrator.
    pub seed_admin: Option<String>,
    pub telegram: TelegramConfig,
    pub tripay: TripayConfig,
}

#[derive(Clone, Debug, Default)]
pub struct TelegramConfig {
    pub bot_token: Secret<String>,
    /// Override for the Bot API endpoint. Tests point this at an unreachable address.
    pub api_base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WARUNG_HOST.to_string(),
            port: DEFAULT_WARUNG_PORT,
            database_url: String::default(),
            public_url: format!("http://{DEFAULT_WARUNG_HOST}:{DEFAULT_WARUNG_PORT}"),
            seed_admin: None,
            telegram: TelegramConfig::default(),
            tripay: TripayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WARUNG_HOST").ok().unwrap_or_else(|| DEFAULT_WARUNG_HOST.into());
        let port = env::var("WARUNG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WARUNG_PORT. {e} Using the default, {DEFAULT_WARUNG_PORT}, \
                         instead."
                    );
                    DEFAULT_WARUNG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WARUNG_PORT);
        let database_url = db_url();
        let public_url = env::var("WARUNG_PUBLIC_URL").ok().unwrap_or_else(|| {
            error!(
                "🪛️ WARUNG_PUBLIC_URL is not set. Tripay cannot reach this server for payment callbacks until it is \
                 set to the public base URL."
            );
            format!("http://{host}:{port}")
        });
        let seed_admin = env::var("WARUNG_SEED_ADMIN").ok().filter(|s| !s.is_empty());
        let telegram = TelegramConfig::from_env_or_default();
        let tripay = TripayConfig::from_env_or_default();
        Self { host, port, database_url, public_url, seed_admin, telegram, tripay }
    }
}

impl TelegramConfig {
    pub fn from_env_or_default() -> Self {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN").ok().unwrap_or_else(|| {
            error!("🪛️ TELEGRAM_BOT_TOKEN is not set. The bot cannot send messages without it.");
            String::default()
        });
        let api_base = env::var("TELEGRAM_API_BASE").ok().unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
        Self { bot_token: Secret::new(bot_token), api_base }
    }
}

/// The URLs embedded into every payment intent. Derived once from [`ServerConfig`] and shared
/// with the request handlers.
#[derive(Clone, Debug)]
pub struct CheckoutUrls {
    pub callback_url: String,
    pub return_url: String,
}

impl CheckoutUrls {
    pub fn from_config(config: &ServerConfig) -> Self {
        let base = config.public_url.trim_end_matches('/');
        Self { callback_url: format!("{base}/tripay-callback"), return_url: format!("{base}/return") }
    }
}
