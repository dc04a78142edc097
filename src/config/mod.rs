//! Configuration module for the tickets machine.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Zendesk account settings.
#[derive(Debug, Clone, Default)]
pub struct ZendeskConfig {
    /// Agent-facing base URL, used to build links to created tickets
    pub url: String,
    /// REST API base URL, e.g. `https://acme.zendesk.com/api/v2`
    pub api_url: String,
    /// API user (email address of the token owner)
    pub api_user: String,
    /// API token
    pub api_token: String,
}

impl ZendeskConfig {
    /// Link prefix for a created ticket in the agent interface.
    pub fn agent_ticket_url(&self) -> String {
        format!("{}/agent/tickets/", self.url.trim_end_matches('/'))
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Fast mode: skips the pause between Zendesk submissions
    pub debug: bool,
    /// Pause between two Zendesk submissions
    pub sync_delay: Duration,
    pub zendesk: ZendeskConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("ZTM_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("ZTM_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("ZTM_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| format!("Invalid ZTM_BIND_ADDR format: {}", e))?;

        let log_level = env::var("ZTM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let debug = env::var("ZTM_DEBUG")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let sync_delay_ms = match env::var("ZTM_SYNC_DELAY_MS") {
            Ok(v) => v
                .parse::<u64>()
                .map_err(|e| format!("Invalid ZTM_SYNC_DELAY_MS: {}", e))?,
            Err(_) => 1000,
        };

        let zendesk = ZendeskConfig {
            url: env::var("ZENDESK_URL").unwrap_or_default(),
            api_url: env::var("ZENDESK_API_URL").unwrap_or_default(),
            api_user: env::var("ZENDESK_API_USER").unwrap_or_default(),
            api_token: env::var("ZENDESK_API_TOKEN").unwrap_or_default(),
        };

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            debug,
            sync_delay: Duration::from_millis(sync_delay_ms),
            zendesk,
        })
    }

    /// Pause to apply between submissions, `None` in fast mode.
    pub fn submission_delay(&self) -> Option<Duration> {
        if self.debug || self.sync_delay.is_zero() {
            None
        } else {
            Some(self.sync_delay)
        }
    }
}
