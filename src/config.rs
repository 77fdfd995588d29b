//! Configuration management for the field sales manager service

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::analytics::risk::RiskThresholds;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Backend the manager endpoints are forwarded to
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Name of the session cookie forwarded to the backend
    pub session_cookie: String,
    /// Request timeout; unset means requests run to completion
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Day thresholds for the last-visit and last-order risk bands
#[derive(Debug, Deserialize, Clone)]
pub struct RiskConfig {
    pub visit_warn_days: i64,
    pub visit_danger_days: i64,
    pub order_warn_days: i64,
    pub order_danger_days: i64,
}

impl RiskConfig {
    pub fn visit_thresholds(&self) -> RiskThresholds {
        RiskThresholds::new(self.visit_warn_days, self.visit_danger_days)
    }

    pub fn order_thresholds(&self) -> RiskThresholds {
        RiskThresholds::new(self.order_warn_days, self.order_danger_days)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub risk: RiskConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables, e.g. FIELDSALES_UPSTREAM__BASE_URL
            .add_source(
                Environment::with_prefix("FIELDSALES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override backend URL from UPSTREAM_URL env var if present
            .set_override_option("upstream.base_url", env::var("UPSTREAM_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            session_cookie: "session".to_string(),
            timeout_seconds: None,
            user_agent: concat!("fieldsales-manager/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            visit_warn_days: 7,
            visit_danger_days: 14,
            order_warn_days: 14,
            order_danger_days: 30,
        }
    }
}
