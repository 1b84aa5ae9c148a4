//! Process settings from the environment and connection settings from the JSON config file.

use crate::error::ProbeError;
use crate::json::parse_json_with_context;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5432;
const DEFAULT_SCHEMA: &str = "public";
const APPLICATION_NAME: &str = "queryprobe";

/// Process-wide settings, read from the environment once at startup.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Level applied to this crate's log targets unless `RUST_LOG` is set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Never fails: settings that cannot be decoded (e.g. `LOG_LEVEL=1`) fall
    /// back to the defaults with a note on stderr, since logging is not set up yet.
    pub fn load() -> Self {
        Self::from_figment(Figment::new().merge(Env::raw()))
    }

    fn from_figment(figment: Figment) -> Self {
        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Ignoring invalid environment config ({e}); using defaults");
                Self::default()
            }
        }
    }
}

/// Connection settings for the probed service.
///
/// Either `url` or `host` must be present. When `url` is given the discrete
/// endpoint fields are ignored, except `schema` and `connect_timeout_secs`.
#[derive(custom_debug_derive::Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    #[debug(with = "crate::fmt::redacted")]
    pub password: Option<String>,
    #[serde(default = "default_schema")]
    pub schema: String,
    pub ssl_mode: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

impl ConnectionConfig {
    /// Read and validate the config file at `path`. Nothing is cached.
    pub fn load(path: &Path) -> Result<Self, ProbeError> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&body)
            .map_err(|e| ProbeError::Config(format!("invalid config {}: {e}", path.display())))
    }

    fn parse(body: &str) -> Result<Self, String> {
        let config: Self = parse_json_with_context(body).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.url.is_none() {
            if self.host.as_deref().is_none_or(str::is_empty) {
                return Err("either `url` or `host` must be set".to_string());
            }
            if self.user.as_deref().is_none_or(str::is_empty) {
                return Err("`user` is required when connecting by `host`".to_string());
            }
        }
        if self.schema.is_empty() {
            return Err("`schema` must not be empty".to_string());
        }
        if self.connect_timeout_secs == Some(0) {
            return Err("`connect_timeout_secs` must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Driver options for a single connection.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ProbeError> {
        let options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|e| ProbeError::Config(format!("invalid `url`: {e}")))?,
            None => {
                let mut options = PgConnectOptions::new()
                    .host(self.host.as_deref().unwrap_or_default())
                    .port(self.port)
                    .username(self.user.as_deref().unwrap_or_default());
                if let Some(password) = &self.password {
                    options = options.password(password);
                }
                if let Some(database) = &self.database {
                    options = options.database(database);
                }
                if let Some(ssl_mode) = &self.ssl_mode {
                    let mode = PgSslMode::from_str(ssl_mode)
                        .map_err(|e| ProbeError::Config(format!("invalid `ssl_mode`: {e}")))?;
                    options = options.ssl_mode(mode);
                }
                options
            }
        };

        Ok(options
            .application_name(APPLICATION_NAME)
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1)))
    }
}
