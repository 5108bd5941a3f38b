use std::fmt;
use std::time::Duration;

use actix_web::cookie::Key;

const DEFAULT_DEV_PROXY: &str = "http://localhost:8000";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_APP_NAME: &str = "DPR Review Portal";
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingBackendUrl,
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBackendUrl => {
                write!(f, "BACKEND_URL must be set when APP_ENV=production")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive number of seconds, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for talking to the remote DPR API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub bind_addr: String,
    pub app_name: String,
    pub session_key: Option<String>,
    pub remote: RemoteConfig,
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from any key lookup.
    ///
    /// In production the backend URL must come from `BACKEND_URL`; otherwise
    /// requests go to the local development proxy.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let base_url = match environment {
            Environment::Production => get("BACKEND_URL").ok_or(ConfigError::MissingBackendUrl)?,
            Environment::Development => get("DEV_PROXY_URL").unwrap_or_else(|| DEFAULT_DEV_PROXY.to_string()),
        };

        let mut remote = RemoteConfig::new(&base_url);
        if let Some(secs) = parse_secs(get("UPLOAD_TIMEOUT_SECS"), "UPLOAD_TIMEOUT_SECS")? {
            remote.upload_timeout = secs;
        }
        if let Some(secs) = parse_secs(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")? {
            remote.request_timeout = secs;
        }

        Ok(Self {
            environment,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            session_key: get("SESSION_KEY"),
            remote,
        })
    }

    /// Cookie signing key. A key shorter than 64 bytes is rejected in favour
    /// of a random one (sessions are then lost on restart).
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

fn parse_secs(raw: Option<String>, key: &'static str) -> Result<Option<Duration>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::InvalidNumber { key, value }),
        },
    }
}
