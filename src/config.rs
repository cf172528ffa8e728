//! Configuration management for topsync.
//!
//! Values come from the process environment, optionally seeded from `.env`
//! files. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`topsync/.env`)
//!
//! [`Settings`] is built from a key lookup function so that the parsing rules
//! can be exercised without touching the process environment.

use std::{env, path::PathBuf, time::Duration};

pub const DATA_API_BASE_URL: &str = "DATA_API_BASE_URL";
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const QUEUE_URL: &str = "QUEUE_URL";
pub const TOKEN_URL: &str = "TOKEN_URL";
pub const TOKEN_GRANT: &str = "TOKEN_GRANT";
pub const CLIENT_ID: &str = "CLIENT_ID";
pub const CLIENT_SECRET: &str = "CLIENT_SECRET";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(String),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Loads environment variables from `.env` files.
///
/// The working directory file is read first so it wins over the file in the
/// local data directory (`dotenv` never overrides variables already set).
/// Runs before logging is set up, so the loaded files are returned for the
/// caller to report. Returns an error only when neither file could be loaded.
pub async fn load_env() -> Result<Vec<PathBuf>, String> {
    let local = dotenv::dotenv();

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("topsync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }
    let shared = dotenv::from_path(&path).map(|_| path);

    match (local, shared) {
        (Err(e), Err(_)) => Err(format!("no .env file found: {}", e)),
        (local, shared) => Ok(local.into_iter().chain(shared).collect()),
    }
}

/// Client credentials sent as HTTP basic auth with a form token grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// How the refresh grant is sent to the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// JSON body `{"refresh_token": ...}`.
    Json,
    /// `application/x-www-form-urlencoded` OAuth refresh grant.
    Form { client: Option<ClientCredentials> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_api_base_url: String,
    pub request_timeout: Duration,
    pub queue_url: String,
    pub token_url: String,
    pub token_grant: TokenGrant,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()));

        let data_api_base_url = required(DATA_API_BASE_URL)?
            .trim_end_matches('/')
            .to_string();

        let raw_timeout = required(REQUEST_TIMEOUT)?;
        let request_timeout = raw_timeout
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| *t > 0.0)
            .and_then(|t| Duration::try_from_secs_f64(t).ok())
            .ok_or_else(|| ConfigError::Invalid {
                key: REQUEST_TIMEOUT.to_string(),
                value: raw_timeout.clone(),
            })?;

        let queue_url = required(QUEUE_URL)?;

        let token_url = lookup(TOKEN_URL)
            .unwrap_or_else(|| format!("{}/auth/tokens/refresh", data_api_base_url));

        let token_grant = match lookup(TOKEN_GRANT).as_deref() {
            None | Some("json") => TokenGrant::Json,
            Some("form") => {
                let client = match (lookup(CLIENT_ID), lookup(CLIENT_SECRET)) {
                    (Some(client_id), Some(client_secret)) => Some(ClientCredentials {
                        client_id,
                        client_secret,
                    }),
                    (None, None) => None,
                    (Some(_), None) => return Err(ConfigError::Missing(CLIENT_SECRET.to_string())),
                    (None, Some(_)) => return Err(ConfigError::Missing(CLIENT_ID.to_string())),
                };
                TokenGrant::Form { client }
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: TOKEN_GRANT.to_string(),
                    value: other.to_string(),
                });
            }
        };

        Ok(Settings {
            data_api_base_url,
            request_timeout,
            queue_url,
            token_url,
            token_grant,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.request_timeout
    }
}
