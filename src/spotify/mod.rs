//! # Data API integration
//!
//! Everything that talks to the external data/token API lives here. All
//! network calls go through a single [`Gateway`], which classifies failures
//! uniformly; the rest of the module builds requests and turns the raw JSON
//! into typed records.
//!
//! ```text
//! UserDataCollector (management)
//!          ↓
//! SpotifyApi
//!     ├── auth       token refresh
//!     ├── top_items  per (item type, time range) fetch + per-type fan-out
//!     └── reshape    raw payload → typed records
//!          ↓
//! Gateway (reqwest, JSON)
//! ```

pub mod auth;
pub mod gateway;
pub mod reshape;
pub mod top_items;

use reqwest::Client;

pub use gateway::{ApiRequest, Gateway};
pub use reshape::reshape;

use crate::config::{Settings, TokenGrant};

/// Number of items requested per top-items call.
pub const TOP_ITEMS_LIMIT: u32 = 50;

/// Client for the data API bound to one invocation's HTTP client.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    gateway: Gateway,
    data_api_base_url: String,
    token_url: String,
    token_grant: TokenGrant,
}

impl SpotifyApi {
    pub fn new(
        gateway: Gateway,
        data_api_base_url: impl Into<String>,
        token_url: impl Into<String>,
        token_grant: TokenGrant,
    ) -> Self {
        SpotifyApi {
            gateway,
            data_api_base_url: data_api_base_url.into(),
            token_url: token_url.into(),
            token_grant,
        }
    }

    pub fn from_settings(client: Client, settings: &Settings) -> Self {
        Self::new(
            Gateway::new(client, settings.timeout()),
            settings.data_api_base_url.clone(),
            settings.token_url.clone(),
            settings.token_grant.clone(),
        )
    }
}
