//! Terminal front-end for the contacts API.

pub mod api;
pub mod input;
pub mod runtime;
pub mod state;
pub mod view;

use std::time::Duration;

pub use api::{ApiClient, ClientError};
pub use state::{Effect, Event, Model};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PAGE_LIMIT: i64 = 5;
pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub page_limit: i64,
    pub banner_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
            banner_ttl: DEFAULT_BANNER_TTL,
        }
    }
}
