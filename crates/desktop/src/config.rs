//! Client configuration from the environment.

use std::time::Duration;

use crate::types::ReselectPolicy;

pub const API_URL_ENV: &str = "STOCKROOM_API_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "STOCKROOM_REQUEST_TIMEOUT_SECS";
pub const INVENTORY_PATH_ENV: &str = "STOCKROOM_INVENTORY_PATH";
pub const RESELECT_POLICY_ENV: &str = "STOCKROOM_RESELECT_POLICY";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_INVENTORY_PATH: &str = "/inventory";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Path the parent page uses to re-fetch the inventory list.
    pub inventory_path: String,
    pub reselect_policy: ReselectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            inventory_path: DEFAULT_INVENTORY_PATH.to_string(),
            reselect_policy: ReselectPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::default().with_api_url(api_url)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults and
    /// invalid values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(url.trim());
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "{} = {:?} is not a positive number of seconds; using {}",
                    REQUEST_TIMEOUT_ENV,
                    raw,
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        if let Some(path) = lookup(INVENTORY_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            let path = path.trim();
            config.inventory_path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            };
        }

        if let Some(raw) = lookup(RESELECT_POLICY_ENV) {
            match ReselectPolicy::parse(&raw) {
                Some(policy) => config.reselect_policy = policy,
                None => tracing::warn!(
                    "{} = {:?} is not one of supersede, abort-preview, abort-all; using supersede",
                    RESELECT_POLICY_ENV,
                    raw
                ),
            }
        }

        config
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}
