//! HTTP API configuration.
//!
//! Read once at startup and shared read-only (`Arc<HttpApiConfig>`) by every component.

use thiserror::Error;
use url::Url;

/// Task hub used when neither the request nor configuration names one.
pub const DEFAULT_HUB_NAME: &str = "DurableFunctionsHub";

/// Connection name used when neither the request nor configuration names one.
pub const DEFAULT_CONNECTION_NAME: &str = "Storage";

pub const ENV_NOTIFICATION_URL: &str = "OVERSEER_NOTIFICATION_URL";
pub const ENV_HUB_NAME: &str = "OVERSEER_HUB_NAME";
pub const ENV_CONNECTION_NAME: &str = "OVERSEER_CONNECTION_NAME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid notification url '{value}': {source}")]
    InvalidNotificationUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Process-wide, immutable settings of the façade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpApiConfig {
    /// Base webhook URL, e.g. `https://host/runtime/webhooks/durabletask?code=KEY`.
    /// Its query string (typically an access key) is appended to every link.
    pub notification_url: Option<Url>,
    pub default_hub_name: Option<String>,
    pub default_connection_name: Option<String>,
}

impl HttpApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `OVERSEER_*` environment variables. Unset or empty values stay `None`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new();
        if let Some(raw) = non_empty(ENV_NOTIFICATION_URL) {
            config = config.with_notification_url(&raw)?;
        }
        config.default_hub_name = non_empty(ENV_HUB_NAME);
        config.default_connection_name = non_empty(ENV_CONNECTION_NAME);
        Ok(config)
    }

    pub fn with_notification_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidNotificationUrl {
            value: raw.to_string(),
            source,
        })?;
        self.notification_url = Some(url);
        Ok(self)
    }

    pub fn with_hub_name(mut self, name: impl Into<String>) -> Self {
        self.default_hub_name = Some(name.into());
        self
    }

    pub fn with_connection_name(mut self, name: impl Into<String>) -> Self {
        self.default_connection_name = Some(name.into());
        self
    }

    /// `override_name` > configured default > [`DEFAULT_HUB_NAME`].
    pub fn resolve_hub_name<'a>(&'a self, override_name: Option<&'a str>) -> &'a str {
        override_name
            .or(self.default_hub_name.as_deref())
            .unwrap_or(DEFAULT_HUB_NAME)
    }

    /// `override_name` > configured default > [`DEFAULT_CONNECTION_NAME`].
    pub fn resolve_connection_name<'a>(&'a self, override_name: Option<&'a str>) -> &'a str {
        override_name
            .or(self.default_connection_name.as_deref())
            .unwrap_or(DEFAULT_CONNECTION_NAME)
    }
}
