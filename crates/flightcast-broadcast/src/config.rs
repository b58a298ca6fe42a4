//! Broadcast configuration surface.
//!
//! [`BroadcastConfig`] carries the opaque handles the external seams
//! need: the subscriber table behind the registry and the push-delivery
//! endpoint behind the transport. Values are string key-value
//! properties, populated programmatically or from the environment by
//! the entrypoint.

use std::collections::HashMap;
use std::fmt;

use crate::error::ConfigError;

/// Configuration key for the subscriber registry table handle.
pub const SUBSCRIBERS_TABLE: &str = "subscribers.table";

/// Configuration key for the push-delivery endpoint handle.
pub const PUSH_ENDPOINT: &str = "push.endpoint";

/// Environment variable mapped to [`SUBSCRIBERS_TABLE`].
pub const SUBSCRIBERS_TABLE_ENV: &str = "SUBSCRIBERS_TABLE";

/// Environment variable mapped to [`PUSH_ENDPOINT`].
pub const PUSH_ENDPOINT_ENV: &str = "PUSH_ENDPOINT";

/// String key-value configuration for the broadcast pipeline.
#[derive(Debug, Clone, Default)]
pub struct BroadcastConfig {
    properties: HashMap<String, String>,
}

impl BroadcastConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from the process environment.
    ///
    /// Reads [`SUBSCRIBERS_TABLE_ENV`] and [`PUSH_ENDPOINT_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when either variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        for (env_var, key) in [
            (SUBSCRIBERS_TABLE_ENV, SUBSCRIBERS_TABLE),
            (PUSH_ENDPOINT_ENV, PUSH_ENDPOINT),
        ] {
            let value = std::env::var(env_var)
                .map_err(|_| ConfigError::MissingKey(key.to_string()))?;
            config.set(key, value);
        }
        Ok(config)
    }

    /// Sets a configuration property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Gets a configuration property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Gets a required configuration property.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if the key is not set.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Gets a property parsed as the given type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value cannot be parsed.
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(v) => v.parse::<T>().map(Some).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Returns the subscriber registry table handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if not configured.
    pub fn subscribers_table(&self) -> Result<&str, ConfigError> {
        self.require(SUBSCRIBERS_TABLE)
    }

    /// Returns the push-delivery endpoint handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if not configured.
    pub fn push_endpoint(&self) -> Result<&str, ConfigError> {
        self.require(PUSH_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = BroadcastConfig::new();
        config.set(SUBSCRIBERS_TABLE, "subscribers");
        config.set(PUSH_ENDPOINT, "https://push.example.com/prod");

        assert_eq!(config.subscribers_table().unwrap(), "subscribers");
        assert_eq!(
            config.push_endpoint().unwrap(),
            "https://push.example.com/prod"
        );
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_require_missing_key() {
        let config = BroadcastConfig::new();
        let err = config.subscribers_table().unwrap_err();
        assert!(err.to_string().contains(SUBSCRIBERS_TABLE));
    }

    #[test]
    fn test_get_parsed() {
        let mut config = BroadcastConfig::new();
        config.set("delivery.timeout.ms", "2500");
        config.set("bad_number", "nope");

        let timeout: Option<u64> = config.get_parsed("delivery.timeout.ms").unwrap();
        assert_eq!(timeout, Some(2500));

        let missing: Option<u64> = config.get_parsed("missing").unwrap();
        assert_eq!(missing, None);

        let bad: Result<Option<u64>, _> = config.get_parsed("bad_number");
        assert!(bad.is_err());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(SUBSCRIBERS_TABLE_ENV, "subscribers-test");
        std::env::set_var(PUSH_ENDPOINT_ENV, "https://push.example.com/test");

        let config = BroadcastConfig::from_env().unwrap();
        assert_eq!(config.subscribers_table().unwrap(), "subscribers-test");
        assert_eq!(
            config.push_endpoint().unwrap(),
            "https://push.example.com/test"
        );

        std::env::remove_var(SUBSCRIBERS_TABLE_ENV);
        std::env::remove_var(PUSH_ENDPOINT_ENV);
    }
}
