//! Hub configuration.

use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};

use super::errors::{HubError, HubResult};

pub const DEFAULT_MAX_CONCURRENT_GAMES: usize = 100;
pub const DEFAULT_INBOX_CAPACITY: usize = 100;
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 32;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HubConfig {
    /// Games hosted at once, finished or not.
    pub max_concurrent_games: usize,
    /// Queued messages per game actor.
    pub inbox_capacity: usize,
    /// Queued events per subscriber before events get dropped.
    pub subscriber_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_concurrent_games: DEFAULT_MAX_CONCURRENT_GAMES,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            subscriber_capacity: DEFAULT_SUBSCRIBER_CAPACITY,
        }
    }
}

impl HubConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `FIREWORKS_MAX_GAMES`, `FIREWORKS_INBOX_CAPACITY` and
    /// `FIREWORKS_SUBSCRIBER_CAPACITY`, falling back to the defaults for
    /// anything unset.
    pub fn from_env() -> HubResult<Self> {
        let defaults = Self::default();
        let config = Self {
            max_concurrent_games: var_or("FIREWORKS_MAX_GAMES", defaults.max_concurrent_games)?,
            inbox_capacity: var_or("FIREWORKS_INBOX_CAPACITY", defaults.inbox_capacity)?,
            subscriber_capacity: var_or(
                "FIREWORKS_SUBSCRIBER_CAPACITY",
                defaults.subscriber_capacity,
            )?,
        };
        config.validate().map_err(HubError::Config)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_games == 0 {
            return Err("Max concurrent games must be at least 1".to_string());
        }
        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be at least 1".to_string());
        }
        if self.subscriber_capacity == 0 {
            return Err("Subscriber capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> HubResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| HubError::Config(format!("{key} must be a positive integer, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(HubConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = HubConfig {
            max_concurrent_games: 0,
            ..HubConfig::default()
        };
        assert!(config.validate().is_err());

        let config = HubConfig {
            inbox_capacity: 0,
            ..HubConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_var_or_falls_back_when_unset() {
        let value: usize = var_or("FIREWORKS_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }
}
