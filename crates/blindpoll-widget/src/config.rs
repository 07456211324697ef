//! Widget configuration.

use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `BLINDPOLL_SINGLE_FLIGHT`.
pub const ENV_PREFIX: &str = "BLINDPOLL_";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Unknown configuration key
    #[error("Unknown configuration key: {key}")]
    UnknownKey {
        /// Offending key
        key: String,
    },

    /// Value could not be parsed for its key
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Key being set
        key: String,
        /// Raw value
        value: String,
    },
}

/// Settings for one poll widget.
///
/// The poll itself is chosen by the injected store handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Refuse a submission while another one from this widget is in flight.
    ///
    /// Off by default: concurrent submissions each run their own
    /// fetch-validate-write sequence and the last writer wins.
    pub single_flight: bool,
}

impl WidgetConfig {
    /// Set a value by key name (`single_flight`).
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "single_flight" => self.single_flight = parse_bool(value).ok_or_else(invalid)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Apply `BLINDPOLL_SINGLE_FLIGHT` from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from `(name, value)` pairs; names without the prefix
    /// or for other settings are ignored.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_lowercase();
            if key == "single_flight" {
                self.set_from_string(&key, &value)?;
            }
        }
        Ok(())
    }
}

/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_optimistic_submissions() {
        assert!(!WidgetConfig::default().single_flight);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = WidgetConfig::default();
        config
            .merge_with_vars([
                ("BLINDPOLL_POLL_ID".to_string(), "not read here".to_string()),
                ("BLINDPOLL_SINGLE_FLIGHT".to_string(), "yes".to_string()),
                ("BLINDPOLL_STORE_PATH".to_string(), "ignored".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ])
            .unwrap();

        assert!(config.single_flight);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = WidgetConfig::default();
        assert_eq!(
            config.set_from_string("single_flight", "maybe"),
            Err(ConfigError::InvalidValue {
                key: "single_flight".into(),
                value: "maybe".into()
            })
        );
        assert!(matches!(
            config.set_from_string("poll_id", "3"),
            Err(ConfigError::UnknownKey { .. })
        ));
    }
}
