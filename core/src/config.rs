//! Configuration for the built-in logging hooks
//!
//! Controls which lifecycle events the [`logging`](crate::logging) observers
//! report and at what level.
//!
//! # Example
//!
//! ```
//! use reqtrace_core::config::LogConfig;
//! use reqtrace_core::server::ServerTrace;
//!
//! # fn main() -> Result<(), reqtrace_core::error::ConfigError> {
//! let config = LogConfig::from_toml_str(r#"
//!     level = "info"
//!     events = ["got_request", "handler_done"]
//! "#)?;
//! config.validate_for::<ServerTrace>()?;
//!
//! assert!(config.logs("got_request"));
//! assert!(!config.logs("wrote_body_chunk"));
//! # Ok(())
//! # }
//! ```

use std::any::type_name;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::compose::HookSet;
use crate::error::ConfigError;

/// Environment variable holding the log level
pub const ENV_LEVEL: &str = "REQTRACE_LOG_LEVEL";
/// Environment variable holding a comma-separated event list
pub const ENV_EVENTS: &str = "REQTRACE_LOG_EVENTS";
/// Environment variable enabling header logging
pub const ENV_HEADERS: &str = "REQTRACE_LOG_HEADERS";

/// Logging hook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level events are emitted at (trace, debug, info, warn, error)
    pub level: String,
    /// Slot names to log; `None` logs every event
    pub events: Option<Vec<String>>,
    /// Include request and response headers in events
    pub include_headers: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            events: None,
            include_headers: false,
        }
    }
}

impl LogConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML or has
    /// fields of the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from `REQTRACE_LOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an unusable value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a variable lookup function, defaulting anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] for an unknown level and
    /// [`ConfigError::InvalidValue`] for a non-boolean header flag.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LEVEL) {
            parse_level(&level)?;
            config.level = level;
        }

        if let Some(events) = lookup(ENV_EVENTS) {
            let events: Vec<String> = events
                .split(',')
                .map(str::trim)
                .filter(|event| !event.is_empty())
                .map(str::to_string)
                .collect();
            config.events = Some(events);
        }

        if let Some(flag) = lookup(ENV_HEADERS) {
            config.include_headers = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_HEADERS.to_string(),
                        value: flag,
                    });
                },
            };
        }

        Ok(config)
    }

    /// Check the level parses and every configured event names a slot of `H`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] or [`ConfigError::UnknownEvent`].
    pub fn validate_for<H: HookSet>(&self) -> Result<(), ConfigError> {
        parse_level(&self.level)?;

        if let Some(events) = &self.events {
            if let Some(unknown) = events.iter().find(|event| !H::SLOTS.contains(&event.as_str())) {
                return Err(ConfigError::UnknownEvent {
                    event: unknown.clone(),
                    hook_set: type_name::<H>(),
                });
            }
        }
        Ok(())
    }

    /// The configured level as a [`tracing::Level`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] if the level is not recognised.
    pub fn tracing_level(&self) -> Result<Level, ConfigError> {
        parse_level(&self.level)
    }

    /// Returns true if events for `slot` should be logged.
    #[must_use]
    pub fn logs(&self, slot: &str) -> bool {
        self.events
            .as_ref()
            .is_none_or(|events| events.iter().any(|event| event == slot))
    }
}

fn parse_level(level: &str) -> Result<Level, ConfigError> {
    Level::from_str(level.trim()).map_err(|_| ConfigError::InvalidLevel(level.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::ClientTrace;
    use crate::server::ServerTrace;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.tracing_level().unwrap(), Level::DEBUG);
        assert!(config.logs("got_request"));
        assert!(!config.include_headers);
    }

    #[test]
    fn test_toml_partial_document() {
        let config = LogConfig::from_toml_str("include_headers = true").unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.include_headers);
        assert!(config.events.is_none());
    }

    #[test]
    fn test_toml_wrong_type() {
        let err = LogConfig::from_toml_str("include_headers = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_lookup() {
        let config = LogConfig::from_lookup(lookup(&[
            (ENV_LEVEL, "WARN"),
            (ENV_EVENTS, "got_request, handler_done,"),
            (ENV_HEADERS, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.tracing_level().unwrap(), Level::WARN);
        assert_eq!(
            config.events,
            Some(vec!["got_request".to_string(), "handler_done".to_string()])
        );
        assert!(config.include_headers);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = LogConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = LogConfig::from_lookup(lookup(&[(ENV_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));

        let err = LogConfig::from_lookup(lookup(&[(ENV_HEADERS, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_for_checks_slot_names() {
        let config = LogConfig {
            events: Some(vec!["dns_start".to_string()]),
            ..LogConfig::default()
        };

        assert!(config.validate_for::<ClientTrace>().is_ok());
        let err = config.validate_for::<ServerTrace>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEvent { ref event, .. } if event == "dns_start"));
    }
}
