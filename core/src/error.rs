//! Error types for hook binding and configuration

use thiserror::Error;

/// Errors raised when binding a hook set to a context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// No hook set was supplied to a bind call
    ///
    /// Binding nothing is a caller bug: a successful bind promises the
    /// caller's hooks are live.
    #[error("nil hook set: cannot bind a missing {hook_set}")]
    MissingHookSet {
        /// Type name of the hook set that was expected
        hook_set: &'static str,
    },
}

/// Errors raised while loading or validating a [`LogConfig`](crate::config::LogConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The log level is not one of trace, debug, info, warn, error
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// An event name does not match any slot of the hook set being configured
    #[error("Unknown event `{event}` for {hook_set}")]
    UnknownEvent {
        /// The offending event name
        event: String,
        /// Type name of the hook set validated against
        hook_set: &'static str,
    },

    /// An environment value could not be interpreted
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Raw value found
        value: String,
    },
}
