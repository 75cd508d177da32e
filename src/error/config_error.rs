use thiserror::Error;

/// Errors raised by the string-keyed option setter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown option \"{key}\".")]
    UnknownKey { key: String },
    #[error("Invalid value \"{value}\" for option \"{key}\".")]
    InvalidValue { key: String, value: String },
}
