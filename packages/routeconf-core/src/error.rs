//! Error types for request analysis.

use thiserror::Error;

use crate::position::{HasPosition, Position};

/// User-facing analysis errors. Every variant carries the position it blames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfError {
    /// The target shape is never valid for the action
    #[error("{pos}: Incorrect target type for {action}: expected {expected}, got {got}")]
    BadTarget {
        pos: Position,
        action: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    /// A property or target token failed semantic validation
    #[error("{pos}: {message}")]
    FieldValue { pos: Position, message: String },
}

impl ConfError {
    pub(crate) fn field_value(anchor: impl HasPosition, message: impl Into<String>) -> Self {
        ConfError::FieldValue {
            pos: anchor.position(),
            message: message.into(),
        }
    }

    /// The message without the position prefix.
    pub fn message(&self) -> String {
        match self {
            ConfError::BadTarget {
                action,
                expected,
                got,
                ..
            } => format!("Incorrect target type for {action}: expected {expected}, got {got}"),
            ConfError::FieldValue { message, .. } => message.clone(),
        }
    }

    pub fn is_bad_target(&self) -> bool {
        matches!(self, ConfError::BadTarget { .. })
    }
}

impl HasPosition for ConfError {
    fn position(&self) -> Position {
        match self {
            ConfError::BadTarget { pos, .. } | ConfError::FieldValue { pos, .. } => *pos,
        }
    }
}

/// Failures of the endpoint address resolver. These carry no position; the
/// caller anchors them to the token that held the address text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddrError {
    #[error("address {addr}: missing port in address")]
    MissingPort { addr: String },

    #[error("address {addr}: too many colons in address")]
    TooManyColons { addr: String },

    #[error("address {addr}: missing ']' in address")]
    MissingBracket { addr: String },

    #[error("address {addr}: unexpected '{ch}' in address")]
    UnexpectedBracket { addr: String, ch: char },

    #[error("invalid IP {host:?}: host must be a literal IP address")]
    InvalidIp { host: String },

    #[error("unknown port {network}/{service}")]
    UnknownPort { network: String, service: String },

    #[error("invalid port {port}")]
    PortRange { port: String },
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidOverride { var: &'static str, value: String },
}
