//! Error types and handling for lint operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lint operations
#[derive(Debug, Error)]
pub enum LintelError {
    /// Rule options rejected by the rule's schema
    #[error("Invalid options for rule '{rule_id}' at {path}: {message}")]
    InvalidOptions {
        rule_id: String,
        path: String,
        message: String,
    },

    /// A rule reported a message id missing from its catalog
    #[error("Rule '{rule_id}' reported unknown message id '{message_id}'")]
    UnknownMessageId { rule_id: String, message_id: String },

    /// A rule id was registered twice
    #[error("Rule '{rule_id}' is already registered")]
    DuplicateRule { rule_id: String },

    /// A rule handler failed while visiting a file
    #[error("Rule '{rule_id}' crashed: {cause:#}")]
    RuleCrash {
        rule_id: String,
        #[source]
        cause: anyhow::Error,
    },

    /// A configuration names a rule that is not registered
    #[error("Unknown rule '{rule_id}'")]
    UnknownRule { rule_id: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule descriptor or rule setup errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source text that could not be parsed
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Malformed fixes
    #[error("Autofix error in '{rule_id}': {message}")]
    AutofixError { rule_id: String, message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Options,
    MessageId,
    Registration,
    Crash,
    Config,
    Rule,
    Io,
    Parse,
    Autofix,
    Internal,
}

impl LintelError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintelError::InvalidOptions { .. } => ErrorKind::Options,
            LintelError::UnknownMessageId { .. } => ErrorKind::MessageId,
            LintelError::DuplicateRule { .. } => ErrorKind::Registration,
            LintelError::RuleCrash { .. } => ErrorKind::Crash,
            LintelError::UnknownRule { .. } => ErrorKind::Config,
            LintelError::ConfigError { .. } => ErrorKind::Config,
            LintelError::RuleError { .. } => ErrorKind::Rule,
            LintelError::IoError { .. } => ErrorKind::Io,
            LintelError::ParseError { .. } => ErrorKind::Parse,
            LintelError::AutofixError { .. } => ErrorKind::Autofix,
            LintelError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (other rules or files can continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Options | ErrorKind::Crash | ErrorKind::Parse | ErrorKind::Io
        ) || matches!(self, LintelError::UnknownRule { .. })
    }

    /// Id of the rule this error is attributed to, if any
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            LintelError::InvalidOptions { rule_id, .. }
            | LintelError::UnknownMessageId { rule_id, .. }
            | LintelError::DuplicateRule { rule_id }
            | LintelError::RuleCrash { rule_id, .. }
            | LintelError::UnknownRule { rule_id }
            | LintelError::RuleError { rule_id, .. }
            | LintelError::AutofixError { rule_id, .. } => Some(rule_id.as_str()),
            _ => None,
        }
    }

    /// Create an invalid options error
    pub fn invalid_options(
        rule_id: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOptions {
            rule_id: rule_id.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unknown_message_id(rule_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self::UnknownMessageId {
            rule_id: rule_id.into(),
            message_id: message_id.into(),
        }
    }

    pub fn duplicate_rule(rule_id: impl Into<String>) -> Self {
        Self::DuplicateRule {
            rule_id: rule_id.into(),
        }
    }

    /// Wrap a handler failure
    pub fn rule_crash(rule_id: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::RuleCrash {
            rule_id: rule_id.into(),
            cause,
        }
    }

    pub fn unknown_rule(rule_id: impl Into<String>) -> Self {
        Self::UnknownRule {
            rule_id: rule_id.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create an autofix error
    pub fn autofix_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AutofixError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for LintelError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
