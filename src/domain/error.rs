use serde::Serialize;
use thiserror::Error;

/// A single failed field check on an inbound classification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub code: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Parse error: {message}")]
    Parse { message: String, raw: String },

    #[error("Invalid request: {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: msg.into(),
        }
    }

    pub fn parse(msg: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            raw: raw.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a failed model call may be attempted again.
    ///
    /// Transport failures without a status (connection resets, timeouts,
    /// undecodable bodies) count as retryable, as do upstream 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(code), ..
            } => *code >= 500,
            _ => false,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
