use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error shared by the core, the report crate and the command host.
///
/// The host serializes it verbatim. `retryable` marks transient failures (an unreachable
/// report endpoint, for example) that may be surfaced as a notification and re-triggered by
/// hand; nothing in the workspace retries automatically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Shorthand for `new(code, message).with_details(source.to_string())`.
    pub fn wrap(code: impl Into<String>, message: impl Into<String>, source: impl fmt::Display) -> Self {
        Self::new(code, message).with_details(source.to_string())
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {} ({details})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
