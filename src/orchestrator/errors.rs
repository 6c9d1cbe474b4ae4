use std::error::Error as _;

use crate::config::ConfigError;
use crate::domain::{HandlingResult, Notification, PayloadError};
use crate::ledger::LedgerError;

// ============================================================================
// Handler Errors - and their one mapping into a HandlingResult
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The ledger answered and refused the operation.
    #[error("{message}")]
    Domain {
        message: String,
        reason: Option<String>,
    },

    /// A looked-up record is absent; an informational outcome.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Failed to encode outbound message")]
    Encode(#[from] serde_json::Error),

    #[error("Event handler panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureTier {
    Domain,
    NotFound,
    Unexpected,
}

impl FailureTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureTier::Domain => "domain",
            FailureTier::NotFound => "not_found",
            FailureTier::Unexpected => "unexpected",
        }
    }
}

impl HandlerError {
    pub fn domain(message: impl Into<String>, reason: Option<String>) -> Self {
        HandlerError::Domain {
            message: message.into(),
            reason,
        }
    }

    pub fn tier(&self) -> FailureTier {
        match self {
            HandlerError::Domain { .. } => FailureTier::Domain,
            HandlerError::NotFound(_) => FailureTier::NotFound,
            _ => FailureTier::Unexpected,
        }
    }

    /// Domain failures and unexpected failures answer 500 with an error
    /// notification; not-found answers 200 with an info notification.
    pub fn into_result(self) -> HandlingResult {
        match self {
            HandlerError::NotFound(message) => {
                HandlingResult::ok().notify(Notification::info(message))
            }
            HandlerError::Domain { message, reason } => {
                let mut notification = Notification::error(message);
                if let Some(reason) = reason {
                    notification = notification.with_context("reason", reason);
                }
                HandlingResult::failed(notification)
            }
            unexpected => {
                let mut notification = Notification::error(unexpected.to_string());
                if let Some(trace) = diagnostic_trace(&unexpected) {
                    notification = notification.with_context("backtrace", trace);
                }
                HandlingResult::failed(notification)
            }
        }
    }
}

/// The chain of underlying causes, one per line, for operator debugging.
fn diagnostic_trace(error: &HandlerError) -> Option<String> {
    let mut causes = Vec::new();
    let mut source = error.source();

    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }

    if let HandlerError::Ledger(LedgerError::Status { body, .. }) = error {
        if !body.trim().is_empty() {
            causes.push(format!("response body: {}", body.trim()));
        }
    }

    (!causes.is_empty()).then(|| causes.join("\n\t"))
}
