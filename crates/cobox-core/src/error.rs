// ── Core error types ──
//
// User-facing errors from cobox-core. The `From<cobox_api::Error>` impl
// folds transport-layer failures into the dashboard's error taxonomy:
// validation, API rejection, connectivity, and domain rules.

use cobox_api::ValidationReport;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    /// A request payload failed its schema; nothing was sent.
    #[error("Validation failed: {report}")]
    Validation { report: ValidationReport },

    /// The backend answered with a body that does not match its schema.
    #[error("Unexpected response from server: {report}")]
    InvalidResponse { report: ValidationReport, body: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    Api { status: u16, message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Domain ───────────────────────────────────────────────────────
    /// A client-side business rule refused the operation.
    #[error("{message}")]
    Domain { message: String },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not signed in")]
    NotAuthenticated,

    // ── Local state ──────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Session storage error: {message}")]
    Persistence { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// HTTP status of the rejected call, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field-level issues, for validation failures.
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation { report } | Self::InvalidResponse { report, .. } => Some(report),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cobox_api::Error> for CoreError {
    fn from(err: cobox_api::Error) -> Self {
        match err {
            cobox_api::Error::Validation(report) => CoreError::Validation { report },
            cobox_api::Error::InvalidResponse { report, body } => {
                CoreError::InvalidResponse { report, body }
            }
            cobox_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            cobox_api::Error::Http {
                status, message, ..
            } => CoreError::Api { status, message },
            cobox_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Api {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                }
            }
            cobox_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API base URL: {e}"),
            },
            cobox_api::Error::ClientBuild(message) => CoreError::Internal(message),
        }
    }
}
