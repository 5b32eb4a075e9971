//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cobox_config::ConfigError;
use cobox_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the CoBox backend at {url}")]
    #[diagnostic(
        code(cobox::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Override the origin with --api-base-url or COBOX_API_BASE_URL."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(cobox::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(code(cobox::auth_failed), help("{message}"))]
    AuthFailed { message: String },

    #[error("{view} requires a signed-in session")]
    #[diagnostic(code(cobox::not_authenticated), help("Run `cobox login` first."))]
    NotAuthenticated { view: String },

    // ── Backend rejections ───────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(cobox::not_found),
        help("Run: cobox {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    /// A refusal with a user-facing notice. `status` is the HTTP status,
    /// or `None` when a local rule refused before any request.
    #[error("{message}")]
    #[diagnostic(code(cobox::rejected))]
    Rejected { message: String, status: Option<u16> },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(cobox::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from server: {report}")]
    #[diagnostic(code(cobox::invalid_response), help("Raw response: {body}"))]
    InvalidResponse { report: String, body: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cobox::validation))]
    Validation { field: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(cobox::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Local state ──────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(cobox::config))]
    Config(ConfigError),

    #[error("Could not access the stored session: {message}")]
    #[diagnostic(
        code(cobox::session_storage),
        help("Check session_backend and session_file in `cobox config show`.")
    )]
    Persistence { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(cobox::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(cobox::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotAuthenticated { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { status, .. } => status.map_or(exit_code::USAGE, status_exit_code),
            Self::ApiError { status, .. } => status_exit_code(*status),
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the backend origin on connection failures.
    pub fn with_backend(self, base_url: &str) -> Self {
        match self {
            Self::ConnectionFailed { url, reason } if url.is_empty() => Self::ConnectionFailed {
                url: base_url.to_owned(),
                reason,
            },
            other => other,
        }
    }

    /// Re-label a 404 as a missing `resource_type` with `identifier`.
    pub fn for_resource(self, resource_type: &str, identifier: String) -> Self {
        match self {
            Self::ApiError { status: 404, .. } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier,
                list_command: format!("{resource_type}s list"),
            },
            other => other,
        }
    }
}

fn status_exit_code(status: u16) -> i32 {
    match status {
        401 => exit_code::AUTH,
        403 => exit_code::PERMISSION,
        404 => exit_code::NOT_FOUND,
        409 => exit_code::CONFLICT,
        400 | 422 => exit_code::USAGE,
        _ => exit_code::GENERAL,
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { report } => {
                let (field, reason) = match report.issues() {
                    [only] => (only.path.clone(), only.message.clone()),
                    _ => ("payload".into(), report.to_string()),
                };
                CliError::Validation { field, reason }
            }

            CoreError::InvalidResponse { report, body } => CliError::InvalidResponse {
                report: report.to_string(),
                body,
            },

            CoreError::Api { status, message } => CliError::ApiError { status, message },

            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed {
                url: String::new(),
                reason,
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Domain { message } => CliError::Rejected {
                message,
                status: None,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotAuthenticated => CliError::NotAuthenticated {
                view: "This command".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Persistence { message } => CliError::Persistence { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobox_core::{ValidationIssue, ValidationReport};

    #[test]
    fn http_statuses_pick_exit_codes() {
        let conflict = CliError::from(CoreError::Api {
            status: 409,
            message: "taken".into(),
        });
        assert_eq!(conflict.exit_code(), exit_code::CONFLICT);

        let forbidden = CliError::from(CoreError::Api {
            status: 403,
            message: "nope".into(),
        });
        assert_eq!(forbidden.exit_code(), exit_code::PERMISSION);

        let server = CliError::from(CoreError::Api {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(server.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_resource_becomes_not_found() {
        let err = CliError::from(CoreError::Api {
            status: 404,
            message: "Not Found".into(),
        })
        .for_resource("vehicle", "9".into());
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "vehicle '9' not found");
    }

    #[test]
    fn local_refusals_are_usage_errors() {
        let err = CliError::from(CoreError::domain("Select a user from the list."));
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Select a user from the list.");
        assert_eq!(
            CliError::from(CoreError::NotAuthenticated).exit_code(),
            exit_code::AUTH
        );
    }

    #[test]
    fn single_issue_names_its_field() {
        let report = ValidationReport::from(vec![ValidationIssue::new(
            "licenceNumber",
            "Licence number must be between 9 and 10 characters",
        )]);
        let err = CliError::from(CoreError::Validation { report });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        match err {
            CliError::Validation { field, .. } => assert_eq!(field, "licenceNumber"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
