use thiserror::Error;

use crate::schema::ValidationReport;

/// Top-level error type for the `cobox-api` crate.
///
/// Covers every failure mode of a single REST operation: payload
/// validation on either side of the wire, non-2xx responses, and
/// transport failures. `cobox-core` maps these into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Validation ──────────────────────────────────────────────────
    /// Outbound payload failed its schema. The request was never sent.
    #[error("Invalid request payload: {0}")]
    Validation(ValidationReport),

    /// Inbound payload failed its schema, with the raw body for debugging.
    #[error("Response failed validation: {report}")]
    InvalidResponse { report: ValidationReport, body: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in or sign-up rejected, or its response could not be read.
    /// The message always carries the HTTP status and raw response body.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── HTTP ────────────────────────────────────────────────────────
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// Raw response body (may be empty).
        body: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout, body read failure...
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl Error {
    /// HTTP status of the failed response, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the payload was rejected before or after the call
    /// by schema validation rather than by the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationIssue;

    #[test]
    fn http_error_reports_status() {
        let err = Error::Http {
            status: 409,
            message: "conflict".into(),
            body: String::new(),
        };
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "HTTP 409: conflict");
    }

    #[test]
    fn gateway_errors_are_transient() {
        let err = Error::Http {
            status: 503,
            message: "Service Unavailable".into(),
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn validation_errors_have_no_status() {
        let err = Error::Validation(ValidationReport::from(vec![ValidationIssue::new(
            "licenceNumber",
            "too short",
        )]));
        assert!(err.is_validation());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("licenceNumber: too short"));
    }
}
