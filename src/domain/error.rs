use thiserror::Error;

/// Transport-level errors surfaced by the API gateway.
///
/// Every failed backend call maps to exactly one of these variants, so
/// callers can branch on the class of failure instead of parsing
/// messages.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401. The stored session is cleared before this is returned;
    /// the shell must route back to the sign-in screen.
    #[error("Session expired, sign in again")]
    AuthExpired,

    /// HTTP 403. Authenticated but not allowed; the session stays valid.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// HTTP 400/422. The backend rejected the request payload.
    #[error("Rejected by server: {0}")]
    ValidationRejected(String),

    /// HTTP 404. The resource no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 409. Another terminal acted on the same resource first.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// HTTP 5xx, timeouts and transport failures.
    #[error("Server unavailable: {0}")]
    NetworkOrServer(String),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request scope was cancelled before the call finished.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Validation-class rejections may be retried with an alternate
    /// payload shape; every other class is final.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::ValidationRejected(_))
    }

    /// Human-readable message carried from the backend envelope, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Forbidden(m)
            | ApiError::ValidationRejected(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::NetworkOrServer(m)
            | ApiError::InvalidResponse(m) => Some(m),
            ApiError::AuthExpired | ApiError::Cancelled => None,
        }
    }
}

/// Business-level errors raised by the service layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No signed-in identity to act as. Raised before any backend call
    /// is attempted.
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Validation: {0}")]
    Validation(String),

    #[error("{entity}: illegal transition {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Battery {serial} is not compatible: {detail}")]
    IncompatibleBattery { serial: String, detail: String },

    #[error("Swap {swap_id} has no settled payment")]
    PaymentRequired { swap_id: String },

    #[error("Business rule: {0}")]
    BusinessRule(String),

    /// Backend-reported numbers do not add up.
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
pub type DomainResult<T> = Result<T, DomainError>;

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_rejections_are_retryable() {
        assert!(ApiError::ValidationRejected("bad field".into()).is_validation());
        assert!(!ApiError::AuthExpired.is_validation());
        assert!(!ApiError::NotFound("gone".into()).is_validation());
        assert!(!ApiError::NetworkOrServer("boom".into()).is_validation());
        assert!(!ApiError::Conflict("taken".into()).is_validation());
    }

    #[test]
    fn message_prefers_backend_text() {
        let err = ApiError::Forbidden("staff role required".into());
        assert_eq!(err.message(), Some("staff role required"));
        assert_eq!(ApiError::AuthExpired.message(), None);
    }

    #[test]
    fn api_error_wraps_into_domain_error() {
        let err: DomainError = ApiError::NotFound("reservation".into()).into();
        assert!(matches!(err, DomainError::Api(ApiError::NotFound(_))));
    }

    #[test]
    fn display_includes_context() {
        let err = DomainError::IncompatibleBattery {
            serial: "BAT-001".into(),
            detail: "vehicle takes BM-72, unit is BM-48".into(),
        };
        let text = err.to_string();
        assert!(text.contains("BAT-001"));
        assert!(text.contains("BM-72"));
    }
}
