use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// User lacks required permissions for the page or operation
    #[error("Insufficient permissions for {resource}")]
    InsufficientPermissions { resource: String, missing: Vec<String> },

    /// Invalid request data, rejected before anything is forwarded
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Backend call failed (network error, non-success status, bad JSON).
    /// Rendered as the `{"error": ...}` envelope; in collapse mode the
    /// client always sees 500 regardless of what the backend said.
    #[error("{message}")]
    Upstream {
        message: String,
        /// Backend status, if the backend responded at all
        status: Option<StatusCode>,
        /// Backend body, relayed only in passthrough mode
        body: Option<String>,
        /// When true, relay `status`/`body` instead of collapsing to 500
        passthrough: bool,
    },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The fixed failure envelope the dashboard expects from proxy routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl Error {
    /// Build an upstream error carrying the route-specific message.
    pub fn upstream(message: impl Into<String>) -> Self {
        Error::Upstream {
            message: message.into(),
            status: None,
            body: None,
            passthrough: false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Upstream { status, passthrough, .. } => {
                if *passthrough {
                    status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    // Collapse mode: every backend failure is a 500 to the caller
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::InsufficientPermissions { resource, .. } => {
                format!("Insufficient permissions for {resource}")
            }
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => {
                format!("{resource} with ID {id} not found")
            }
            Error::Upstream { message, .. } => message.clone(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Upstream { status, .. } => {
                tracing::warn!("Backend call failed (backend status {:?}): {}", status, self);
            }
            Error::Unauthenticated { .. } | Error::InsufficientPermissions { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Passthrough mode with a captured backend body: relay it verbatim
            Error::Upstream {
                passthrough: true,
                body: Some(body),
                ..
            } => (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body.clone(),
            )
                .into_response(),
            // Proxy failures use the fixed `{"error": ...}` envelope
            Error::Upstream { message, .. } => (
                status,
                axum::response::Json(ErrorEnvelope { error: message.clone() }),
            )
                .into_response(),
            _ => {
                let user_message = self.user_message();
                (status, user_message).into_response()
            }
        }
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_mode_is_always_500() {
        let err = Error::Upstream {
            message: "Failed to fetch dashboard stats".to_string(),
            status: Some(StatusCode::BAD_GATEWAY),
            body: Some(r#"{"detail":"boom"}"#.to_string()),
            passthrough: false,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_passthrough_keeps_backend_status() {
        let err = Error::Upstream {
            message: "Failed to fetch users".to_string(),
            status: Some(StatusCode::FORBIDDEN),
            body: None,
            passthrough: true,
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_passthrough_without_status_falls_back_to_500() {
        // Network error: the backend never answered, so there is no status to relay
        let err = Error::Upstream {
            message: "Failed to fetch users".to_string(),
            status: None,
            body: None,
            passthrough: true,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_user_messages_do_not_leak_internals() {
        let err = Error::Internal {
            operation: "connect to backend at 10.0.0.3".to_string(),
        };
        assert_eq!(err.user_message(), "Internal server error");
    }
}
