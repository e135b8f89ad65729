use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or blank.
    #[error("{error}")]
    Validation {
        error: String,
        details: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The store refused the write (e.g. duplicate email).
    #[error("{error}: {details}")]
    Rejected { error: String, details: String },

    /// A dependency failed while serving the request.
    #[error("{error}: {details}")]
    Internal { error: String, details: String },
}

impl ApiError {
    pub fn validation(error: impl Into<String>) -> Self {
        Self::Validation {
            error: error.into(),
            details: None,
        }
    }

    pub fn missing_field(error: impl Into<String>, field: &str) -> Self {
        Self::Validation {
            error: error.into(),
            details: Some(format!("{field} is required")),
        }
    }

    pub fn rejected(error: impl Into<String>, cause: &anyhow::Error) -> Self {
        Self::Rejected {
            error: error.into(),
            details: format!("{cause:#}"),
        }
    }

    pub fn internal(error: impl Into<String>, cause: &anyhow::Error) -> Self {
        Self::Internal {
            error: error.into(),
            details: format!("{cause:#}"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::Rejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation { error, details } => ErrorBody { error, details },
            ApiError::NotFound(error) | ApiError::Unauthorized(error) => ErrorBody {
                error,
                details: None,
            },
            ApiError::Rejected { error, details } => ErrorBody {
                error,
                details: Some(details),
            },
            ApiError::Internal { error, details } => {
                tracing::error!(%error, %details, "request failed");
                ErrorBody {
                    error,
                    details: Some(details),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON request body. Malformed bodies, wrong field types and a
/// missing `Content-Type` become a 400 under the endpoint's `failure` message.
pub fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    failure: &str,
) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        let details = rejection.body_text();
        tracing::warn!(%details, "rejected request body");
        ApiError::Validation {
            error: failure.into(),
            details: Some(details),
        }
    })
}
