use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    StoreError,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::ValidationError => write!(f, "ValidationError"),
            AppErrorKind::StoreError => write!(f, "StoreError"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// One entry of a 422 validation `detail` array.
///
/// `loc` is a path into the request body (e.g. `["body", "age_at_offence"]`);
/// `kind` is a machine-readable tag such as `missing`, `int_type`,
/// `int_range`, `literal_error`, or `value_error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct ValidationIssue {
    #[schema(value_type = Vec<Object>)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub input: Option<serde_json::Value>,
}

impl ValidationIssue {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| serde_json::Value::from(*s)).collect(),
            msg: msg.into(),
            kind: kind.into(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }
}

/// Payload of the `{"detail": ...}` error envelope: either a plain message
/// or a list of validation issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Issues(Vec<ValidationIssue>),
}

/// Structured application error used across the server.
///
/// Serializes over HTTP as `{"detail": <string or array>}` with the status
/// code implied by `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub detail: ErrorDetail,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::NotFound,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::BadRequest,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    /// A 422 carrying the full list of violations found in the request.
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            detail: ErrorDetail::Issues(issues),
        }
    }

    /// A 422 with a plain-string detail (e.g. a malformed identifier
    /// reported by the store rather than by request validation).
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::StoreError,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::InternalError,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::ValidationError => 422,
            AppErrorKind::StoreError => 500,
            AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            ErrorDetail::Message(m) => write!(f, "{}: {}", self.kind, m),
            ErrorDetail::Issues(issues) => {
                write!(f, "{}: {} validation issue(s)", self.kind, issues.len())
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Wire shape of every error response body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(ErrorBody { detail: self.detail })).into_response()
    }
}
