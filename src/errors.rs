use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::errors::{DomainError, ErrorCategory};

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub description: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `NO_AVAILABILITY`.
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request")]
    Validation(Vec<FieldViolation>),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Rejected { code: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let code = e.code();
        match e.category() {
            ErrorCategory::Validation => match e {
                DomainError::InvalidInput(msg) => {
                    AppError::Validation(vec![FieldViolation::new("request", msg)])
                }
                other => AppError::Validation(vec![FieldViolation::new(
                    "request",
                    other.to_string(),
                )]),
            },
            ErrorCategory::NotFound => AppError::NotFound {
                code,
                message: e.to_string(),
            },
            ErrorCategory::Domain => AppError::Rejected {
                code,
                message: e.to_string(),
            },
            ErrorCategory::Infrastructure => AppError::Internal(e.to_string()),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "INVALID_INPUT",
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::NotFound { code, .. } | AppError::Rejected { code, .. } => *code,
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Internal(detail) => {
                log::error!("request failed: {}", detail);
                ErrorBody {
                    error: self.code().to_string(),
                    message: "Internal server error".to_string(),
                    violations: Vec::new(),
                }
            }
            AppError::Validation(violations) => ErrorBody {
                error: self.code().to_string(),
                message: self.to_string(),
                violations: violations.clone(),
            },
            _ => {
                log::warn!("request rejected: {} ({})", self, self.code());
                ErrorBody {
                    error: self.code().to_string(),
                    message: self.to_string(),
                    violations: Vec::new(),
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
