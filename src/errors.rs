use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{DomainError, FieldError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::InvalidIdentifierFormat(_)
            | DomainError::InsufficientStock { .. }
            | DomainError::QuantityLimitExceeded { .. }
            | DomainError::DuplicateProductName(_)
            | DomainError::DuplicateUser => AppError::BadRequest(e.to_string()),
            DomainError::ProductNotFound | DomainError::CartNotFound | DomainError::ItemNotInCart => {
                AppError::NotFound(e.to_string())
            }
            DomainError::InvalidCredentials | DomainError::Unauthorized(_) => {
                AppError::Unauthorized(e.to_string())
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Validation(details) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string(),
                "details": details
            })),
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(msg) => {
                log::error!("request failed: {msg}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
