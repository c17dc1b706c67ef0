use serde::Serialize;
use thiserror::Error;

/// A single rejected input field, produced by the validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Invalid {0} ID format")]
    InvalidIdentifierFormat(&'static str),

    #[error("Product not found")]
    ProductNotFound,
    #[error("Cart not found for this user")]
    CartNotFound,
    #[error("Product not found in cart")]
    ItemNotInCart,

    #[error("Insufficient stock for {name}. Available: {available}")]
    InsufficientStock { name: String, available: i32 },
    #[error("Quantity of {name} in the cart cannot exceed {max}")]
    QuantityLimitExceeded { name: String, max: i32 },
    #[error("Product with name '{0}' already exists")]
    DuplicateProductName(String),
    #[error("User with this email or username already exists")]
    DuplicateUser,

    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Not authorized: {0}")]
    Unauthorized(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}
