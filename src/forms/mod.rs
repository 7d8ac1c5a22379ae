//! Request payloads accepted by the back-office routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod customers;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid customer id")]
    InvalidCustomerId,

    #[error("invalid payment type")]
    InvalidPaymentType,

    #[error("invalid user id")]
    InvalidUserId,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid password")]
    InvalidPassword,

    #[error("uploaded file has no name")]
    MissingFileName,

    #[error("failed to read uploaded file: {0}")]
    Io(String),
}
