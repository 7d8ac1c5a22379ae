//! Use cases of the back-office, one module per screen.
//!
//! Every operation receives the capability of the calling admin explicitly as
//! an [`AccessPolicy`] and checks it before touching the backend.

use thiserror::Error;

use crate::domain::admin::{AccessPolicy, Action, Module};

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod upload;
pub mod users;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unauthorized. Please sign in again.")]
    Unauthorized,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("You do not have permission to {action} {module}")]
    Forbidden { module: &'static str, action: &'static str },

    #[error("{0}")]
    Form(String),

    #[error("Missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("{0}")]
    Rejected(String),

    #[error("Backend unavailable: {0}")]
    Backend(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Fails with [`ServiceError::Forbidden`] unless `policy` grants `action` on `module`.
pub fn ensure_allowed<P>(policy: &P, module: Module, action: Action) -> ServiceResult<()>
where
    P: AccessPolicy + ?Sized,
{
    if policy.allows(module, action) {
        Ok(())
    } else {
        log::warn!(
            "Denied {} on {} for the current admin",
            action.as_str(),
            module.as_str()
        );
        Err(ServiceError::Forbidden {
            module: module.as_str(),
            action: action.as_str(),
        })
    }
}
