//! Error conversion glue between the layers and [`ServiceError`].
//!
//! The domain, grid and codec layers must not depend on the service error
//! type, so the conversions live here.

use crate::backend::BackendError;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::grid::GridError;
use crate::services::ServiceError;
use crate::spreadsheet::CodecError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<GridError> for ServiceError {
    fn from(val: GridError) -> Self {
        match val {
            GridError::InvalidPageSize { .. } => ServiceError::Form(val.to_string()),
        }
    }
}

impl From<BackendError> for ServiceError {
    fn from(val: BackendError) -> Self {
        match val {
            BackendError::Unauthorized => ServiceError::Unauthorized,
            other => ServiceError::Backend(other.to_string()),
        }
    }
}

impl From<CodecError> for ServiceError {
    fn from(val: CodecError) -> Self {
        match val {
            CodecError::EmptyWorkbook | CodecError::Read(_) => {
                ServiceError::Form(format!("Please upload a valid Excel file: {val}"))
            }
            CodecError::Write(_) => ServiceError::Internal,
        }
    }
}
