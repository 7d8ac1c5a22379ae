//! DTOs used by the customer table endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerRecord;
use crate::domain::filter::{FilterCriteria, PaymentStatus};
use crate::domain::types::TypeConstraintError;
use crate::grid::LoadState;
use crate::grid::pagination::Paginated;

/// Query parameters accepted by the customer list and export endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    /// Status code: `-1` all, `1` paid, `0` unpaid, `3` logged in.
    pub status: Option<i32>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub lender: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Forces a reload of the working set before answering.
    #[serde(default)]
    pub refresh: bool,
}

impl CustomerQuery {
    /// Filter criteria described by the query.
    pub fn criteria(&self) -> Result<FilterCriteria, TypeConstraintError> {
        let status = match self.status {
            Some(code) => PaymentStatus::try_from(code)?,
            None => PaymentStatus::All,
        };
        Ok(FilterCriteria::new(
            status,
            self.name.clone(),
            self.phone.clone(),
            self.lender.clone(),
        ))
    }
}

/// Selectable status shown above the table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusOption {
    pub code: i32,
    pub label: &'static str,
}

impl From<PaymentStatus> for StatusOption {
    fn from(status: PaymentStatus) -> Self {
        Self {
            code: status.code(),
            label: status.label(),
        }
    }
}

/// Data returned by `GET /api/admin/customers/list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPageData {
    pub customers: Paginated<CustomerRecord>,
    pub criteria: FilterCriteria,
    pub status_options: Vec<StatusOption>,
    /// Size of the working set before filtering.
    pub total_records: usize,
    pub state: LoadState,
}

/// Generated workbook ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}
