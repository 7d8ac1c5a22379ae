//! Reading uploaded customer workbooks and writing customer reports.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::grid::report::ExportReport;

pub mod headers;
pub mod xlsx;

pub use headers::{REQUIRED_HEADERS, validate_headers};
pub use xlsx::XlsxCodec;

/// MIME type of the generated report.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Workbook contains no worksheets")]
    EmptyWorkbook,

    #[error("Failed to read workbook: {0}")]
    Read(String),

    #[error("Failed to write workbook: {0}")]
    Write(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Workbook encoding used by the upload and export flows.
#[cfg_attr(feature = "test-mocks", mockall::automock)]
pub trait SpreadsheetCodec: Send + Sync {
    /// Cells of the first row of the first worksheet, trimmed; empty cells
    /// are kept as `""` so positions line up with the sheet.
    fn read_header_row(&self, bytes: &[u8]) -> CodecResult<Vec<String>>;

    /// Encodes `report` as a workbook.
    fn write_report(&self, report: &ExportReport) -> CodecResult<Vec<u8>>;
}

/// Download name of a report generated at `now`.
pub fn export_filename(now: NaiveDateTime) -> String {
    format!("customers_{}.xlsx", now.format("%Y-%m-%d_%H%M%S"))
}

/// `true` for names an uploaded workbook may carry.
pub fn is_workbook_name(filename: &str) -> bool {
    let lower = filename.trim().to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}
