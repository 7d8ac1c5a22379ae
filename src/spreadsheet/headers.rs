//! Header check for customer upload workbooks.

/// Columns an upload workbook must carry, matched exactly after trimming.
pub const REQUIRED_HEADERS: [&str; 8] = [
    "Mobile",
    "Fore Closure",
    "Settlement",
    "Minimum Part Amount",
    "Forclosure Reward",
    "Settlement Reward",
    "Minimum Part Amount Reward",
    "payment url",
];

/// Returns the required headers absent from `header_row`, in required order.
///
/// Matching is case-sensitive; extra columns are allowed.
pub fn validate_headers<S: AsRef<str>>(header_row: &[S]) -> Vec<&'static str> {
    REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_row.iter().any(|cell| cell.as_ref().trim() == *required))
        .collect()
}
