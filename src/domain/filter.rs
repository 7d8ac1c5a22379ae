//! Filter criteria applied to the customer working set.

use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerRecord;
use crate::domain::types::TypeConstraintError;

/// Payment status selector offered by the customer table.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub enum PaymentStatus {
    #[default]
    All,
    Paid,
    Unpaid,
    LoggedIn,
}

impl PaymentStatus {
    /// Every selectable status in display order.
    pub const OPTIONS: [PaymentStatus; 4] = [
        PaymentStatus::All,
        PaymentStatus::Paid,
        PaymentStatus::Unpaid,
        PaymentStatus::LoggedIn,
    ];

    /// Numeric code understood by the backend `filter` parameter.
    pub const fn code(self) -> i32 {
        match self {
            PaymentStatus::All => -1,
            PaymentStatus::Paid => 1,
            PaymentStatus::Unpaid => 0,
            PaymentStatus::LoggedIn => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::All => "All",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::LoggedIn => "Logged In",
        }
    }

    fn matches(self, record: &CustomerRecord) -> bool {
        match self {
            PaymentStatus::All => true,
            PaymentStatus::Paid => record.is_paid,
            PaymentStatus::Unpaid => !record.is_paid,
            PaymentStatus::LoggedIn => record.is_logged_in,
        }
    }
}

impl TryFrom<i32> for PaymentStatus {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        PaymentStatus::OPTIONS
            .into_iter()
            .find(|status| status.code() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown status {value}")))
    }
}

impl From<PaymentStatus> for i32 {
    fn from(value: PaymentStatus) -> Self {
        value.code()
    }
}

/// Current query state of the customer table.
///
/// Blank text fields are inactive; active predicates are combined with AND.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FilterCriteria {
    pub status: PaymentStatus,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub lender: Option<String>,
}

impl FilterCriteria {
    /// Builds criteria, lower-casing text terms and dropping blank ones.
    pub fn new(
        status: PaymentStatus,
        name: Option<String>,
        phone: Option<String>,
        lender: Option<String>,
    ) -> Self {
        Self {
            status,
            name: normalize_term(name),
            phone: normalize_term(phone),
            lender: normalize_term(lender),
        }
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn name(mut self, term: impl Into<String>) -> Self {
        self.name = normalize_term(Some(term.into()));
        self
    }

    pub fn phone(mut self, term: impl Into<String>) -> Self {
        self.phone = normalize_term(Some(term.into()));
        self
    }

    pub fn lender(mut self, term: impl Into<String>) -> Self {
        self.lender = normalize_term(Some(term.into()));
        self
    }

    /// Returns `true` when no predicate narrows the working set.
    pub fn is_empty(&self) -> bool {
        self.status == PaymentStatus::All
            && self.name.is_none()
            && self.phone.is_none()
            && self.lender.is_none()
    }

    /// Checks the record against every active predicate.
    pub fn matches(&self, record: &CustomerRecord) -> bool {
        self.status.matches(record)
            && contains_term(Some(record.name.as_str()), self.name.as_deref())
            && contains_term(Some(record.phone.as_str()), self.phone.as_deref())
            && contains_term(record.lender.as_deref(), self.lender.as_deref())
    }
}

fn normalize_term(term: Option<String>) -> Option<String> {
    term.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

/// Case-insensitive substring test; an inactive term always matches and an
/// absent value never matches an active term.
fn contains_term(value: Option<&str>, term: Option<&str>) -> bool {
    match (term, value) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(term), Some(value)) => value.to_lowercase().contains(term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CustomerId;

    fn record(name: &str, phone: &str, lender: Option<&str>, paid: bool) -> CustomerRecord {
        let mut record = CustomerRecord::new(CustomerId::new(name).unwrap(), name, phone);
        record.lender = lender.map(str::to_string);
        record.is_paid = paid;
        record
    }

    #[test]
    fn status_codes_match_backend() {
        assert_eq!(PaymentStatus::try_from(-1), Ok(PaymentStatus::All));
        assert_eq!(PaymentStatus::try_from(0), Ok(PaymentStatus::Unpaid));
        assert_eq!(PaymentStatus::try_from(3), Ok(PaymentStatus::LoggedIn));
        assert!(PaymentStatus::try_from(2).is_err());
    }

    #[test]
    fn blank_terms_are_inactive() {
        let criteria = FilterCriteria::new(
            PaymentStatus::All,
            Some("   ".into()),
            Some(String::new()),
            None,
        );
        assert!(criteria.is_empty());
        assert!(criteria.matches(&record("Asha", "9800", None, false)));
    }

    #[test]
    fn text_matching_is_case_insensitive_substring() {
        let criteria = FilterCriteria::default().name("SHA").lender("hdf");
        assert!(criteria.matches(&record("Asha", "9800", Some("HDFC Bank"), false)));
        assert!(!criteria.matches(&record("Ravi", "9800", Some("HDFC Bank"), false)));
    }

    #[test]
    fn missing_lender_fails_active_lender_filter() {
        let criteria = FilterCriteria::default().lender("n/a");
        assert!(!criteria.matches(&record("Asha", "9800", None, false)));
    }

    #[test]
    fn predicates_are_combined_with_and() {
        let criteria = FilterCriteria::default()
            .status(PaymentStatus::Paid)
            .phone("98");
        assert!(criteria.matches(&record("Asha", "9800", None, true)));
        assert!(!criteria.matches(&record("Asha", "9800", None, false)));
        assert!(!criteria.matches(&record("Asha", "7700", None, true)));
    }
}
