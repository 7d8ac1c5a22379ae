use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::types::{CustomerId, TypeConstraintError};

/// Label shown wherever a lender name is absent.
pub const MISSING_LENDER: &str = "N/A";

/// Payment screenshot attached by the customer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Screenshot {
    pub id: String,
    pub url: String,
}

/// Repayment track chosen for a customer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentType {
    Foreclosure = 1,
    Settlement = 2,
    PartPayment = 3,
}

impl PaymentType {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PaymentType {
    type Error = TypeConstraintError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PaymentType::Foreclosure),
            2 => Ok(PaymentType::Settlement),
            3 => Ok(PaymentType::PartPayment),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown payment type {other}"
            ))),
        }
    }
}

impl From<PaymentType> for u8 {
    fn from(value: PaymentType) -> Self {
        value.code()
    }
}

/// One row of the customer working set.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    /// Lender name; `None` when the backend sent nothing usable.
    pub lender: Option<String>,
    pub payment_url: Option<String>,
    pub payment_type: Option<PaymentType>,
    pub foreclosure: Money,
    pub settlement: Money,
    pub minimum_part_payment: Money,
    pub foreclosure_reward: Money,
    pub settlement_reward: Money,
    pub minimum_part_payment_reward: Money,
    pub is_paid: bool,
    pub is_active: bool,
    pub is_logged_in: bool,
    pub screenshots: Vec<Screenshot>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl CustomerRecord {
    /// Creates a record with the given identity and every other field empty.
    pub fn new(id: CustomerId, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            lender: None,
            payment_url: None,
            payment_type: None,
            foreclosure: Money::ZERO,
            settlement: Money::ZERO,
            minimum_part_payment: Money::ZERO,
            foreclosure_reward: Money::ZERO,
            settlement_reward: Money::ZERO,
            minimum_part_payment_reward: Money::ZERO,
            is_paid: false,
            is_active: false,
            is_logged_in: false,
            screenshots: Vec::new(),
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    /// Lender name for display, falling back to [`MISSING_LENDER`].
    pub fn lender_label(&self) -> &str {
        self.lender.as_deref().unwrap_or(MISSING_LENDER)
    }

    /// Label used by the back-office for the paid flag.
    pub fn status_label(&self) -> &'static str {
        if self.is_paid { "Paid" } else { "Pending" }
    }
}
