//! Wire shape of customer records returned by the backend.
//!
//! Every field is optional here; [`CustomerPayload::into_record`] decides how
//! missing or malformed values degrade so that a single bad field never drops
//! a row.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::customer::{CustomerRecord, PaymentType, Screenshot};
use crate::domain::money::{MoneyValue, parse_money};
use crate::domain::types::CustomerId;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(rename = "customer", default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(rename = "lender_name", default)]
    pub lender_name: Option<Value>,
    #[serde(rename = "payment_url", default)]
    pub payment_url: Option<Value>,
    #[serde(rename = "payment_type", default)]
    pub payment_type: Option<Value>,
    #[serde(rename = "fore_closure", default)]
    pub foreclosure: Option<MoneyValue>,
    #[serde(default)]
    pub settlement: Option<MoneyValue>,
    #[serde(rename = "minimum_part_payment", default)]
    pub minimum_part_payment: Option<MoneyValue>,
    #[serde(rename = "foreclosure_reward", default)]
    pub foreclosure_reward: Option<MoneyValue>,
    #[serde(rename = "settlement_reward", default)]
    pub settlement_reward: Option<MoneyValue>,
    #[serde(rename = "minimum_part_payment_reward", default)]
    pub minimum_part_payment_reward: Option<MoneyValue>,
    #[serde(default)]
    pub is_paid: Option<Value>,
    #[serde(default)]
    pub is_active: Option<Value>,
    #[serde(rename = "isLogin", default)]
    pub is_login: Option<Value>,
    /// Screenshot entries shaped `{ "_id": .., "screen_shot": .. }`.
    #[serde(default)]
    pub payments: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(rename = "last_login", default)]
    pub last_login: Option<Value>,
}

/// Reads strings and numbers as trimmed text; anything else is absent.
fn text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(text).filter(|s| !s.is_empty())
}

/// Reads booleans, also accepting `"true"`/`"false"` and `0`/`1`.
fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let value = text(value)?;
    match DateTime::parse_from_rfc3339(&value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            log::debug!("Ignoring malformed timestamp {value:?}: {err}");
            None
        }
    }
}

fn parse_payment_type(value: Option<&Value>) -> Option<PaymentType> {
    let code = text(value)?.parse::<u8>().ok()?;
    PaymentType::try_from(code).ok()
}

fn parse_screenshots(value: Option<&Value>) -> Vec<Screenshot> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let url = text(entry.get("screen_shot"))?;
            Some(Screenshot {
                id: text(entry.get("_id")).unwrap_or_default(),
                url,
            })
        })
        .collect()
}

impl CustomerPayload {
    /// Converts into a domain record.
    ///
    /// Returns `None` only when the record carries no usable identifier.
    pub fn into_record(self) -> Option<CustomerRecord> {
        let id = match text(self.id.as_ref()).map(CustomerId::new) {
            Some(Ok(id)) => id,
            _ => {
                log::warn!(
                    "Skipping customer without identifier: {:?}",
                    text(self.name.as_ref())
                );
                return None;
            }
        };

        Some(CustomerRecord {
            id,
            name: text(self.name.as_ref()).unwrap_or_default(),
            phone: text(self.phone.as_ref()).unwrap_or_default(),
            lender: text(self.lender_name.as_ref()),
            payment_url: text(self.payment_url.as_ref()),
            payment_type: parse_payment_type(self.payment_type.as_ref()),
            foreclosure: parse_money(self.foreclosure.as_ref()),
            settlement: parse_money(self.settlement.as_ref()),
            minimum_part_payment: parse_money(self.minimum_part_payment.as_ref()),
            foreclosure_reward: parse_money(self.foreclosure_reward.as_ref()),
            settlement_reward: parse_money(self.settlement_reward.as_ref()),
            minimum_part_payment_reward: parse_money(self.minimum_part_payment_reward.as_ref()),
            is_paid: flag(self.is_paid.as_ref()),
            is_active: flag(self.is_active.as_ref()),
            is_logged_in: flag(self.is_login.as_ref()),
            screenshots: parse_screenshots(self.payments.as_ref()),
            created_at: parse_timestamp(self.created_at.as_ref()),
            updated_at: parse_timestamp(self.updated_at.as_ref()),
            last_login: parse_timestamp(self.last_login.as_ref()),
        })
    }
}

/// Lenient list element: an entry that is not a JSON object is skipped
/// instead of failing the whole list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LenientCustomer {
    Record(Box<CustomerPayload>),
    Malformed(Value),
}

/// Envelope of `GET customers/list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<LenientCustomer>,
    #[serde(default)]
    pub total_records: Option<usize>,
    #[serde(default)]
    pub is_authorized: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ListEnvelope {
    /// `true` when the backend explicitly reported the session as unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        !self.success && self.is_authorized == Some(false)
    }

    /// Converts every usable entry into a domain record.
    pub fn into_records(self) -> Vec<CustomerRecord> {
        self.data
            .into_iter()
            .filter_map(|entry| match entry {
                LenientCustomer::Record(payload) => payload.into_record(),
                LenientCustomer::Malformed(value) => {
                    log::warn!("Skipping malformed customer entry: {value}");
                    None
                }
            })
            .collect()
    }
}
