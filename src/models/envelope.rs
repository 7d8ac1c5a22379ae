//! Generic response envelopes shared by backend endpoints.

use serde::{Deserialize, Serialize};

/// Reply of mutating endpoints (`update-payment-type`, `uploadCustomers`,
/// `users/create`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_authorized: Option<bool>,
    /// Headers the backend could not find in an uploaded workbook.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_headers: Vec<String>,
}

impl ActionEnvelope {
    pub fn is_unauthorized(&self) -> bool {
        !self.success && self.is_authorized == Some(false)
    }

    /// Backend message or `fallback` when none was sent.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}
