//! Wire shapes of the admin user management endpoints.

use serde::{Deserialize, Serialize};

/// Admin account as listed by `GET users/list`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Reply of `GET users/list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<AdminUser>,
    #[serde(default)]
    pub total_records: usize,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_authorized: Option<bool>,
}

impl UsersEnvelope {
    pub fn is_unauthorized(&self) -> bool {
        !self.success && self.is_authorized == Some(false)
    }
}
