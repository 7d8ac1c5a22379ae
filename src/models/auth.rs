//! Wire shapes of the admin login and profile endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::admin::AdminProfile;

/// Body sent to `POST auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Reply of `POST auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub jwt_token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginEnvelope {
    /// The issued token when the login succeeded.
    pub fn token(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.jwt_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Reply of `GET profile/profile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<AdminProfile>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_authorized: Option<bool>,
}
