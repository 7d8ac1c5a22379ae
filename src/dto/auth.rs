//! DTOs exchanged by the login endpoints.

use serde::Serialize;

use crate::backend::AdminToken;

/// Outcome of a successful admin login.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: AdminToken,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Public view of [`AdminSession`]; the token travels only in the cookie.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<&AdminSession> for SessionUser {
    fn from(session: &AdminSession) -> Self {
        Self {
            name: session.name.clone(),
            email: session.email.clone(),
        }
    }
}
