use serde::Deserialize;
use validator::Validate;

use crate::domain::types::AdminEmail;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Credentials posted to the admin login endpoint.
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Validated login credentials.
#[derive(Debug)]
pub struct LoginPayload {
    pub email: AdminEmail,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let email = AdminEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;
        Ok(Self {
            email,
            password: form.password,
        })
    }
}
