use serde::Deserialize;
use validator::Validate;

use crate::domain::admin::{AdminUserUpdate, NewAdminUser};
use crate::domain::types::{AdminEmail, AdminName, AdminPassword};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /api/admin/users/create`.
pub struct CreateUserForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl TryFrom<CreateUserForm> for NewAdminUser {
    type Error = FormError;

    fn try_from(form: CreateUserForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewAdminUser {
            name: AdminName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: AdminEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: AdminPassword::new(form.password).map_err(|_| FormError::InvalidPassword)?,
        })
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /api/admin/users/update/{id}`.
pub struct UpdateUserForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl TryFrom<UpdateUserForm> for AdminUserUpdate {
    type Error = FormError;

    fn try_from(form: UpdateUserForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(AdminUserUpdate {
            name: AdminName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: AdminEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            is_active: form.is_active,
        })
    }
}
