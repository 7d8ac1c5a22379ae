//! Back-office users and the permission capability passed into services.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{AdminEmail, AdminName, AdminPassword};

/// Area of the back-office guarded by permissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Module {
    Customer,
    User,
}

impl Module {
    pub const fn as_str(self) -> &'static str {
        match self {
            Module::Customer => "Customer",
            Module::User => "User",
        }
    }
}

/// Operation a permission grants on a [`Module`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability check injected into every service call.
#[cfg_attr(feature = "test-mocks", mockall::automock)]
pub trait AccessPolicy {
    fn allows(&self, module: Module, action: Action) -> bool;
}

/// Actions granted on one module, as reported by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub module: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// The signed-in back-office user.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminProfile {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl AccessPolicy for AdminProfile {
    fn allows(&self, module: Module, action: Action) -> bool {
        self.permissions.iter().any(|permission| {
            permission.module == module.as_str()
                && permission.actions.iter().any(|a| a == action.as_str())
        })
    }
}

/// Validated payload for creating a back-office user.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewAdminUser {
    pub name: AdminName,
    pub email: AdminEmail,
    pub password: AdminPassword,
}

/// Validated changes to an existing back-office user.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdate {
    pub name: AdminName,
    pub email: AdminEmail,
    pub is_active: bool,
}
