//! DTOs of the dashboard endpoint.

use serde::{Deserialize, Serialize};

use crate::grid::metrics::{CustomerCounts, PaymentTotals};
use crate::models::users::AdminUser;

/// Query parameters of `GET /api/admin/dashboard`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Back-office account head counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
    pub active_user_count: usize,
    #[serde(rename = "inActiveUserCount")]
    pub inactive_user_count: usize,
    pub user_count: usize,
}

impl UserCounts {
    pub fn from_users(users: &[AdminUser]) -> Self {
        let active = users.iter().filter(|user| user.is_active).count();
        Self {
            active_user_count: active,
            inactive_user_count: users.len() - active,
            user_count: users.len(),
        }
    }
}

/// Data returned by `GET /api/admin/dashboard`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardData {
    /// Present only for admins allowed to read users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<UserCounts>,
    pub customers: CustomerCounts,
    pub payments: PaymentTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(active: bool) -> AdminUser {
        AdminUser {
            is_active: active,
            ..Default::default()
        }
    }

    #[test]
    fn counts_split_active_and_inactive() {
        let counts = UserCounts::from_users(&[user(true), user(false), user(true)]);
        assert_eq!(counts.active_user_count, 2);
        assert_eq!(counts.inactive_user_count, 1);
        assert_eq!(counts.user_count, 3);

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["inActiveUserCount"], 1);
    }

    #[test]
    fn user_counts_are_omitted_when_absent() {
        let data = DashboardData {
            users: None,
            customers: CustomerCounts::default(),
            payments: PaymentTotals::default(),
        };
        let json = serde_json::to_value(data).unwrap();
        assert!(json.get("users").is_none());
        assert_eq!(json["customers"]["customerCount"], 0);
    }
}
