//! DTOs used by the admin user management endpoints.

use serde::{Deserialize, Serialize};

use crate::grid::pagination::Paginated;
use crate::models::users::AdminUser;

/// Query parameters of `GET /api/admin/users/list`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Data returned by `GET /api/admin/users/list`.
#[derive(Debug, Serialize)]
pub struct UsersPageData {
    pub users: Paginated<AdminUser>,
}
