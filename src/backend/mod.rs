//! Seam between the services and the RepayKaro backend API.

use std::fmt;

use async_trait::async_trait;

use crate::{
    backend::errors::BackendResult,
    domain::{
        admin::{AdminUserUpdate, NewAdminUser},
        customer::PaymentType,
        filter::PaymentStatus,
        types::{AdminEmail, AdminUserId, CustomerId},
    },
    models::{
        auth::{LoginEnvelope, ProfileEnvelope},
        customer::ListEnvelope,
        envelope::ActionEnvelope,
        users::UsersEnvelope,
    },
};

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use errors::BackendError;
pub use http::HttpBackend;

/// Bearer token of a signed-in admin, relayed to the backend as is.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminToken(String);

impl AdminToken {
    /// Returns `None` for a blank token.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Query for `GET customers/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub status: PaymentStatus,
    pub pagination: Pagination,
}

impl ListRequest {
    /// First page of `per_page` records across every status.
    pub fn new(per_page: usize) -> Self {
        Self {
            status: PaymentStatus::All,
            pagination: Pagination { page: 1, per_page },
        }
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Pagination { page, per_page };
        self
    }
}

/// Operations the back-office needs from the backend.
///
/// Implementations turn an HTTP 401 or an `isAuthorized: false` envelope into
/// [`BackendError::Unauthorized`]; every other envelope is returned as is.
#[async_trait]
pub trait CustomerBackend: Send + Sync {
    async fn list_customers(
        &self,
        token: &AdminToken,
        request: ListRequest,
    ) -> BackendResult<ListEnvelope>;

    async fn update_payment_type(
        &self,
        token: &AdminToken,
        customer_id: &CustomerId,
        payment_type: PaymentType,
    ) -> BackendResult<ActionEnvelope>;

    async fn upload_customers(
        &self,
        token: &AdminToken,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BackendResult<ActionEnvelope>;

    async fn login(&self, email: &AdminEmail, password: &str) -> BackendResult<LoginEnvelope>;

    async fn profile(&self, token: &AdminToken) -> BackendResult<ProfileEnvelope>;

    async fn list_users(
        &self,
        token: &AdminToken,
        pagination: Pagination,
    ) -> BackendResult<UsersEnvelope>;

    async fn create_user(
        &self,
        token: &AdminToken,
        user: &NewAdminUser,
    ) -> BackendResult<ActionEnvelope>;

    async fn update_user(
        &self,
        token: &AdminToken,
        id: &AdminUserId,
        update: &AdminUserUpdate,
    ) -> BackendResult<ActionEnvelope>;
}
