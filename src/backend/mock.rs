//! Mock backend for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::backend::errors::BackendResult;
use crate::backend::{AdminToken, CustomerBackend, ListRequest, Pagination};
use crate::domain::admin::{AdminUserUpdate, NewAdminUser};
use crate::domain::customer::PaymentType;
use crate::domain::types::{AdminEmail, AdminUserId, CustomerId};
use crate::models::auth::{LoginEnvelope, ProfileEnvelope};
use crate::models::customer::ListEnvelope;
use crate::models::envelope::ActionEnvelope;
use crate::models::users::UsersEnvelope;

mock! {
    pub Backend {}

    #[async_trait]
    impl CustomerBackend for Backend {
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
}
