//! Back-office user management.

use crate::backend::{AdminToken, CustomerBackend, Pagination};
use crate::domain::admin::{AccessPolicy, Action, AdminUserUpdate, Module, NewAdminUser};
use crate::domain::types::AdminUserId;
use crate::dto::users::{UsersPageData, UsersQuery};
use crate::grid::pagination::{BASE_PAGE_SIZES, PageWindow, Paginated};
use crate::services::{ServiceError, ServiceResult, ensure_allowed};

/// Lists admin accounts one backend page at a time.
pub async fn list_users<B, P>(
    backend: &B,
    policy: &P,
    token: &AdminToken,
    query: UsersQuery,
) -> ServiceResult<UsersPageData>
where
    B: CustomerBackend + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::User, Action::Read)?;

    let window = PageWindow {
        page_size: query.per_page.unwrap_or(BASE_PAGE_SIZES[0]).max(1),
        current_page: query.page.unwrap_or(1).max(1),
    };

    let envelope = backend
        .list_users(
            token,
            Pagination {
                page: window.current_page,
                per_page: window.page_size,
            },
        )
        .await
        .map_err(|err| {
            log::error!("Failed to list users: {err}");
            ServiceError::from(err)
        })?;

    if !envelope.success {
        return Err(ServiceError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "Failed to load users".to_string()),
        ));
    }

    Ok(UsersPageData {
        users: Paginated::new(envelope.data, window, envelope.total_records),
    })
}

/// Creates a back-office account.
pub async fn create_user<B, P>(
    backend: &B,
    policy: &P,
    token: &AdminToken,
    user: NewAdminUser,
) -> ServiceResult<String>
where
    B: CustomerBackend + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::User, Action::Create)?;

    let envelope = backend.create_user(token, &user).await.map_err(|err| {
        log::error!("Failed to create user {}: {err}", user.email);
        ServiceError::from(err)
    })?;

    if !envelope.success {
        return Err(ServiceError::Rejected(
            envelope.message_or("Failed to create user."),
        ));
    }

    log::info!("Created admin user {}", user.email);
    Ok(envelope.message_or("User created successfully"))
}

/// Renames, re-addresses or (de)activates a back-office account.
pub async fn update_user<B, P>(
    backend: &B,
    policy: &P,
    token: &AdminToken,
    id: AdminUserId,
    update: AdminUserUpdate,
) -> ServiceResult<String>
where
    B: CustomerBackend + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::User, Action::Update)?;

    let envelope = backend
        .update_user(token, &id, &update)
        .await
        .map_err(|err| {
            log::error!("Failed to update user {id}: {err}");
            ServiceError::from(err)
        })?;

    if !envelope.success {
        return Err(ServiceError::Rejected(envelope.message_or("Update failed")));
    }

    log::info!("Updated admin user {id} (active: {})", update.is_active);
    Ok(envelope.message_or("User updated successfully"))
}
