//! Dashboard figures: customer counts and payment sums over the working set,
//! plus account counts for admins who may see them.

use crate::backend::{AdminToken, CustomerBackend, Pagination};
use crate::domain::admin::{AccessPolicy, Action, Module};
use crate::dto::dashboard::{DashboardData, DashboardQuery, UserCounts};
use crate::grid::GridHandle;
use crate::services::customers::ensure_loaded;
use crate::services::{ServiceError, ServiceResult, ensure_allowed};

async fn user_counts<B>(backend: &B, token: &AdminToken, fetch_limit: usize) -> ServiceResult<UserCounts>
where
    B: CustomerBackend + ?Sized,
{
    let envelope = backend
        .list_users(
            token,
            Pagination {
                page: 1,
                per_page: fetch_limit,
            },
        )
        .await
        .map_err(|err| {
            log::error!("Failed to count users: {err}");
            ServiceError::from(err)
        })?;

    if envelope.is_unauthorized() {
        return Err(ServiceError::Unauthorized);
    }
    if !envelope.success {
        return Err(ServiceError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "Failed to load users".to_string()),
        ));
    }
    if envelope.total_records > envelope.data.len() {
        log::warn!(
            "Backend holds {} users, only {} are counted",
            envelope.total_records,
            envelope.data.len()
        );
    }
    Ok(UserCounts::from_users(&envelope.data))
}

/// Builds the dashboard from the loaded customers, fetching them first when
/// the grid is empty or a refresh is asked for.
pub async fn load_dashboard<B, P>(
    grid: &GridHandle,
    backend: &B,
    policy: &P,
    token: &AdminToken,
    query: DashboardQuery,
    fetch_limit: usize,
) -> ServiceResult<DashboardData>
where
    B: CustomerBackend + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::Customer, Action::Read)?;

    ensure_loaded(grid, backend, token, query.refresh, fetch_limit).await?;
    let metrics = grid.lock().metrics();

    let users = if policy.allows(Module::User, Action::Read) {
        Some(user_counts(backend, token, fetch_limit).await?)
    } else {
        None
    };

    Ok(DashboardData {
        users,
        customers: metrics.customers,
        payments: metrics.payments,
    })
}
