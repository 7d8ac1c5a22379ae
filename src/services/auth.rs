//! Admin sign-in and profile lookup.

use crate::backend::{AdminToken, BackendError, CustomerBackend};
use crate::domain::admin::AdminProfile;
use crate::dto::auth::AdminSession;
use crate::forms::auth::LoginPayload;
use crate::services::{ServiceError, ServiceResult};

/// Exchanges credentials for a backend token.
pub async fn login<B>(backend: &B, payload: LoginPayload) -> ServiceResult<AdminSession>
where
    B: CustomerBackend + ?Sized,
{
    let envelope = backend
        .login(&payload.email, &payload.password)
        .await
        .map_err(|err| match err {
            BackendError::Unauthorized => {
                ServiceError::InvalidCredentials("Login failed".to_string())
            }
            other => {
                log::error!("Admin login request failed: {other}");
                ServiceError::from(other)
            }
        })?;

    let Some(token) = envelope.token().and_then(AdminToken::new) else {
        log::warn!("Rejected login for {}", payload.email);
        return Err(ServiceError::InvalidCredentials(
            envelope
                .message
                .unwrap_or_else(|| "Login failed".to_string()),
        ));
    };

    log::info!("Admin {} signed in", payload.email);

    Ok(AdminSession {
        token,
        name: envelope.name,
        email: envelope.email,
    })
}

/// Profile and permissions of the admin owning `token`.
pub async fn current_admin<B>(backend: &B, token: &AdminToken) -> ServiceResult<AdminProfile>
where
    B: CustomerBackend + ?Sized,
{
    let envelope = backend.profile(token).await.map_err(|err| {
        if err != BackendError::Unauthorized {
            log::error!("Failed to fetch admin profile: {err}");
        }
        ServiceError::from(err)
    })?;

    match envelope.user {
        Some(user) if envelope.success => Ok(user),
        _ => Err(ServiceError::Unauthorized),
    }
}
