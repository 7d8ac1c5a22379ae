//! Admin login, profile and logout.

use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::backend::{AdminToken, CustomerBackend};
use crate::dto::auth::SessionUser;
use crate::forms::auth::{LoginForm, LoginPayload};
use crate::models::config::ServerConfig;
use crate::routes::{ApiMessage, failure, removal_cookie, session_cookie};
use crate::services::{ServiceError, auth as auth_service};

/// Signs the admin in and stores the backend token in a cookie.
#[post("/login")]
pub async fn login(
    backend: web::Data<dyn CustomerBackend>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    let payload = match LoginPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return failure("Invalid login form", ServiceError::from(err)),
    };

    match auth_service::login(backend.get_ref(), payload).await {
        Ok(session) => HttpResponse::Ok()
            .cookie(session_cookie(&session.token, server_config.secure_cookies))
            .json(json!({
                "success": true,
                "message": "Login successful",
                "user": SessionUser::from(&session),
            })),
        Err(err) => failure("Admin login failed", err),
    }
}

/// Returns the profile and permissions of the signed-in admin.
#[get("/login")]
pub async fn current_admin(
    token: AdminToken,
    backend: web::Data<dyn CustomerBackend>,
) -> impl Responder {
    match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(user) => HttpResponse::Ok().json(json!({
            "success": true,
            "user": user,
            "message": "Admin info fetched successfully",
        })),
        Err(err) => failure("Failed to fetch admin info", err),
    }
}

#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(ApiMessage::ok("Logged out"))
}
