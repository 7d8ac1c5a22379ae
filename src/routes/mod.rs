//! JSON API of the back-office under `/api/admin`.

use std::future::{Ready, ready};

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use serde::Serialize;

use crate::backend::AdminToken;
use crate::services::ServiceError;

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod users;

/// Cookie carrying the backend token of the signed-in admin.
pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

const SESSION_DAYS: i64 = 30;

/// Registers every back-office route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .service(auth::login)
            .service(auth::current_admin)
            .service(auth::logout)
            .service(customers::list_customers)
            .service(customers::export_customers)
            .service(customers::update_payment_type)
            .service(customers::upload_customers)
            .service(users::list_users)
            .service(users::create_user)
            .service(users::update_user)
            .service(dashboard::dashboard),
    );
}

/// Session cookie set after a successful login.
pub fn session_cookie(token: &AdminToken, secure: bool) -> Cookie<'static> {
    Cookie::build(ADMIN_TOKEN_COOKIE, token.as_str().to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_DAYS))
        .finish()
}

/// Cookie that makes the browser forget the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(ADMIN_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

impl FromRequest for AdminToken {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.cookie(ADMIN_TOKEN_COOKIE)
                .and_then(|cookie| AdminToken::new(cookie.value()))
                .ok_or(ServiceError::Unauthorized),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_authorized: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_headers: Vec<String>,
}

/// Body of a successful mutation.
#[derive(Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized | ServiceError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ServiceError::Form(_) | ServiceError::MissingHeaders(_) | ServiceError::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Backend(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
            is_authorized: matches!(self, ServiceError::Unauthorized).then_some(false),
            missing_headers: match self {
                ServiceError::MissingHeaders(missing) => missing.clone(),
                _ => Vec::new(),
            },
        };

        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, ServiceError::Unauthorized) {
            builder.cookie(removal_cookie());
        }
        builder.json(body)
    }
}

/// Logs `err` at a level matching its cause and renders it.
pub fn failure(context: &str, err: ServiceError) -> HttpResponse {
    if err.status_code().is_server_error() {
        log::error!("{context}: {err}");
    } else {
        log::warn!("{context}: {err}");
    }
    err.error_response()
}
