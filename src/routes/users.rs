//! Admin user management endpoints.

use actix_web::{HttpResponse, Responder, get, post, put, web};
use serde_json::json;

use crate::backend::{AdminToken, CustomerBackend};
use crate::domain::admin::{AdminUserUpdate, NewAdminUser};
use crate::domain::types::AdminUserId;
use crate::dto::users::UsersQuery;
use crate::forms::FormError;
use crate::forms::users::{CreateUserForm, UpdateUserForm};
use crate::routes::{ApiMessage, failure};
use crate::services::{ServiceError, auth as auth_service, users as users_service};

#[get("/users/list")]
pub async fn list_users(
    token: AdminToken,
    query: web::Query<UsersQuery>,
    backend: web::Data<dyn CustomerBackend>,
) -> impl Responder {
    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match users_service::list_users(backend.get_ref(), &admin, &token, query.into_inner()).await {
        Ok(data) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": data.users.items,
            "totalRecords": data.users.total_items,
            "page": data.users.page,
            "totalPages": data.users.total_pages,
            "pages": data.users.pages,
            "pageSizeOptions": data.users.page_size_options,
        })),
        Err(err) => failure("Failed to list users", err),
    }
}

#[post("/users/create")]
pub async fn create_user(
    token: AdminToken,
    backend: web::Data<dyn CustomerBackend>,
    web::Json(form): web::Json<CreateUserForm>,
) -> impl Responder {
    let user = match NewAdminUser::try_from(form) {
        Ok(user) => user,
        Err(err) => return failure("Invalid user form", ServiceError::from(err)),
    };

    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match users_service::create_user(backend.get_ref(), &admin, &token, user).await {
        Ok(message) => HttpResponse::Ok().json(ApiMessage::ok(message)),
        Err(err) => failure("Failed to create user", err),
    }
}

#[put("/users/update/{id}")]
pub async fn update_user(
    token: AdminToken,
    id: web::Path<String>,
    backend: web::Data<dyn CustomerBackend>,
    web::Json(form): web::Json<UpdateUserForm>,
) -> impl Responder {
    let id = match AdminUserId::new(id.into_inner()) {
        Ok(id) => id,
        Err(_) => return failure("Invalid user id", ServiceError::from(FormError::InvalidUserId)),
    };
    let update = match AdminUserUpdate::try_from(form) {
        Ok(update) => update,
        Err(err) => return failure("Invalid user form", ServiceError::from(err)),
    };

    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match users_service::update_user(backend.get_ref(), &admin, &token, id, update).await {
        Ok(message) => HttpResponse::Ok().json(ApiMessage::ok(message)),
        Err(err) => failure("Failed to update user", err),
    }
}
