//! Dashboard endpoint.

use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::backend::{AdminToken, CustomerBackend};
use crate::dto::dashboard::DashboardQuery;
use crate::grid::GridHandle;
use crate::models::config::ServerConfig;
use crate::routes::failure;
use crate::services::{auth as auth_service, dashboard as dashboard_service};

/// Head counts and payment sums over the loaded customers.
#[get("/dashboard")]
pub async fn dashboard(
    token: AdminToken,
    query: web::Query<DashboardQuery>,
    grid: web::Data<GridHandle>,
    backend: web::Data<dyn CustomerBackend>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match dashboard_service::load_dashboard(
        grid.get_ref(),
        backend.get_ref(),
        &admin,
        &token,
        query.into_inner(),
        server_config.fetch_limit,
    )
    .await
    {
        Ok(data) => HttpResponse::Ok().json(json!({ "success": true, "data": data })),
        Err(err) => failure("Failed to load dashboard", err),
    }
}
