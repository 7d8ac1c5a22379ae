//! Customer table, export, payment type and upload endpoints.

use actix_multipart::form::MultipartForm;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, put, web};
use chrono::Local;
use serde_json::json;

use crate::backend::{AdminToken, CustomerBackend};
use crate::dto::customers::CustomerQuery;
use crate::forms::customers::{PaymentTypeChange, UpdatePaymentTypeForm, UploadCustomersForm};
use crate::grid::GridHandle;
use crate::models::config::ServerConfig;
use crate::routes::{ApiMessage, failure};
use crate::services::{
    ServiceError, auth as auth_service, customers as customers_service, upload as upload_service,
};
use crate::spreadsheet::{SpreadsheetCodec, XLSX_CONTENT_TYPE};

/// Returns one page of the filtered customer table.
#[get("/customers/list")]
pub async fn list_customers(
    token: AdminToken,
    query: web::Query<CustomerQuery>,
    grid: web::Data<GridHandle>,
    backend: web::Data<dyn CustomerBackend>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match customers_service::load_customer_page(
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
        Err(err) => failure("Failed to list customers", err),
    }
}

/// Downloads the whole filtered set as an Excel workbook.
#[get("/customers/export")]
pub async fn export_customers(
    token: AdminToken,
    query: web::Query<CustomerQuery>,
    grid: web::Data<GridHandle>,
    backend: web::Data<dyn CustomerBackend>,
    codec: web::Data<dyn SpreadsheetCodec>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match customers_service::export_customers(
        grid.get_ref(),
        backend.get_ref(),
        codec.get_ref(),
        &admin,
        &token,
        query.into_inner(),
        server_config.fetch_limit,
        Local::now().naive_local(),
    )
    .await
    {
        Ok(file) => HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ))
            .body(file.bytes),
        Err(err) => failure("Failed to export customers", err),
    }
}

#[put("/customers/update-payment-type")]
pub async fn update_payment_type(
    token: AdminToken,
    grid: web::Data<GridHandle>,
    backend: web::Data<dyn CustomerBackend>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<UpdatePaymentTypeForm>,
) -> impl Responder {
    let change = match PaymentTypeChange::try_from(form) {
        Ok(change) => change,
        Err(err) => return failure("Invalid payment type form", ServiceError::from(err)),
    };

    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match customers_service::update_payment_type(
        grid.get_ref(),
        backend.get_ref(),
        &admin,
        &token,
        change,
        server_config.fetch_limit,
    )
    .await
    {
        Ok(message) => HttpResponse::Ok().json(ApiMessage::ok(message)),
        Err(err) => failure("Failed to update payment type", err),
    }
}

/// Accepts an Excel workbook of customers and forwards it to the backend.
#[post("/customers/uploadCustomers")]
pub async fn upload_customers(
    token: AdminToken,
    grid: web::Data<GridHandle>,
    backend: web::Data<dyn CustomerBackend>,
    codec: web::Data<dyn SpreadsheetCodec>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadCustomersForm>,
) -> impl Responder {
    let workbook = match form.into_workbook() {
        Ok(workbook) => workbook,
        Err(err) => return failure("Failed to read upload", ServiceError::from(err)),
    };

    let admin = match auth_service::current_admin(backend.get_ref(), &token).await {
        Ok(admin) => admin,
        Err(err) => return failure("Failed to resolve admin", err),
    };

    match upload_service::upload_customers(
        grid.get_ref(),
        backend.get_ref(),
        codec.get_ref(),
        &admin,
        &token,
        workbook,
        server_config.fetch_limit,
    )
    .await
    {
        Ok(message) => HttpResponse::Ok().json(ApiMessage::ok(message)),
        Err(err) => failure("Failed to upload customers", err),
    }
}
