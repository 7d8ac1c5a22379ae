//! Back-office service for the RepayKaro debt-settlement platform.
//!
//! The `data` feature builds the domain layer and the customer grid engine
//! only. The `server` feature adds the Actix-web API, the backend client and
//! the spreadsheet codec.

pub mod domain;
pub mod grid;
pub mod models;

#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod spreadsheet;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::backend::{CustomerBackend, HttpBackend};
    use crate::grid::GridHandle;
    use crate::models::config::ServerConfig;
    use crate::routes;
    use crate::spreadsheet::{SpreadsheetCodec, XlsxCodec};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let backend = HttpBackend::from_config(&server_config).map_err(|e| {
            std::io::Error::other(format!("Failed to build backend client: {e}"))
        })?;
        let backend: Arc<dyn CustomerBackend> = Arc::new(backend);
        let codec: Arc<dyn SpreadsheetCodec> = Arc::new(XlsxCodec::new());

        // One working set shared by every worker.
        let grid = web::Data::new(GridHandle::default());

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Starting admin service on {}:{} against {}",
            bind_address.0,
            bind_address.1,
            server_config.api_base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .configure(routes::configure)
                .app_data(grid.clone())
                .app_data(web::Data::from(backend.clone()))
                .app_data(web::Data::from(codec.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
