//! Bulk customer upload from an Excel workbook.

use crate::backend::{AdminToken, CustomerBackend};
use crate::domain::admin::{AccessPolicy, Action, Module};
use crate::forms::customers::UploadedWorkbook;
use crate::grid::GridHandle;
use crate::services::customers::refresh_grid;
use crate::services::{ServiceError, ServiceResult, ensure_allowed};
use crate::spreadsheet::{SpreadsheetCodec, is_workbook_name, validate_headers};

/// Checks the workbook locally, forwards it to the backend and reloads the
/// working set. Returns the backend confirmation message.
pub async fn upload_customers<B, C, P>(
    grid: &GridHandle,
    backend: &B,
    codec: &C,
    policy: &P,
    token: &AdminToken,
    workbook: UploadedWorkbook,
    fetch_limit: usize,
) -> ServiceResult<String>
where
    B: CustomerBackend + ?Sized,
    C: SpreadsheetCodec + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::Customer, Action::Create)?;

    if !is_workbook_name(&workbook.filename) {
        return Err(ServiceError::Form(
            "Only .xlsx or .xls files are accepted".to_string(),
        ));
    }
    if workbook.bytes.is_empty() {
        return Err(ServiceError::Form("Uploaded file is empty".to_string()));
    }

    let header = codec.read_header_row(&workbook.bytes).map_err(|err| {
        log::error!("Failed to read uploaded workbook {}: {err}", workbook.filename);
        ServiceError::from(err)
    })?;

    let missing = validate_headers(&header);
    if !missing.is_empty() {
        log::warn!("Upload {} misses headers {missing:?}", workbook.filename);
        return Err(ServiceError::MissingHeaders(
            missing.into_iter().map(str::to_string).collect(),
        ));
    }

    let envelope = backend
        .upload_customers(token, &workbook.filename, workbook.bytes)
        .await
        .map_err(|err| {
            log::error!("Failed to upload customers: {err}");
            ServiceError::from(err)
        })?;

    if !envelope.success {
        if !envelope.missing_headers.is_empty() {
            return Err(ServiceError::MissingHeaders(envelope.missing_headers));
        }
        return Err(ServiceError::Rejected(
            envelope.message_or("Failed to upload Excel file."),
        ));
    }

    log::info!("Uploaded customer workbook {}", workbook.filename);

    if let Err(err) = refresh_grid(grid, backend, token, fetch_limit).await {
        log::error!("Failed to reload customers after upload: {err}");
    }

    Ok(envelope.message_or("Upload successful!"))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::domain::admin::MockAccessPolicy;
    use crate::models::customer::ListEnvelope;
    use crate::models::envelope::ActionEnvelope;
    use crate::spreadsheet::{CodecError, MockSpreadsheetCodec, REQUIRED_HEADERS};

    fn token() -> AdminToken {
        AdminToken::new("token").unwrap()
    }

    fn policy(allowed: bool) -> MockAccessPolicy {
        let mut policy = MockAccessPolicy::new();
        policy.expect_allows().returning(move |_, _| allowed);
        policy
    }

    fn workbook(name: &str) -> UploadedWorkbook {
        UploadedWorkbook {
            filename: name.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn full_header_codec() -> MockSpreadsheetCodec {
        let mut codec = MockSpreadsheetCodec::new();
        codec
            .expect_read_header_row()
            .returning(|_| Ok(REQUIRED_HEADERS.iter().map(|h| h.to_string()).collect()));
        codec
    }

    #[actix_web::test]
    async fn forwards_valid_workbook_and_reloads() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_upload_customers()
            .times(1)
            .withf(|_, filename, bytes| filename == "customers.xlsx" && bytes == &vec![1, 2, 3])
            .returning(|_, _, _| {
                Ok(ActionEnvelope {
                    success: true,
                    message: Some("12 customers imported".into()),
                    ..Default::default()
                })
            });
        backend.expect_list_customers().times(1).returning(|_, _| {
            Ok(serde_json::from_value::<ListEnvelope>(json!({
                "success": true,
                "data": [{ "_id": "c1", "customer": "Asha" }]
            }))
            .unwrap())
        });

        let message = upload_customers(
            &grid,
            &backend,
            &full_header_codec(),
            &policy(true),
            &token(),
            workbook("customers.xlsx"),
            500,
        )
        .await
        .unwrap();

        assert_eq!(message, "12 customers imported");
        assert_eq!(grid.lock().records().len(), 1);
    }

    #[actix_web::test]
    async fn rejects_wrong_extension_and_empty_file() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend.expect_upload_customers().times(0);
        let codec = MockSpreadsheetCodec::new();

        let csv = upload_customers(
            &grid,
            &backend,
            &codec,
            &policy(true),
            &token(),
            workbook("customers.csv"),
            500,
        )
        .await;
        assert!(matches!(csv, Err(ServiceError::Form(_))));

        let empty = UploadedWorkbook {
            filename: "customers.xlsx".into(),
            bytes: Vec::new(),
        };
        let result =
            upload_customers(&grid, &backend, &codec, &policy(true), &token(), empty, 500).await;
        assert_eq!(
            result.unwrap_err(),
            ServiceError::Form("Uploaded file is empty".into())
        );
    }

    #[actix_web::test]
    async fn missing_headers_stop_the_upload() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend.expect_upload_customers().times(0);
        let mut codec = MockSpreadsheetCodec::new();
        codec
            .expect_read_header_row()
            .returning(|_| Ok(vec!["Mobile".into(), "Settlement".into()]));

        let result = upload_customers(
            &grid,
            &backend,
            &codec,
            &policy(true),
            &token(),
            workbook("customers.xlsx"),
            500,
        )
        .await;

        match result {
            Err(ServiceError::MissingHeaders(missing)) => {
                assert_eq!(missing.len(), 6);
                assert_eq!(missing[0], "Fore Closure");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn unreadable_workbook_is_a_form_error() {
        let grid = GridHandle::default();
        let backend = MockBackend::new();
        let mut codec = MockSpreadsheetCodec::new();
        codec
            .expect_read_header_row()
            .returning(|_| Err(CodecError::Read("zip error".into())));

        let result = upload_customers(
            &grid,
            &backend,
            &codec,
            &policy(true),
            &token(),
            workbook("customers.xls"),
            500,
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn backend_missing_headers_are_reported() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend.expect_upload_customers().returning(|_, _, _| {
            Ok(ActionEnvelope {
                success: false,
                missing_headers: vec!["payment url".into()],
                ..Default::default()
            })
        });

        let result = upload_customers(
            &grid,
            &backend,
            &full_header_codec(),
            &policy(true),
            &token(),
            workbook("customers.xlsx"),
            500,
        )
        .await;
        assert_eq!(
            result.unwrap_err(),
            ServiceError::MissingHeaders(vec!["payment url".into()])
        );
    }

    #[actix_web::test]
    async fn upload_requires_create_permission() {
        let grid = GridHandle::default();
        let backend = MockBackend::new();
        let codec = MockSpreadsheetCodec::new();

        let result = upload_customers(
            &grid,
            &backend,
            &codec,
            &policy(false),
            &token(),
            workbook("customers.xlsx"),
            500,
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Forbidden { .. })));
    }
}
