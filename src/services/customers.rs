//! Customer table use cases: listing, exporting and payment type changes.

use chrono::NaiveDateTime;

use crate::backend::{AdminToken, BackendError, CustomerBackend, ListRequest};
use crate::domain::admin::{AccessPolicy, Action, Module};
use crate::domain::filter::PaymentStatus;
use crate::dto::customers::{CustomerPageData, CustomerQuery, ExportFile, StatusOption};
use crate::forms::customers::PaymentTypeChange;
use crate::grid::pagination::nearest_page_size;
use crate::grid::{FetchOutcome, GridHandle, LoadOutcome};
use crate::models::customer::ListEnvelope;
use crate::services::{ServiceError, ServiceResult, ensure_allowed};
use crate::spreadsheet::{SpreadsheetCodec, export_filename};

fn fetch_outcome(result: Result<ListEnvelope, BackendError>, fetch_limit: usize) -> FetchOutcome {
    match result {
        Ok(envelope) if envelope.success => {
            if let Some(total) = envelope.total_records
                && total > fetch_limit
            {
                log::warn!("Backend holds {total} customers, only {fetch_limit} are loaded");
            }
            FetchOutcome::Loaded(envelope.into_records())
        }
        Ok(envelope) => FetchOutcome::Failed(
            envelope
                .message
                .unwrap_or_else(|| "Failed to fetch customers".to_string()),
        ),
        Err(BackendError::Unauthorized) => FetchOutcome::Unauthorized,
        Err(err) => FetchOutcome::Failed(err.to_string()),
    }
}

/// Replaces the working set with a fresh copy from the backend.
///
/// The grid lock is released while the request is in flight; a response
/// overtaken by a newer load is dropped without error. If the caller goes
/// away mid-request the load is withdrawn.
pub async fn refresh_grid<B>(
    grid: &GridHandle,
    backend: &B,
    token: &AdminToken,
    fetch_limit: usize,
) -> ServiceResult<()>
where
    B: CustomerBackend + ?Sized,
{
    let pending = grid.start_load();

    let result = backend
        .list_customers(token, ListRequest::new(fetch_limit))
        .await;
    let outcome = fetch_outcome(result, fetch_limit);

    match pending.complete(outcome) {
        LoadOutcome::Applied { .. } | LoadOutcome::Discarded => Ok(()),
        LoadOutcome::Unauthorized => Err(ServiceError::Unauthorized),
        LoadOutcome::Failed(message) => Err(ServiceError::Backend(message)),
    }
}

pub(crate) async fn ensure_loaded<B>(
    grid: &GridHandle,
    backend: &B,
    token: &AdminToken,
    force: bool,
    fetch_limit: usize,
) -> ServiceResult<()>
where
    B: CustomerBackend + ?Sized,
{
    let loaded = grid.lock().is_loaded();
    if force || !loaded {
        refresh_grid(grid, backend, token, fetch_limit).await?;
    }
    Ok(())
}

/// Loads the visible page of the customer table.
pub async fn load_customer_page<B, P>(
    grid: &GridHandle,
    backend: &B,
    policy: &P,
    token: &AdminToken,
    query: CustomerQuery,
    fetch_limit: usize,
) -> ServiceResult<CustomerPageData>
where
    B: CustomerBackend + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::Customer, Action::Read)?;
    let criteria = query.criteria()?;

    ensure_loaded(grid, backend, token, query.refresh, fetch_limit).await?;

    let mut grid = grid.lock();
    grid.apply_filter(criteria);
    let size = nearest_page_size(query.per_page, &grid.page_size_options());
    grid.set_page_size(size)?;
    grid.set_page(query.page.unwrap_or(1));

    Ok(CustomerPageData {
        customers: grid.page(),
        criteria: grid.criteria().clone(),
        status_options: PaymentStatus::OPTIONS
            .into_iter()
            .map(StatusOption::from)
            .collect(),
        total_records: grid.records().len(),
        state: grid.state(),
    })
}

/// Builds the workbook for the whole filtered set.
#[allow(clippy::too_many_arguments)]
pub async fn export_customers<B, C, P>(
    grid: &GridHandle,
    backend: &B,
    codec: &C,
    policy: &P,
    token: &AdminToken,
    query: CustomerQuery,
    fetch_limit: usize,
    now: NaiveDateTime,
) -> ServiceResult<ExportFile>
where
    B: CustomerBackend + ?Sized,
    C: SpreadsheetCodec + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::Customer, Action::Read)?;
    let criteria = query.criteria()?;

    ensure_loaded(grid, backend, token, query.refresh, fetch_limit).await?;

    let report = {
        let mut grid = grid.lock();
        grid.apply_filter(criteria);
        grid.export_report()
    };

    let bytes = codec.write_report(&report).map_err(|err| {
        log::error!("Failed to write customer report: {err}");
        ServiceError::from(err)
    })?;
    log::info!("Exported {} customers", report.rows.len());

    Ok(ExportFile {
        filename: export_filename(now),
        bytes,
    })
}

/// Changes the repayment track of a customer and reloads the working set.
pub async fn update_payment_type<B, P>(
    grid: &GridHandle,
    backend: &B,
    policy: &P,
    token: &AdminToken,
    change: PaymentTypeChange,
    fetch_limit: usize,
) -> ServiceResult<String>
where
    B: CustomerBackend + ?Sized,
    P: AccessPolicy + ?Sized,
{
    ensure_allowed(policy, Module::Customer, Action::Update)?;

    {
        let grid = grid.lock();
        let complete = grid.is_loaded() && grid.records().len() < fetch_limit;
        if complete && !grid.records().iter().any(|r| r.id == change.customer_id) {
            log::warn!("Customer {} is not in the working set", change.customer_id);
            return Err(ServiceError::NotFound);
        }
    }

    let envelope = backend
        .update_payment_type(token, &change.customer_id, change.payment_type)
        .await
        .map_err(|err| {
            log::error!("Failed to update payment type: {err}");
            ServiceError::from(err)
        })?;

    if !envelope.success {
        return Err(ServiceError::Rejected(
            envelope.message_or("Failed to update payment type"),
        ));
    }

    if let Err(err) = refresh_grid(grid, backend, token, fetch_limit).await {
        log::error!("Failed to reload customers after payment type update: {err}");
    }

    Ok(envelope.message_or("Payment type updated successfully"))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use calamine::{Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::domain::admin::MockAccessPolicy;
    use crate::domain::customer::PaymentType;
    use crate::domain::types::CustomerId;
    use crate::models::envelope::ActionEnvelope;
    use crate::spreadsheet::XlsxCodec;

    fn token() -> AdminToken {
        AdminToken::new("token").unwrap()
    }

    fn allow_all() -> MockAccessPolicy {
        let mut policy = MockAccessPolicy::new();
        policy.expect_allows().returning(|_, _| true);
        policy
    }

    fn deny_all() -> MockAccessPolicy {
        let mut policy = MockAccessPolicy::new();
        policy.expect_allows().returning(|_, _| false);
        policy
    }

    fn envelope() -> ListEnvelope {
        serde_json::from_value(json!({
            "success": true,
            "totalRecords": 3,
            "data": [
                { "_id": "c1", "customer": "Asha", "phone": "9800000001", "isPaid": true,
                  "fore_closure": "1000", "lender_name": "Axis" },
                { "_id": "c2", "customer": "Ravi", "phone": "9800000002", "isPaid": true,
                  "fore_closure": { "$numberDecimal": "250.50" } },
                { "_id": "c3", "customer": "Meera", "phone": "9800000003", "isPaid": false,
                  "fore_closure": "99" }
            ]
        }))
        .unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[actix_web::test]
    async fn first_page_load_fetches_and_filters() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .times(1)
            .withf(|_, request| request.pagination.per_page == 500)
            .returning(|_, _| Ok(envelope()));

        let query = CustomerQuery {
            status: Some(1),
            ..Default::default()
        };
        let data = load_customer_page(&grid, &backend, &allow_all(), &token(), query, 500)
            .await
            .unwrap();

        assert_eq!(data.total_records, 3);
        assert_eq!(data.customers.total_items, 2);
        assert_eq!(data.customers.page_size_options, vec![2]);
        assert_eq!(data.customers.page_size, 2);
        assert_eq!(data.status_options.len(), 4);
    }

    #[actix_web::test]
    async fn loaded_grid_is_reused_until_refresh() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .times(2)
            .returning(|_, _| Ok(envelope()));

        let policy = allow_all();
        for refresh in [false, false, true] {
            let query = CustomerQuery {
                refresh,
                ..Default::default()
            };
            load_customer_page(&grid, &backend, &policy, &token(), query, 500)
                .await
                .unwrap();
        }
    }

    #[actix_web::test]
    async fn listing_requires_read_permission() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend.expect_list_customers().times(0);

        let result = load_customer_page(
            &grid,
            &backend,
            &deny_all(),
            &token(),
            CustomerQuery::default(),
            500,
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Forbidden { .. })));
    }

    #[actix_web::test]
    async fn unauthorized_backend_surfaces_as_unauthorized() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .returning(|_, _| Err(BackendError::Unauthorized));

        let result = load_customer_page(
            &grid,
            &backend,
            &allow_all(),
            &token(),
            CustomerQuery::default(),
            500,
        )
        .await;
        assert_eq!(result.unwrap_err(), ServiceError::Unauthorized);
    }

    #[actix_web::test]
    async fn failed_refresh_keeps_previous_working_set() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        let mut calls = 0;
        backend.expect_list_customers().returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(envelope())
            } else {
                Err(BackendError::Transport("connection reset".into()))
            }
        });

        refresh_grid(&grid, &backend, &token(), 500).await.unwrap();
        let result = refresh_grid(&grid, &backend, &token(), 500).await;

        assert!(matches!(result, Err(ServiceError::Backend(_))));
        assert_eq!(grid.lock().records().len(), 3);
    }

    #[actix_web::test]
    async fn oversized_page_request_is_coerced() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .returning(|_, _| Ok(envelope()));

        let query = CustomerQuery {
            per_page: Some(100),
            page: Some(9),
            ..Default::default()
        };
        let data = load_customer_page(&grid, &backend, &allow_all(), &token(), query, 500)
            .await
            .unwrap();
        assert_eq!(data.customers.page_size, 3);
        assert_eq!(data.customers.page, 1);
    }

    #[actix_web::test]
    async fn export_covers_filtered_set_with_totals() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .times(1)
            .returning(|_, _| Ok(envelope()));

        let query = CustomerQuery {
            status: Some(1),
            ..Default::default()
        };
        let file = export_customers(
            &grid,
            &backend,
            &XlsxCodec::new(),
            &allow_all(),
            &token(),
            query,
            500,
            now(),
        )
        .await
        .unwrap();

        assert_eq!(file.filename, "customers_2025-01-02_030405.xlsx");
        let mut workbook: Xlsx<_> =
            calamine::open_workbook_from_rs(std::io::Cursor::new(file.bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3][0], Data::String("Total".into()));
        assert_eq!(rows[3][3], Data::Float(1250.5));
    }

    #[actix_web::test]
    async fn payment_type_update_reloads_grid() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .times(2)
            .returning(|_, _| Ok(envelope()));
        backend
            .expect_update_payment_type()
            .times(1)
            .withf(|_, id, payment_type| {
                id.as_str() == "c3" && *payment_type == PaymentType::Settlement
            })
            .returning(|_, _, _| {
                Ok(ActionEnvelope {
                    success: true,
                    ..Default::default()
                })
            });

        refresh_grid(&grid, &backend, &token(), 500).await.unwrap();
        let change = PaymentTypeChange {
            customer_id: CustomerId::new("c3").unwrap(),
            payment_type: PaymentType::Settlement,
        };
        let message = update_payment_type(&grid, &backend, &allow_all(), &token(), change, 500)
            .await
            .unwrap();
        assert_eq!(message, "Payment type updated successfully");
    }

    #[actix_web::test]
    async fn payment_type_update_for_unknown_customer() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend
            .expect_list_customers()
            .times(1)
            .returning(|_, _| Ok(envelope()));
        backend.expect_update_payment_type().times(0);

        refresh_grid(&grid, &backend, &token(), 500).await.unwrap();
        let change = PaymentTypeChange {
            customer_id: CustomerId::new("missing").unwrap(),
            payment_type: PaymentType::Foreclosure,
        };
        let result = update_payment_type(&grid, &backend, &allow_all(), &token(), change, 500).await;
        assert_eq!(result.unwrap_err(), ServiceError::NotFound);
    }

    #[actix_web::test]
    async fn rejected_payment_type_update_keeps_message() {
        let grid = GridHandle::default();
        let mut backend = MockBackend::new();
        backend.expect_update_payment_type().returning(|_, _, _| {
            Ok(ActionEnvelope {
                success: false,
                message: Some("Customer already paid".into()),
                ..Default::default()
            })
        });

        let change = PaymentTypeChange {
            customer_id: CustomerId::new("c1").unwrap(),
            payment_type: PaymentType::PartPayment,
        };
        let result = update_payment_type(&grid, &backend, &allow_all(), &token(), change, 500).await;
        assert_eq!(
            result.unwrap_err(),
            ServiceError::Rejected("Customer already paid".into())
        );
    }
}
