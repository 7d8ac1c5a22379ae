use rust_decimal::Decimal;
use serde_json::json;

use repaykaro_admin::domain::customer::CustomerRecord;
use repaykaro_admin::domain::filter::{FilterCriteria, PaymentStatus};
use repaykaro_admin::domain::money::Money;
use repaykaro_admin::domain::types::CustomerId;
use repaykaro_admin::grid::report::ReportCell;
use repaykaro_admin::grid::{
    CustomerGrid, FetchOutcome, GridError, GridHandle, LoadOutcome, LoadState,
};
use repaykaro_admin::models::customer::ListEnvelope;

fn customers(count: usize) -> Vec<CustomerRecord> {
    (1..=count)
        .map(|n| {
            let mut record = CustomerRecord::new(
                CustomerId::new(format!("c{n}")).unwrap(),
                format!("Customer {n}"),
                format!("98000{n:05}"),
            );
            record.is_paid = n % 2 == 0;
            record.lender = (n % 3 == 0).then(|| "Axis Bank".to_string());
            record.foreclosure = Money::new(Decimal::from(n as i64 * 100));
            record
        })
        .collect()
}

#[test]
fn newest_load_wins_over_a_late_stale_response() {
    let mut grid = CustomerGrid::new();

    let first = grid.begin_load();
    let second = grid.begin_load();

    let applied = grid.complete_load(second, FetchOutcome::Loaded(customers(4)));
    assert_eq!(applied, LoadOutcome::Applied { records: 4 });
    assert_eq!(grid.state(), LoadState::Ready);

    let stale = grid.complete_load(first, FetchOutcome::Loaded(customers(40)));
    assert_eq!(stale, LoadOutcome::Discarded);
    assert_eq!(grid.records().len(), 4);
    assert_eq!(grid.state(), LoadState::Ready);
}

#[test]
fn failed_reload_keeps_previous_working_set() {
    let mut grid = CustomerGrid::new();
    let ticket = grid.begin_load();
    let _ = grid.complete_load(ticket, FetchOutcome::Loaded(customers(12)));

    let ticket = grid.begin_load();
    let outcome = grid.complete_load(ticket, FetchOutcome::Failed("timeout".into()));

    assert_eq!(outcome, LoadOutcome::Failed("timeout".into()));
    assert_eq!(grid.state(), LoadState::Failed);
    assert_eq!(grid.last_error(), Some("timeout"));
    assert_eq!(grid.records().len(), 12);
    assert!(grid.is_loaded());
}

#[test]
fn filtering_paging_and_export_share_the_filtered_set() {
    let mut grid = CustomerGrid::with_records(customers(37));
    assert_eq!(grid.page_size_options(), vec![10, 25, 37]);

    grid.set_page_size(10).unwrap();
    grid.set_page(4);
    assert_eq!(grid.page_records().len(), 7);
    assert_eq!(grid.total_pages(), 4);

    grid.apply_filter(FilterCriteria::default().status(PaymentStatus::Paid));
    assert_eq!(grid.filtered_len(), 18);
    assert_eq!(grid.window().current_page, 1);
    assert_eq!(grid.page_records().len(), 10);

    let report = grid.export_report();
    assert_eq!(report.rows.len(), 18);
    let paid_total: i64 = (1..=37).filter(|n| n % 2 == 0).map(|n| n * 100).sum();
    assert_eq!(
        report.totals.as_ref().unwrap()[3],
        ReportCell::Money(Decimal::from(paid_total))
    );
}

#[test]
fn lender_filter_skips_records_without_lender() {
    let mut grid = CustomerGrid::with_records(customers(9));
    grid.apply_filter(FilterCriteria::default().lender("  axis "));

    let ids: Vec<&str> = grid.filtered().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["c3", "c6", "c9"]);
}

#[test]
fn page_size_must_be_offered() {
    let mut grid = CustomerGrid::with_records(customers(37));
    assert_eq!(
        grid.set_page_size(50),
        Err(GridError::InvalidPageSize {
            requested: 50,
            valid: vec![10, 25, 37],
        })
    );
}

#[test]
fn shrinking_filter_normalizes_page_size() {
    let mut grid = CustomerGrid::with_records(customers(37));
    grid.set_page_size(25).unwrap();

    grid.apply_filter(FilterCriteria::default().name("Customer 1"));
    // "Customer 1", "Customer 10".."Customer 19"
    assert_eq!(grid.filtered_len(), 11);
    assert_eq!(grid.page_size_options(), vec![10, 11]);
    assert_eq!(grid.window().page_size, 11);
    assert_eq!(grid.total_pages(), 1);
}

#[test]
fn export_of_huge_amounts_keeps_grid_usable() {
    let envelope: ListEnvelope = serde_json::from_value(json!({
        "success": true,
        "data": [
            { "_id": "c1", "customer": "A", "fore_closure": "50000000000000000000000000000" },
            { "_id": "c2", "customer": "B", "fore_closure": "50000000000000000000000000000" }
        ]
    }))
    .unwrap();

    let handle = GridHandle::default();
    let pending = handle.start_load();
    pending.complete(FetchOutcome::Loaded(envelope.into_records()));

    let report = handle.lock().export_report();
    assert_eq!(
        report.totals.as_ref().unwrap()[3],
        ReportCell::Money(Decimal::MAX)
    );

    let grid = handle.lock();
    assert_eq!(grid.records().len(), 2);
    assert_eq!(grid.state(), LoadState::Ready);
}

#[test]
fn cancelled_load_leaves_previous_state() {
    let handle = GridHandle::new(CustomerGrid::with_records(customers(5)));

    let pending = handle.start_load();
    assert_eq!(handle.lock().state(), LoadState::Loading);
    drop(pending);

    assert_eq!(handle.lock().state(), LoadState::Ready);
    assert_eq!(handle.lock().records().len(), 5);
}
