//! Tabular customer report with a totals row.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::customer::CustomerRecord;
use crate::domain::money::Money;

/// Sheet name used when the report is written to a workbook.
pub const REPORT_SHEET_NAME: &str = "Customers";

/// Label placed in the first column of the totals row.
pub const TOTALS_LABEL: &str = "Total";

/// What a column holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// Row position within the export scope.
    Index,
    Text,
    Money,
}

/// A fixed report column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReportColumn {
    pub title: &'static str,
    pub kind: ColumnKind,
    /// Width hint in characters for the spreadsheet writer.
    pub width: f64,
}

const fn column(title: &'static str, kind: ColumnKind, width: f64) -> ReportColumn {
    ReportColumn { title, kind, width }
}

/// Column set of the customer export, in order.
pub const CUSTOMER_COLUMNS: [ReportColumn; 11] = [
    column("Sr. No.", ColumnKind::Index, 8.0),
    column("Customer", ColumnKind::Text, 18.0),
    column("Phone", ColumnKind::Text, 14.0),
    column("Fore Closure", ColumnKind::Money, 14.0),
    column("Settlement", ColumnKind::Money, 14.0),
    column("Min. Part Payment", ColumnKind::Money, 18.0),
    column("Foreclosure Reward", ColumnKind::Money, 18.0),
    column("Settlement Reward", ColumnKind::Money, 18.0),
    column("Min. Part Payment Reward", ColumnKind::Money, 22.0),
    column("Status", ColumnKind::Text, 10.0),
    column("Lender", ColumnKind::Text, 18.0),
];

/// One cell of the report body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ReportCell {
    Index(usize),
    Text(String),
    Money(Decimal),
    Blank,
}

/// Report derived from the export scope; header, data rows and totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportReport {
    pub sheet_name: &'static str,
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<Vec<ReportCell>>,
    /// Present only when the report has at least one data row.
    pub totals: Option<Vec<ReportCell>>,
    /// Number of leading rows to freeze (the header).
    pub frozen_rows: u32,
}

impl ExportReport {
    /// Projects `records` through [`CUSTOMER_COLUMNS`] and sums money columns.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CustomerRecord>,
    {
        let columns = CUSTOMER_COLUMNS.to_vec();
        let rows: Vec<Vec<ReportCell>> = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| project(position + 1, record))
            .collect();

        let totals = if rows.is_empty() {
            None
        } else {
            Some(totals_row(&columns, &rows))
        };

        Self {
            sheet_name: REPORT_SHEET_NAME,
            columns,
            rows,
            totals,
            frozen_rows: 1,
        }
    }

    /// Header titles in column order.
    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.title).collect()
    }

    /// Rows as written to the sheet: header, data, and totals when present.
    pub fn row_count(&self) -> usize {
        1 + self.rows.len() + usize::from(self.totals.is_some())
    }
}

fn money(value: Money) -> ReportCell {
    ReportCell::Money(value.amount())
}

fn project(position: usize, record: &CustomerRecord) -> Vec<ReportCell> {
    vec![
        ReportCell::Index(position),
        ReportCell::Text(record.name.clone()),
        ReportCell::Text(record.phone.clone()),
        money(record.foreclosure),
        money(record.settlement),
        money(record.minimum_part_payment),
        money(record.foreclosure_reward),
        money(record.settlement_reward),
        money(record.minimum_part_payment_reward),
        ReportCell::Text(record.status_label().to_string()),
        ReportCell::Text(record.lender_label().to_string()),
    ]
}

fn totals_row(columns: &[ReportColumn], rows: &[Vec<ReportCell>]) -> Vec<ReportCell> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| match column.kind {
            ColumnKind::Money => {
                let total: Money = rows
                    .iter()
                    .map(|row| match row.get(idx) {
                        Some(ReportCell::Money(amount)) => Money::new(*amount),
                        _ => Money::ZERO,
                    })
                    .sum();
                ReportCell::Money(total.amount())
            }
            ColumnKind::Index => ReportCell::Text(TOTALS_LABEL.to_string()),
            ColumnKind::Text => ReportCell::Blank,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CustomerId;

    fn record(id: &str, foreclosure: i64, settlement: i64, reward_cents: i64) -> CustomerRecord {
        let mut record = CustomerRecord::new(CustomerId::new(id).unwrap(), id, "9800");
        record.foreclosure = Money::new(Decimal::from(foreclosure));
        record.settlement = Money::new(Decimal::from(settlement));
        record.foreclosure_reward = Money::new(Decimal::new(reward_cents, 2));
        record
    }

    #[test]
    fn empty_scope_is_header_only() {
        let records: Vec<CustomerRecord> = Vec::new();
        let report = ExportReport::from_records(&records);
        assert!(report.rows.is_empty());
        assert!(report.totals.is_none());
        assert_eq!(report.row_count(), 1);
        assert_eq!(report.header()[0], "Sr. No.");
        assert_eq!(report.header().len(), 11);
    }

    #[test]
    fn totals_match_hand_computed_sums() {
        let records = vec![
            record("a", 1000, 500, 1050),
            record("b", 2500, 0, 99),
            record("c", 0, 750, 1),
        ];

        let report = ExportReport::from_records(&records);
        let totals = report.totals.as_ref().unwrap();

        assert_eq!(totals[0], ReportCell::Text("Total".into()));
        assert_eq!(totals[1], ReportCell::Blank);
        assert_eq!(totals[3], ReportCell::Money(Decimal::from(3500)));
        assert_eq!(totals[4], ReportCell::Money(Decimal::from(1250)));
        assert_eq!(totals[5], ReportCell::Money(Decimal::ZERO));
        assert_eq!(totals[6], ReportCell::Money(Decimal::new(1150, 2)));
        assert_eq!(totals[9], ReportCell::Blank);
        assert_eq!(report.row_count(), 5);
    }

    #[test]
    fn totals_saturate_on_huge_amounts() {
        let mut first = record("a", 0, 0, 0);
        first.foreclosure = Money::new(Decimal::MAX);
        let second = first.clone();

        let report = ExportReport::from_records([&first, &second]);
        assert_eq!(
            report.totals.as_ref().unwrap()[3],
            ReportCell::Money(Decimal::MAX)
        );
    }

    #[test]
    fn rows_are_projected_in_column_order() {
        let mut paid = record("a", 10, 0, 0);
        paid.is_paid = true;
        paid.lender = Some("Axis".into());

        let report = ExportReport::from_records([&paid, &record("b", 0, 0, 0)]);

        assert_eq!(report.rows[0][0], ReportCell::Index(1));
        assert_eq!(report.rows[0][1], ReportCell::Text("a".into()));
        assert_eq!(report.rows[0][9], ReportCell::Text("Paid".into()));
        assert_eq!(report.rows[0][10], ReportCell::Text("Axis".into()));
        assert_eq!(report.rows[1][0], ReportCell::Index(2));
        assert_eq!(report.rows[1][9], ReportCell::Text("Pending".into()));
        assert_eq!(report.rows[1][10], ReportCell::Text("N/A".into()));
    }
}
