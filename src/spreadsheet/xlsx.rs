//! XLSX implementation of [`SpreadsheetCodec`].

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::grid::report::{ExportReport, ReportCell};
use crate::spreadsheet::{CodecError, CodecResult, SpreadsheetCodec};

const HEADER_FONT: u32 = 0x1E293B;
const HEADER_FILL: u32 = 0xE5E7EB;
const MONEY_FORMAT: &str = "#,##0.00";

impl From<XlsxError> for CodecError {
    fn from(err: XlsxError) -> Self {
        CodecError::Write(err.to_string())
    }
}

impl From<calamine::Error> for CodecError {
    fn from(err: calamine::Error) -> Self {
        CodecError::Read(err.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxCodec;

impl XlsxCodec {
    pub fn new() -> Self {
        Self
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

struct Formats {
    header: Format,
    money: Format,
    totals_label: Format,
    totals_money: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(HEADER_FONT))
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            money: Format::new().set_num_format(MONEY_FORMAT),
            totals_label: Format::new().set_bold(),
            totals_money: Format::new().set_bold().set_num_format(MONEY_FORMAT),
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &ReportCell,
    text_format: Option<&Format>,
    money_format: &Format,
) -> Result<(), XlsxError> {
    match (cell, text_format) {
        (ReportCell::Index(position), _) => {
            worksheet.write_number(row, col, *position as f64)?;
        }
        (ReportCell::Text(text), Some(format)) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        (ReportCell::Text(text), None) => {
            worksheet.write_string(row, col, text)?;
        }
        (ReportCell::Money(amount), _) => {
            let value = amount.to_f64().unwrap_or_default();
            worksheet.write_number_with_format(row, col, value, money_format)?;
        }
        (ReportCell::Blank, _) => {}
    }
    Ok(())
}

impl SpreadsheetCodec for XlsxCodec {
    fn read_header_row(&self, bytes: &[u8]) -> CodecResult<Vec<String>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(CodecError::EmptyWorkbook)??;

        Ok(range
            .rows()
            .next()
            .map(|row| row.iter().map(header_text).collect())
            .unwrap_or_default())
    }

    fn write_report(&self, report: &ExportReport) -> CodecResult<Vec<u8>> {
        let formats = Formats::new();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(report.sheet_name)?;

        for (col, column) in report.columns.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, column.title, &formats.header)?;
            worksheet.set_column_width(col, column.width)?;
        }

        for (idx, cells) in report.rows.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, cell) in cells.iter().enumerate() {
                write_cell(worksheet, row, col as u16, cell, None, &formats.money)?;
            }
        }

        if let Some(totals) = &report.totals {
            let row = (report.rows.len() + 1) as u32;
            for (col, cell) in totals.iter().enumerate() {
                write_cell(
                    worksheet,
                    row,
                    col as u16,
                    cell,
                    Some(&formats.totals_label),
                    &formats.totals_money,
                )?;
            }
        }

        if report.frozen_rows > 0 {
            worksheet.set_freeze_panes(report.frozen_rows, 0)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use calamine::Xlsx;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::customer::CustomerRecord;
    use crate::domain::money::Money;
    use crate::domain::types::CustomerId;
    use crate::spreadsheet::headers::{REQUIRED_HEADERS, validate_headers};

    fn workbook_with_header(cells: &[&str]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, cell) in cells.iter().enumerate() {
            worksheet.write_string(0, col as u16, *cell).unwrap();
        }
        worksheet.write_string(1, 0, "9800011122").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn sheet_rows(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn reads_trimmed_header_row() {
        let bytes = workbook_with_header(&[" Mobile ", "Fore Closure", "payment url"]);
        let header = XlsxCodec::new().read_header_row(&bytes).unwrap();
        assert_eq!(header, vec!["Mobile", "Fore Closure", "payment url"]);
        assert_eq!(validate_headers(&header).len(), REQUIRED_HEADERS.len() - 3);
    }

    #[test]
    fn garbage_bytes_are_a_read_error() {
        let err = XlsxCodec::new().read_header_row(b"not a workbook").unwrap_err();
        assert!(matches!(err, CodecError::Read(_)));
    }

    #[test]
    fn empty_report_writes_header_only() {
        let records: Vec<CustomerRecord> = Vec::new();
        let report = ExportReport::from_records(&records);
        let rows = sheet_rows(XlsxCodec::new().write_report(&report).unwrap());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Data::String("Sr. No.".into()));
        assert_eq!(rows[0].len(), 11);
    }

    #[test]
    fn writes_rows_and_totals() {
        let mut first = CustomerRecord::new(CustomerId::new("a").unwrap(), "Asha", "98");
        first.foreclosure = Money::new(Decimal::new(100050, 2));
        let mut second = CustomerRecord::new(CustomerId::new("b").unwrap(), "Ravi", "97");
        second.foreclosure = Money::new(Decimal::from(200));

        let report = ExportReport::from_records([&first, &second]);
        let rows = sheet_rows(XlsxCodec::new().write_report(&report).unwrap());

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1][1], Data::String("Asha".into()));
        assert_eq!(rows[3][0], Data::String("Total".into()));
        assert_eq!(rows[3][3], Data::Float(1200.5));
    }
}
