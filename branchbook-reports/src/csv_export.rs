//! Plain CSV renditions: a sheet's computed values, or the classified
//! transaction list with its parsed remark fields.

use branchbook_core::{NumberLocale, parse_remark};
use csv::WriterBuilder;

use crate::error::{ExportError, Result};
use crate::format::format_amount;
use crate::layout::ReportSheet;
use crate::pipeline::BranchReport;

/// Cached cell values row by row; blank spacer rows are kept
pub fn write_sheet_csv(sheet: &ReportSheet) -> Result<Vec<u8>> {
    let width = sheet.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    let mut next = 0;
    for row in &sheet.rows {
        while next < row.index {
            wtr.write_record(std::iter::repeat_n("", width))?;
            next += 1;
        }
        let mut values: Vec<String> = row.cells.iter().map(|c| c.plain()).collect();
        values.resize(width, String::new());
        wtr.write_record(&values)?;
        next = row.index + 1;
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// One line per classified transaction
pub fn write_transactions_csv(report: &BranchReport, locale: NumberLocale) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record([
        "date",
        "category",
        "loan_account_no",
        "member_name",
        "group_name",
        "description",
        "credit",
        "debit",
    ])?;

    for item in &report.transactions {
        let remark = parse_remark(&item.txn.remark);
        wtr.write_record([
            item.txn.date.format("%Y-%m-%d").to_string(),
            item.category.label().to_string(),
            remark.loan_account_no,
            remark.member_name,
            remark.group_name,
            remark.description,
            format_amount(item.txn.credit, locale),
            format_amount(item.txn.debit, locale),
        ])?;
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
