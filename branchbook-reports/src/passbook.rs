//! "Passbook (Clustered)" sheet.
//!
//! Columns: Date | Category | Particulars | Credit | Debit | Balance.
//! The balance column is a chain of formulas seeded by an opening-balance row,
//! so editing any credit/debit cell keeps the ledger consistent on recalculation.

use rust_decimal::Decimal;

use crate::layout::{Cell, ReportSheet, RowCursor, RowStyle, cell_ref};
use crate::pipeline::BranchReport;

pub const SHEET_NAME: &str = "Passbook (Clustered)";

pub const COL_DATE: u16 = 0;
pub const COL_CATEGORY: u16 = 1;
pub const COL_PARTICULARS: u16 = 2;
pub const COL_CREDIT: u16 = 3;
pub const COL_DEBIT: u16 = 4;
pub const COL_BALANCE: u16 = 5;

const HEADERS: [&str; 6] = ["Date", "Category", "Particulars", "Credit", "Debit", "Balance"];

pub fn build_sheet(report: &BranchReport) -> ReportSheet {
    let mut cursor = RowCursor::new(ReportSheet::new(
        SHEET_NAME,
        vec![12.0, 24.0, 36.0, 14.0, 14.0, 16.0],
    ));

    cursor.push(
        RowStyle::Title,
        vec![Cell::text(format!(
            "{} Passbook (Clustered)",
            report.config.branch_label()
        ))],
    );
    for (label, value) in meta_rows(report) {
        cursor.push(RowStyle::Meta, vec![Cell::text(label), Cell::text(value)]);
    }
    cursor.skip();
    cursor.push(RowStyle::Header, HEADERS.iter().map(|h| Cell::text(*h)).collect());

    let opening = report.opening.amount();
    let first_date = report
        .config
        .date_range
        .map(|r| r.from)
        .or_else(|| report.clusters.first().map(|b| b.date));
    let opening_row = cursor.push(
        RowStyle::Data,
        vec![
            first_date
                .map(|d| Cell::text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Cell::Blank),
            Cell::Blank,
            Cell::text("Opening Balance"),
            Cell::Blank,
            Cell::Blank,
            Cell::Amount(opening),
        ],
    );

    let mut prev_row = opening_row;
    let mut balance = opening;
    let mut first_data: Option<u32> = None;

    for bucket in &report.clusters {
        let row = cursor.peek();
        balance = balance + bucket.credit - bucket.debit;
        let expr = format!(
            "={}+{}-{}",
            cell_ref(prev_row, COL_BALANCE),
            cell_ref(row, COL_CREDIT),
            cell_ref(row, COL_DEBIT)
        );
        cursor.push(
            RowStyle::Data,
            vec![
                Cell::text(bucket.date.format("%Y-%m-%d").to_string()),
                Cell::text(bucket.category.label()),
                Cell::text(bucket.particulars()),
                Cell::Amount(bucket.credit),
                Cell::Amount(bucket.debit),
                Cell::formula(expr, balance),
            ],
        );
        first_data.get_or_insert(row);
        prev_row = row;
    }

    let (credit_total, debit_total) = report
        .clusters
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(c, d), b| (c + b.credit, d + b.debit));

    let sum = |col: u16, cached: Decimal| match first_data {
        Some(first) => Cell::formula(
            format!("=SUM({}:{})", cell_ref(first, col), cell_ref(prev_row, col)),
            cached,
        ),
        None => Cell::Amount(Decimal::ZERO),
    };

    cursor.push(
        RowStyle::Total,
        vec![
            Cell::Blank,
            Cell::Blank,
            Cell::text("Total / Closing Balance"),
            sum(COL_CREDIT, credit_total),
            sum(COL_DEBIT, debit_total),
            Cell::formula(format!("={}", cell_ref(prev_row, COL_BALANCE)), balance),
        ],
    );

    cursor.finish()
}

pub(crate) fn meta_rows(report: &BranchReport) -> Vec<(String, String)> {
    let mut rows = vec![("Branch".to_string(), report.config.branch_label().to_string())];
    if let Some(range) = report.config.date_range {
        rows.push((
            "Period".to_string(),
            format!("{} to {}", range.from.format("%Y-%m-%d"), range.to.format("%Y-%m-%d")),
        ));
    }
    rows.push(("Week Start".to_string(), report.config.week_start.code().to_string()));
    rows.push((
        "Opening Basis".to_string(),
        format!("{:.2} ({})", report.opening.amount().round_dp(2), report.opening.describe()),
    ));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ReportPipeline;
    use branchbook_core::{Category, ReportConfig};
    use branchbook_ingest::RawTransaction;
    use serde_json::json;

    fn report(opening: i64, values: Vec<serde_json::Value>) -> BranchReport {
        let raws: Vec<RawTransaction> = values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect();
        let cfg = ReportConfig {
            opening_balance: Some(Decimal::from(opening)),
            branch: Some("Kalyan".to_string()),
            ..Default::default()
        };
        ReportPipeline::run(&raws, &cfg)
    }

    fn row_with_text(sheet: &ReportSheet, text: &str) -> u32 {
        sheet
            .rows
            .iter()
            .find(|r| r.cells.iter().any(|c| *c == Cell::text(text)))
            .map(|r| r.index)
            .unwrap()
    }

    #[test]
    fn test_balance_chain_formulas() {
        let r = report(
            1000,
            vec![
                json!({ "date": "2024-03-01", "credit": 300, "narration": "EMI" }),
                json!({ "date": "2024-03-01", "debit": 5000, "narration": "Loan disbursement" }),
                json!({ "date": "2024-03-02", "credit": 40, "narration": "processing fee" }),
            ],
        );
        let sheet = build_sheet(&r);
        assert_eq!(sheet.name, SHEET_NAME);

        let opening = row_with_text(&sheet, "Opening Balance");
        assert_eq!(sheet.cell(opening, COL_BALANCE), Some(&Cell::Amount(Decimal::from(1000))));

        // Disbursement sorts before installment on the same day
        let first = opening + 1;
        assert_eq!(
            sheet.cell(first, COL_CATEGORY),
            Some(&Cell::text(Category::LoanDisbursed.label()))
        );
        assert_eq!(
            sheet.cell(first, COL_PARTICULARS),
            Some(&Cell::text("Loan Disbursed (1 txns)"))
        );
        let expected = format!(
            "=F{}+D{}-E{}",
            opening + 1,
            first + 1,
            first + 1
        );
        assert_eq!(
            sheet.cell(first, COL_BALANCE),
            Some(&Cell::formula(expected, Decimal::from(-4000)))
        );

        let total = row_with_text(&sheet, "Total / Closing Balance");
        assert_eq!(total, first + 3);
        assert_eq!(
            sheet.cell(total, COL_CREDIT),
            Some(&Cell::formula(
                format!("=SUM(D{}:D{})", first + 1, first + 3),
                Decimal::from(340)
            ))
        );
        assert_eq!(
            sheet.cell(total, COL_BALANCE),
            Some(&Cell::formula(format!("=F{}", first + 3), Decimal::from(-3660)))
        );
    }

    #[test]
    fn test_dates_are_iso_in_passbook() {
        let r = report(0, vec![json!({ "date": "07/03/2024", "credit": 1 })]);
        let sheet = build_sheet(&r);
        assert!(
            sheet
                .rows
                .iter()
                .any(|row| row.cells.first() == Some(&Cell::text("2024-03-07")))
        );
    }

    #[test]
    fn test_empty_report_still_has_opening_and_total() {
        let r = report(75, vec![]);
        let sheet = build_sheet(&r);
        let opening = row_with_text(&sheet, "Opening Balance");
        let total = row_with_text(&sheet, "Total / Closing Balance");
        assert_eq!(total, opening + 1);
        assert_eq!(
            sheet.cell(total, COL_BALANCE),
            Some(&Cell::formula(format!("=F{}", opening + 1), Decimal::from(75)))
        );
        assert_eq!(sheet.cell(total, COL_CREDIT), Some(&Cell::Amount(Decimal::ZERO)));
    }

    #[test]
    fn test_meta_rows_flag_assumed_opening() {
        let raws: Vec<RawTransaction> = vec![];
        let r = ReportPipeline::run(&raws, &ReportConfig::default());
        let meta = meta_rows(&r);
        assert!(meta.iter().any(|(k, v)| k == "Opening Basis" && v.contains("assumed zero")));
    }
}
