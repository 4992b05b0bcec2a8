//! "Cash In Hand" sheet: daily, weekly and monthly tables stacked vertically.
//!
//! Each table: Period | Opening | Cash In | Cash Out | Closing. Row openings
//! after the first point at the previous closing; footers reference the first
//! opening and last closing instead of restating them.

use branchbook_core::{Granularity, PeriodRow, balance::totals};
use rust_decimal::Decimal;

use crate::layout::{Cell, ReportSheet, RowCursor, RowStyle, cell_ref};
use crate::passbook::meta_rows;
use crate::pipeline::BranchReport;

pub const SHEET_NAME: &str = "Cash In Hand";

pub const COL_PERIOD: u16 = 0;
pub const COL_OPENING: u16 = 1;
pub const COL_CASH_IN: u16 = 2;
pub const COL_CASH_OUT: u16 = 3;
pub const COL_CLOSING: u16 = 4;

const HEADERS: [&str; 5] = ["Period", "Opening", "Cash In", "Cash Out", "Closing"];

pub fn build_sheet(report: &BranchReport) -> ReportSheet {
    let mut cursor = RowCursor::new(ReportSheet::new(
        SHEET_NAME,
        vec![28.0, 16.0, 16.0, 16.0, 16.0],
    ));

    cursor.push(
        RowStyle::Title,
        vec![Cell::text(format!("{} Cash In Hand", report.config.branch_label()))],
    );
    for (label, value) in meta_rows(report) {
        cursor.push(RowStyle::Meta, vec![Cell::text(label), Cell::text(value)]);
    }

    let tables = [
        (Granularity::Daily, &report.daily),
        (Granularity::Weekly, &report.weekly),
        (Granularity::Monthly, &report.monthly),
    ];
    for (granularity, rows) in tables {
        cursor.skip();
        write_table(&mut cursor, granularity, rows, report.opening.amount());
    }

    cursor.finish()
}

fn write_table(cursor: &mut RowCursor, granularity: Granularity, rows: &[PeriodRow], opening: Decimal) {
    cursor.push(RowStyle::Section, vec![Cell::text(granularity.title())]);
    cursor.push(RowStyle::Header, HEADERS.iter().map(|h| Cell::text(*h)).collect());

    let mut first: Option<u32> = None;
    let mut last: Option<u32> = None;

    for period in rows {
        let row = cursor.peek();
        let opening_cell = match last {
            Some(prev) => Cell::formula(format!("={}", cell_ref(prev, COL_CLOSING)), period.opening),
            None => Cell::Amount(period.opening),
        };
        let closing_expr = format!(
            "={}+{}-{}",
            cell_ref(row, COL_OPENING),
            cell_ref(row, COL_CASH_IN),
            cell_ref(row, COL_CASH_OUT)
        );
        let style = if granularity == Granularity::Daily && period.is_weekend {
            RowStyle::Weekend
        } else {
            RowStyle::Data
        };
        cursor.push(
            style,
            vec![
                Cell::text(period.key.display()),
                opening_cell,
                Cell::Amount(period.cash_in),
                Cell::Amount(period.cash_out),
                Cell::formula(closing_expr, period.closing),
            ],
        );
        first.get_or_insert(row);
        last = Some(row);
    }

    let footer = match (first, last) {
        (Some(first), Some(last)) => {
            let (cash_in, cash_out) = totals(rows);
            let sum = |col: u16, cached: Decimal| {
                Cell::formula(
                    format!("=SUM({}:{})", cell_ref(first, col), cell_ref(last, col)),
                    cached,
                )
            };
            vec![
                Cell::text("Total"),
                Cell::formula(format!("={}", cell_ref(first, COL_OPENING)), rows[0].opening),
                sum(COL_CASH_IN, cash_in),
                sum(COL_CASH_OUT, cash_out),
                Cell::formula(
                    format!("={}", cell_ref(last, COL_CLOSING)),
                    rows[rows.len() - 1].closing,
                ),
            ]
        }
        _ => vec![
            Cell::text("Total"),
            Cell::Amount(opening),
            Cell::Amount(Decimal::ZERO),
            Cell::Amount(Decimal::ZERO),
            Cell::Amount(opening),
        ],
    };
    cursor.push(RowStyle::Total, footer);
}
