//! Serializer-independent sheet model.
//!
//! Builders write rows through a [`RowCursor`], which hands out absolute row
//! numbers. Formulas that point back at earlier rows are built from those
//! numbers, never from recomputed offsets.

use rust_decimal::Decimal;
use serde::Serialize;

/// Column index (0-based) to spreadsheet letters: 0 → A, 27 → AB
pub fn column_letter(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// A1-style reference for a 0-based (row, col)
pub fn cell_ref(row: u32, col: u16) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Blank,
    Text(String),
    /// Currency amount, rendered with two decimals
    Amount(Decimal),
    /// Live formula with the value it evaluates to today
    Formula { expr: String, cached: Decimal },
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn formula(expr: impl Into<String>, cached: Decimal) -> Self {
        Cell::Formula {
            expr: expr.into(),
            cached,
        }
    }

    /// Value as a plain string (cached value for formulas)
    pub fn plain(&self) -> String {
        match self {
            Cell::Blank => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Amount(d) | Cell::Formula { cached: d, .. } => format!("{:.2}", d.round_dp(2)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStyle {
    Title,
    Meta,
    Section,
    Header,
    Data,
    /// Data row falling on a Saturday or Sunday
    Weekend,
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub index: u32,
    pub style: RowStyle,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSheet {
    pub name: String,
    pub column_widths: Vec<f64>,
    pub rows: Vec<SheetRow>,
}

impl ReportSheet {
    pub fn new(name: impl Into<String>, column_widths: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            column_widths,
            rows: Vec::new(),
        }
    }

    pub fn row(&self, index: u32) -> Option<&SheetRow> {
        self.rows.iter().find(|r| r.index == index)
    }

    pub fn cell(&self, index: u32, col: u16) -> Option<&Cell> {
        self.row(index)?.cells.get(col as usize)
    }

    /// Number of rows including blank spacer rows
    pub fn height(&self) -> u32 {
        self.rows.last().map(|r| r.index + 1).unwrap_or(0)
    }
}

/// Appends rows to a sheet and remembers where each one landed
#[derive(Debug)]
pub struct RowCursor {
    sheet: ReportSheet,
    next: u32,
}

impl RowCursor {
    pub fn new(sheet: ReportSheet) -> Self {
        Self { sheet, next: 0 }
    }

    /// Write a row and return its absolute index
    pub fn push(&mut self, style: RowStyle, cells: Vec<Cell>) -> u32 {
        let index = self.next;
        self.sheet.rows.push(SheetRow { index, style, cells });
        self.next += 1;
        index
    }

    /// Leave an empty row
    pub fn skip(&mut self) {
        self.next += 1;
    }

    /// Index the next `push` will use
    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn finish(self) -> ReportSheet {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(5), "F");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref(9, 3), "D10");
    }

    #[test]
    fn test_cursor_tracks_rows() {
        let mut cursor = RowCursor::new(ReportSheet::new("S", vec![]));
        let a = cursor.push(RowStyle::Title, vec![Cell::text("t")]);
        cursor.skip();
        let b = cursor.push(RowStyle::Data, vec![Cell::Amount(Decimal::new(1005, 1))]);
        assert_eq!((a, b), (0, 2));
        assert_eq!(cursor.peek(), 3);

        let sheet = cursor.finish();
        assert_eq!(sheet.height(), 3);
        assert!(sheet.row(1).is_none());
        assert_eq!(sheet.cell(2, 0).unwrap().plain(), "100.50");
    }
}
