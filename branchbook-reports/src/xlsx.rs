//! Render report sheets into an .xlsx workbook held in memory.

use branchbook_core::NumberLocale;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatBorder, Formula, Workbook, Worksheet};

use crate::error::Result;
use crate::format::excel_amount_format;
use crate::layout::{Cell, ReportSheet, RowStyle};

const WEEKEND_FILL: u32 = 0xFCE4D6;
const HEADER_FILL: u32 = 0xD9E1F2;
const TOTAL_FILL: u32 = 0xF2F2F2;

/// Cell formats for one row style
struct StyleFormats {
    text: Format,
    amount: Format,
    negative_amount: Format,
}

impl StyleFormats {
    fn for_amount(&self, value: Decimal) -> &Format {
        if value.is_sign_negative() && !value.is_zero() {
            &self.negative_amount
        } else {
            &self.amount
        }
    }
}

struct Palette {
    locale: NumberLocale,
}

impl Palette {
    fn formats(&self, style: RowStyle) -> StyleFormats {
        let base = Format::new();
        let text = match style {
            RowStyle::Title => base.set_bold().set_font_size(14),
            RowStyle::Meta => base.set_italic(),
            RowStyle::Section => base.set_bold().set_font_size(12),
            RowStyle::Header => base
                .set_bold()
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_border_bottom(FormatBorder::Thin),
            RowStyle::Data => base,
            RowStyle::Weekend => base.set_background_color(Color::RGB(WEEKEND_FILL)),
            RowStyle::Total => base
                .set_bold()
                .set_background_color(Color::RGB(TOTAL_FILL))
                .set_border_top(FormatBorder::Thin),
        };
        let amount = text.clone().set_num_format(excel_amount_format(self.locale, false));
        let negative_amount = text.clone().set_num_format(excel_amount_format(self.locale, true));
        StyleFormats {
            text,
            amount,
            negative_amount,
        }
    }
}

/// Serialize sheets into workbook bytes, one worksheet per sheet, in order
pub fn render_workbook(sheets: &[ReportSheet], locale: NumberLocale) -> Result<Vec<u8>> {
    let palette = Palette { locale };
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &palette)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(sheets = sheets.len(), bytes = bytes.len(), "rendered workbook");
    Ok(bytes)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &ReportSheet, palette: &Palette) -> Result<()> {
    worksheet.set_name(&sheet.name)?;
    for (col, width) in sheet.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for row in &sheet.rows {
        let formats = palette.formats(row.style);
        for (col, cell) in row.cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Blank => {
                    if matches!(row.style, RowStyle::Weekend | RowStyle::Total | RowStyle::Header) {
                        worksheet.write_blank(row.index, col, &formats.text)?;
                    }
                }
                Cell::Text(s) => {
                    worksheet.write_string_with_format(row.index, col, s, &formats.text)?;
                }
                Cell::Amount(d) => {
                    worksheet.write_number_with_format(row.index, col, to_f64(*d), formats.for_amount(*d))?;
                }
                Cell::Formula { expr, cached } => {
                    let formula = Formula::new(expr).set_result(cached.normalize().to_string());
                    worksheet.write_formula_with_format(
                        row.index,
                        col,
                        formula,
                        formats.for_amount(*cached),
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Full precision; the number format rounds for display only
fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Cell, RowCursor, RowStyle};

    #[test]
    fn test_render_produces_zip_container() {
        let mut cursor = RowCursor::new(ReportSheet::new("Ledger", vec![10.0, 12.0]));
        cursor.push(RowStyle::Header, vec![Cell::text("A"), Cell::text("B")]);
        let row = cursor.push(RowStyle::Data, vec![Cell::text("x"), Cell::Amount(Decimal::from(5))]);
        cursor.push(
            RowStyle::Total,
            vec![Cell::Blank, Cell::formula(format!("=B{}", row + 1), Decimal::from(5))],
        );
        let bytes = render_workbook(&[cursor.finish()], NumberLocale::Standard).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_sub_cent_amounts_keep_precision() {
        use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
        use std::io::Cursor;

        let half_paisa = Decimal::new(5, 3);
        let mut cursor = RowCursor::new(ReportSheet::new("Ledger", vec![]));
        for _ in 0..3 {
            cursor.push(RowStyle::Data, vec![Cell::Amount(half_paisa)]);
        }
        cursor.push(
            RowStyle::Total,
            vec![Cell::formula("=SUM(A1:A3)", half_paisa * Decimal::from(3))],
        );
        let bytes = render_workbook(&[cursor.finish()], NumberLocale::Indian).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Ledger").unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::Float(0.005)));
        assert_eq!(range.get_value((2, 0)), Some(&Data::Float(0.005)));
        assert_eq!(range.get_value((3, 0)), Some(&Data::Float(0.015)));
    }

    #[test]
    fn test_negative_cells_use_mirrored_format() {
        let palette = Palette {
            locale: NumberLocale::Indian,
        };
        let formats = palette.formats(RowStyle::Data);
        assert_eq!(
            formats.for_amount(Decimal::from(-250000)),
            &formats.negative_amount
        );
        assert_eq!(formats.for_amount(Decimal::ZERO), &formats.amount);
        assert_eq!(formats.for_amount(Decimal::from(250000)), &formats.amount);
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        let sheet = ReportSheet::new("bad/name", vec![]);
        let err = render_workbook(&[sheet], NumberLocale::Standard).unwrap_err();
        assert!(err.to_string().starts_with("report generation failed"));
    }
}
