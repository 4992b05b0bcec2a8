//! Locale-aware rendering of currency amounts.

use branchbook_core::NumberLocale;
use rust_decimal::Decimal;

/// Excel number format for currency cells.
///
/// Excel allows two conditional sections per format, so the Indian lakh and
/// crore groupings need one format for non-negative values and a mirrored one
/// for negatives; the sign is picked from the value the cell holds.
pub fn excel_amount_format(locale: NumberLocale, negative: bool) -> &'static str {
    match (locale, negative) {
        (NumberLocale::Standard, _) => "#,##0.00",
        (NumberLocale::Indian, false) => {
            "[>=10000000]##\\,##\\,##\\,##0.00;[>=100000]##\\,##\\,##0.00;##,##0.00"
        }
        (NumberLocale::Indian, true) => {
            "[<=-10000000]-##\\,##\\,##\\,##0.00;[<=-100000]-##\\,##\\,##0.00;##,##0.00"
        }
    }
}

/// Fixed two decimals with locale digit grouping, e.g. `12,34,567.89`
pub fn format_amount(amount: Decimal, locale: NumberLocale) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = match locale {
        NumberLocale::Standard => group(int_part, 3, 3),
        NumberLocale::Indian => group(int_part, 3, 2),
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Group digits: the last `first` digits, then blocks of `rest`
fn group(digits: &str, first: usize, rest: usize) -> String {
    if digits.len() <= first {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - first);
    let mut blocks = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(rest);
        blocks.push(&head[start..end]);
        end = start;
    }
    blocks.reverse();
    format!("{},{}", blocks.join(","), tail)
}
