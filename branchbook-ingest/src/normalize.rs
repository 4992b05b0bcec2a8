//! Map heterogeneous raw records onto `NormalizedTransaction`.
//!
//! Lenient by construction: bad amounts become zero and undateable records
//! are dropped. Nothing here returns an error.

use std::str::FromStr;
use std::sync::LazyLock;

use branchbook_core::NormalizedTransaction;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::{
    CREATED_KEYS, CREDIT_KEYS, DATE_KEYS, DEBIT_KEYS, RawTransaction, TRANSACTION_DATE_KEYS,
};

/// Optional currency mark on either side of the figure
static CURRENCY_AFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:₹|rs\.?|inr|\$)?\s*(.*?)\s*(?:₹|rs\.?|inr|\$)?$").expect("static regex")
});

/// The whole remaining text must be one number
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?$").expect("static regex")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Normalize one record; `None` when no calendar date can be resolved
pub fn normalize(raw: &RawTransaction) -> Option<NormalizedTransaction> {
    let Some(date) = resolve_date(raw) else {
        tracing::debug!(record = ?raw.0.keys().collect::<Vec<_>>(), "dropping record without a usable date");
        return None;
    };

    Some(NormalizedTransaction::new(
        date,
        coerce_amount(raw.first_value(CREDIT_KEYS)),
        coerce_amount(raw.first_value(DEBIT_KEYS)),
        raw.narration(),
    ))
}

/// Normalize a batch, preserving order and skipping undateable records
pub fn normalize_all(raws: &[RawTransaction]) -> Vec<NormalizedTransaction> {
    let out: Vec<_> = raws.iter().filter_map(normalize).collect();
    if out.len() < raws.len() {
        tracing::debug!(dropped = raws.len() - out.len(), kept = out.len(), "normalized transactions");
    }
    out
}

/// Transaction date, then generic date, then creation date; first 10 characters
pub fn resolve_date(raw: &RawTransaction) -> Option<NaiveDate> {
    let text = raw
        .first_text(TRANSACTION_DATE_KEYS)
        .or_else(|| raw.first_text(DATE_KEYS))
        .or_else(|| raw.first_text(CREATED_KEYS))?;
    let head: String = text.chars().take(10).collect();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&head, fmt).ok())
}

/// Any JSON value to a non-negative decimal; unusable input is zero
pub fn coerce_amount(value: Option<&Value>) -> Decimal {
    let amount = match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => amount_text(s).and_then(|t| parse_decimal(&t)),
        _ => None,
    };
    amount.map(|d| d.abs()).unwrap_or(Decimal::ZERO)
}

/// Strip a currency mark and `,` separators; `None` unless a bare number remains
fn amount_text(s: &str) -> Option<String> {
    let inner = CURRENCY_AFFIX.captures(s.trim())?.get(1)?.as_str();
    let digits = inner.replace(',', "");
    NUMBER.is_match(&digits).then_some(digits)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawTransaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_date_priority_and_truncation() {
        let r = raw(json!({
            "transaction_date": "2024-03-05T00:00:00.000Z",
            "date": "2024-03-01",
            "created_at": "2024-02-01"
        }));
        assert_eq!(resolve_date(&r), NaiveDate::from_ymd_opt(2024, 3, 5));

        let r = raw(json!({ "date": "", "created_at": "2024-02-01 18:30:00" }));
        assert_eq!(resolve_date(&r), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_day_first_dates() {
        let r = raw(json!({ "date": "07/03/2024" }));
        assert_eq!(resolve_date(&r), NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[test]
    fn test_undateable_records_are_dropped() {
        let raws = vec![
            raw(json!({ "credit": 10, "narration": "note" })),
            raw(json!({ "date": "not a date", "credit": 10 })),
            raw(json!({ "date": "2024-02-30", "credit": 10 })),
            raw(json!({ "date": "2024-03-01", "credit": 10 })),
        ];
        let out = normalize_all(&raws);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].credit, Decimal::from(10));
    }

    #[test]
    fn test_amount_coercion_never_fails() {
        assert_eq!(coerce_amount(Some(&json!(12.5))), Decimal::new(125, 1));
        assert_eq!(coerce_amount(Some(&json!("₹1,200.50"))), Decimal::new(120050, 2));
        assert_eq!(coerce_amount(Some(&json!("abc"))), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!("Rs. 100"))), Decimal::from(100));
        assert_eq!(coerce_amount(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!([1, 2]))), Decimal::ZERO);
        assert_eq!(coerce_amount(None), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!(-40))), Decimal::from(40));
        assert_eq!(coerce_amount(Some(&json!("-40"))), Decimal::from(40));
        assert_eq!(coerce_amount(Some(&json!(" 75 INR "))), Decimal::from(75));
    }

    #[test]
    fn test_text_with_stray_digits_is_zero() {
        for s in ["see note 3", "N/A 2024", "abc500", "12abc", "2024-03-01", "1.2.3", "-"] {
            assert_eq!(coerce_amount(Some(&json!(s))), Decimal::ZERO, "{s}");
        }
    }

    #[test]
    fn test_scientific_text_matches_scientific_number() {
        assert_eq!(coerce_amount(Some(&json!("1.5e3"))), Decimal::from(1500));
        assert_eq!(
            coerce_amount(Some(&json!("1.5e3"))),
            coerce_amount(Some(&json!(1.5e3)))
        );
    }

    #[test]
    fn test_normalize_preserves_order_and_remark() {
        let raws = vec![
            raw(json!({ "date": "2024-03-02", "debit": "50", "remark": "b" })),
            raw(json!({ "date": "2024-03-01", "cr": 75, "narration": "a" })),
        ];
        let out = normalize_all(&raws);
        assert_eq!(out[0].remark, "b");
        assert_eq!(out[0].debit, Decimal::from(50));
        assert_eq!(out[1].remark, "a");
        assert_eq!(out[1].credit, Decimal::from(75));
    }
}
