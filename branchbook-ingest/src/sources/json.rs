//! JSON exports: either a bare array or the API's `{ "data": [...] }` envelope.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::types::RawTransaction;

pub fn read_json(path: impl AsRef<Path>) -> Result<Vec<RawTransaction>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_json(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_json(text: &str) -> Result<Vec<RawTransaction>> {
    let value: Value = serde_json::from_str(text)?;
    records_from_value(value)
}

/// Accept an array of objects, or an object wrapping one under `data`/`transactions`.
/// Non-object array items are skipped.
pub fn records_from_value(value: Value) -> Result<Vec<RawTransaction>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("transactions")) {
            Some(Value::Array(items)) => items,
            _ => bail!("expected an array of transactions or a data envelope"),
        },
        _ => bail!("expected an array of transactions or a data envelope"),
    };

    let total = items.len();
    let records: Vec<RawTransaction> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(RawTransaction::from(map)),
            _ => None,
        })
        .collect();

    if records.len() < total {
        tracing::debug!(skipped = total - records.len(), "ignored non-object transaction entries");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_json(r#"[{"date":"2024-03-01","credit":10}, 5, {"date":"2024-03-02"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_data_envelope() {
        let records = parse_json(r#"{"status":"ok","data":[{"date":"2024-03-01"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_text(&["date"]).as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_reject_scalar_document() {
        assert!(parse_json("42").is_err());
        assert!(parse_json(r#"{"data": 1}"#).is_err());
    }
}
