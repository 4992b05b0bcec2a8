use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TRANSACTION_DATE_KEYS: &[&str] = &["transaction_date", "transactionDate", "txn_date"];
pub const DATE_KEYS: &[&str] = &["date"];
pub const CREATED_KEYS: &[&str] = &["created_at", "createdAt", "creation_date"];
pub const CREDIT_KEYS: &[&str] = &["credit", "cr", "credit_amount"];
pub const DEBIT_KEYS: &[&str] = &["debit", "dr", "debit_amount"];
pub const NARRATION_KEYS: &[&str] = &["narration", "remark", "remarks", "description", "particulars"];
pub const TYPE_KEYS: &[&str] = &["type", "transaction_type", "transactionType", "txn_type"];
pub const REFERENCE_KEYS: &[&str] = &["reference_table", "referenceTable", "ref_table", "reference"];

/// A transaction record as delivered by the API or a file export.
///
/// Field names differ between the loan ledger, expense and other logs, so the
/// record is kept as an opaque field map and read through candidate key lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTransaction(pub Map<String, Value>);

impl RawTransaction {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// First non-empty value among `keys`, rendered as text
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// First present value among `keys`, as stored
    pub fn first_value(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .find_map(|key| self.0.get(*key).filter(|v| !v.is_null()))
    }

    pub fn narration(&self) -> String {
        self.first_text(NARRATION_KEYS).unwrap_or_default()
    }

    pub fn kind(&self) -> String {
        self.first_text(TYPE_KEYS).unwrap_or_default()
    }

    pub fn reference(&self) -> String {
        self.first_text(REFERENCE_KEYS).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for RawTransaction {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
