//! Where raw transaction records come from.

pub mod csv;
pub mod http;
pub mod json;

use std::path::Path;

use anyhow::Result;

use crate::types::RawTransaction;

/// Read raw records from a file, picking the reader by extension
pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<RawTransaction>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        csv::read_csv(path)
    } else {
        json::read_json(path)
    }
}
