//! CSV exports with a header row; every cell is kept as text.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::types::RawTransaction;

pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<RawTransaction>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv_from(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_csv_from(reader: impl Read) -> Result<Vec<RawTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let map: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
            .collect();
        if !map.is_empty() {
            out.push(RawTransaction::from(map));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_all;
    use rust_decimal::Decimal;
    use std::io::Write;

    #[test]
    fn test_read_csv_rows() {
        let text = "\
transaction_date,credit,debit,narration,type
2024-03-01,\"1,500.00\",0,LN-1||Asha|Lotus|EMI 1,installment
2024-03-02,,250,Office rent,expense
,,,,
";
        let records = read_csv_from(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind(), "installment");

        let txns = normalize_all(&records);
        assert_eq!(txns[0].credit, Decimal::from(1500));
        assert_eq!(txns[1].credit, Decimal::ZERO);
        assert_eq!(txns[1].debit, Decimal::from(250));
    }

    #[test]
    fn test_read_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,credit\n2024-03-01,10").unwrap();
        let records = read_csv(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }
}
