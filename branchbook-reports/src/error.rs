//! Export failures. Everything upstream of serialization is total.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report generation failed: workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("report generation failed: CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("report generation failed: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
