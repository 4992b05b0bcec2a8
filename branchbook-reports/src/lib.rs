//! branchbook-reports: transaction classifier, report pipeline, and
//! passbook / cash-in-hand spreadsheet export

pub mod artifact;
pub mod cash_in_hand;
pub mod category_rules;
pub mod csv_export;
pub mod error;
pub mod format;
pub mod layout;
pub mod passbook;
pub mod pipeline;
pub mod xlsx;

pub use artifact::{ReportArtifact, XLSX_MIME, export_workbook, write_artifact};
pub use category_rules::classify;
pub use error::ExportError;
pub use pipeline::{BranchReport, ClassifiedTransaction, ReportPipeline};
