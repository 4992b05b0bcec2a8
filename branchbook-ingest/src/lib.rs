//! branchbook-ingest: raw transaction records, normalization, and record sources (JSON/CSV/API).

pub mod normalize;
pub mod sources;
pub mod types;

pub use normalize::{normalize, normalize_all};
pub use types::RawTransaction;
