//! Ledger record types shared by every stage of the reconciliation pipeline

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A branch cash transaction after normalization.
///
/// `date` is always a real calendar date; records without one never get this far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedTransaction {
    /// Effective date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Money into the branch, never negative
    pub credit: Decimal,
    /// Money out of the branch, never negative
    pub debit: Decimal,
    /// Pipe-delimited narration as produced upstream
    pub remark: String,
}

impl NormalizedTransaction {
    pub fn new(date: NaiveDate, credit: Decimal, debit: Decimal, remark: impl Into<String>) -> Self {
        Self {
            date,
            credit: credit.abs(),
            debit: debit.abs(),
            remark: remark.into(),
        }
    }

    /// Credit minus debit
    pub fn net(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// Purpose of a transaction, derived by the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "loan-disbursed")]
    LoanDisbursed,
    #[serde(rename = "charge-collected")]
    ChargeCollected,
    #[serde(rename = "installment-collection")]
    InstallmentCollection,
    #[serde(rename = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::LoanDisbursed,
        Category::ChargeCollected,
        Category::InstallmentCollection,
        Category::Other,
    ];

    /// Ordering weight within a single day of the clustered passbook
    pub fn priority(&self) -> u8 {
        match self {
            Category::LoanDisbursed => 1,
            Category::ChargeCollected => 2,
            Category::InstallmentCollection => 3,
            Category::Other => 99,
        }
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::LoanDisbursed => "Loan Disbursed",
            Category::ChargeCollected => "Charges Collected",
            Category::InstallmentCollection => "Installment Collection",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Same-day, same-category aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterBucket {
    pub date: NaiveDate,
    pub category: Category,
    /// Number of member transactions, at least 1
    pub count: usize,
    pub credit: Decimal,
    pub debit: Decimal,
}

impl ClusterBucket {
    /// Particulars text shown in the passbook, e.g. "Loan Disbursed (3 txns)"
    pub fn particulars(&self) -> String {
        format!("{} ({} txns)", self.category.label(), self.count)
    }
}
