//! Deterministic rules mapping a transaction's type, narration and reference
//! table to a ledger `Category`.
//!
//! Rules are evaluated top-down and the first match wins. Disbursement is
//! checked before charges so "Loan disbursement incl. processing fee" stays a
//! disbursement.

use branchbook_core::{Category, NormalizedTransaction};
use branchbook_ingest::RawTransaction;

/// Lower-cased text fields a rule can look at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleInput {
    pub kind: String,
    pub narration: String,
    pub reference: String,
}

impl RuleInput {
    pub fn new(kind: &str, narration: &str, reference: &str) -> Self {
        Self {
            kind: kind.to_lowercase(),
            narration: narration.to_lowercase(),
            reference: reference.to_lowercase(),
        }
    }

    fn any(&self, needle: &str) -> bool {
        self.kind.contains(needle) || self.narration.contains(needle) || self.reference.contains(needle)
    }
}

/// One row of the decision table
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&RuleInput) -> bool,
    pub category: Category,
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "disbursement",
        matches: |t| t.any("disburs"),
        category: Category::LoanDisbursed,
    },
    Rule {
        name: "charge",
        matches: |t| {
            t.any("charge")
                || t.narration.contains("processing fee")
                || t.narration.contains("insurance")
        },
        category: Category::ChargeCollected,
    },
    Rule {
        name: "installment",
        matches: |t| t.any("install") || t.any("emi") || t.any("repay"),
        category: Category::InstallmentCollection,
    },
];

/// Classify against an explicit rule table; `Other` when nothing matches
pub fn classify_with(rules: &[Rule], input: &RuleInput) -> Category {
    rules
        .iter()
        .find(|rule| (rule.matches)(input))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}

/// Classify a normalized transaction using its source record's fields.
///
/// Falls back to the normalized remark when the raw record carries no narration.
pub fn classify(txn: &NormalizedTransaction, raw: &RawTransaction) -> Category {
    let narration = raw.narration();
    let narration = if narration.is_empty() { txn.remark.as_str() } else { narration.as_str() };
    classify_with(RULES, &RuleInput::new(&raw.kind(), narration, &raw.reference()))
}
