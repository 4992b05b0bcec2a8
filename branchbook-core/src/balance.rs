//! Running balance over ordered period flows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cluster::PeriodFlow;
use crate::period::PeriodKey;

/// One row of a daily/weekly/monthly balance summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodRow {
    pub key: PeriodKey,
    pub opening: Decimal,
    pub cash_in: Decimal,
    pub cash_out: Decimal,
    pub closing: Decimal,
    /// Display highlighting only
    pub is_weekend: bool,
}

/// Where the report's starting balance came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", content = "amount", rename_all = "snake_case")]
pub enum OpeningBalance {
    Supplied(Decimal),
    /// Nothing was supplied; zero is used so the report can still render
    AssumedZero,
}

impl OpeningBalance {
    /// Tag a possibly-missing balance. A supplied zero stays `Supplied`.
    pub fn resolve(value: Option<Decimal>) -> Self {
        match value {
            Some(amount) => OpeningBalance::Supplied(amount),
            None => {
                tracing::warn!(
                    opening_balance = "assumed zero",
                    "no opening balance supplied, assuming zero"
                );
                OpeningBalance::AssumedZero
            }
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            OpeningBalance::Supplied(amount) => *amount,
            OpeningBalance::AssumedZero => Decimal::ZERO,
        }
    }

    pub fn is_assumed(&self) -> bool {
        matches!(self, OpeningBalance::AssumedZero)
    }

    /// Short description for report meta rows
    pub fn describe(&self) -> &'static str {
        match self {
            OpeningBalance::Supplied(_) => "supplied",
            OpeningBalance::AssumedZero => "assumed zero (not supplied)",
        }
    }
}

/// Left-fold `flows` into balance rows starting from `opening`.
///
/// Flows must already be in ascending key order; they are not re-sorted.
pub fn running_balance(flows: &[PeriodFlow], opening: Decimal) -> Vec<PeriodRow> {
    let mut balance = opening;
    flows
        .iter()
        .map(|flow| {
            let opening = balance;
            let closing = opening + flow.cash_in - flow.cash_out;
            balance = closing;
            PeriodRow {
                key: flow.key,
                opening,
                cash_in: flow.cash_in,
                cash_out: flow.cash_out,
                closing,
                is_weekend: flow.key.is_weekend(),
            }
        })
        .collect()
}

/// Index of the first row whose opening differs from the previous closing
pub fn continuity_break(rows: &[PeriodRow]) -> Option<usize> {
    rows.windows(2)
        .position(|w| w[1].opening != w[0].closing)
        .map(|i| i + 1)
}

/// Summed cash in and cash out across rows
pub fn totals(rows: &[PeriodRow]) -> (Decimal, Decimal) {
    rows.iter().fold((Decimal::ZERO, Decimal::ZERO), |(i, o), r| {
        (i + r.cash_in, o + r.cash_out)
    })
}
