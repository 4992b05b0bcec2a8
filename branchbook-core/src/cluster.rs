//! Grouping of transactions into category clusters and calendar periods.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Category, ClusterBucket, NormalizedTransaction};
use crate::period::{PeriodKey, WeekStart};

/// Cash moved during one period, before balances are applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodFlow {
    pub key: PeriodKey,
    pub cash_in: Decimal,
    pub cash_out: Decimal,
}

impl PeriodFlow {
    fn empty(key: PeriodKey) -> Self {
        Self {
            key,
            cash_in: Decimal::ZERO,
            cash_out: Decimal::ZERO,
        }
    }

    fn absorb(&mut self, cash_in: Decimal, cash_out: Decimal) {
        self.cash_in += cash_in;
        self.cash_out += cash_out;
    }
}

/// Group classified transactions by (date, category).
///
/// Buckets come back sorted by date, then by category priority.
pub fn cluster_by_category(items: &[(NormalizedTransaction, Category)]) -> Vec<ClusterBucket> {
    let mut groups: HashMap<(NaiveDate, Category), ClusterBucket> = HashMap::new();

    for (txn, category) in items {
        groups
            .entry((txn.date, *category))
            .and_modify(|b| {
                b.count += 1;
                b.credit += txn.credit;
                b.debit += txn.debit;
            })
            .or_insert_with(|| ClusterBucket {
                date: txn.date,
                category: *category,
                count: 1,
                credit: txn.credit,
                debit: txn.debit,
            });
    }

    let mut buckets: Vec<ClusterBucket> = groups.into_values().collect();
    buckets.sort_by_key(|b| (b.date, b.category.priority()));
    buckets
}

/// Per-day cash in/out, ascending by date
pub fn daily_flows(txns: &[NormalizedTransaction]) -> Vec<PeriodFlow> {
    let mut days: BTreeMap<NaiveDate, PeriodFlow> = BTreeMap::new();
    for txn in txns {
        days.entry(txn.date)
            .or_insert_with(|| PeriodFlow::empty(PeriodKey::Day(txn.date)))
            .absorb(txn.credit, txn.debit);
    }
    days.into_values().collect()
}

/// Roll daily flows into weeks anchored on `week_start`
pub fn weekly_flows(daily: &[PeriodFlow], week_start: WeekStart) -> Vec<PeriodFlow> {
    regroup(daily, |date| PeriodKey::Week(week_start.week_of(date)))
}

/// Roll daily flows into calendar months
pub fn monthly_flows(daily: &[PeriodFlow]) -> Vec<PeriodFlow> {
    regroup(daily, PeriodKey::month_of)
}

fn regroup(daily: &[PeriodFlow], key_of: impl Fn(NaiveDate) -> PeriodKey) -> Vec<PeriodFlow> {
    let mut out: BTreeMap<PeriodKey, PeriodFlow> = BTreeMap::new();
    for flow in daily {
        let PeriodKey::Day(date) = flow.key else {
            continue;
        };
        let key = key_of(date);
        out.entry(key)
            .or_insert_with(|| PeriodFlow::empty(key))
            .absorb(flow.cash_in, flow.cash_out);
    }
    out.into_values().collect()
}
