//! Report pipeline: raw records in, clustered and balanced report data out.

use branchbook_core::{
    Category, ClusterBucket, NormalizedTransaction, OpeningBalance, PeriodRow, ReportConfig,
    cluster_by_category, continuity_break, daily_flows, monthly_flows, running_balance,
    weekly_flows,
};
use branchbook_ingest::{RawTransaction, normalize};
use serde::Serialize;

use crate::category_rules::classify;

/// A normalized transaction with its derived category
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassifiedTransaction {
    pub txn: NormalizedTransaction,
    pub category: Category,
}

/// Everything the sheet builders need, computed once per request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BranchReport {
    pub config: ReportConfig,
    pub opening: OpeningBalance,
    pub transactions: Vec<ClassifiedTransaction>,
    pub clusters: Vec<ClusterBucket>,
    pub daily: Vec<PeriodRow>,
    pub weekly: Vec<PeriodRow>,
    pub monthly: Vec<PeriodRow>,
}

impl BranchReport {
    /// Closing balance of the whole report
    pub fn closing(&self) -> rust_decimal::Decimal {
        self.daily
            .last()
            .map(|r| r.closing)
            .unwrap_or_else(|| self.opening.amount())
    }
}

pub struct ReportPipeline;

impl ReportPipeline {
    /// Normalize, filter to the configured range, classify, cluster and balance
    pub fn run(raws: &[RawTransaction], config: &ReportConfig) -> BranchReport {
        let opening = OpeningBalance::resolve(config.opening_balance);

        let transactions: Vec<ClassifiedTransaction> = raws
            .iter()
            .filter_map(|raw| normalize(raw).map(|txn| (txn, raw)))
            .filter(|(txn, _)| config.date_range.is_none_or(|r| r.contains(txn.date)))
            .map(|(txn, raw)| {
                let category = classify(&txn, raw);
                ClassifiedTransaction { txn, category }
            })
            .collect();

        let pairs: Vec<(NormalizedTransaction, Category)> = transactions
            .iter()
            .map(|c| (c.txn.clone(), c.category))
            .collect();
        let clusters = cluster_by_category(&pairs);

        let normalized: Vec<NormalizedTransaction> = pairs.into_iter().map(|(t, _)| t).collect();
        let daily_flow = daily_flows(&normalized);
        let daily = running_balance(&daily_flow, opening.amount());
        let weekly = running_balance(&weekly_flows(&daily_flow, config.week_start), opening.amount());
        let monthly = running_balance(&monthly_flows(&daily_flow), opening.amount());

        debug_assert_eq!(continuity_break(&daily), None);
        debug_assert_eq!(continuity_break(&weekly), None);
        debug_assert_eq!(continuity_break(&monthly), None);

        tracing::info!(
            branch = config.branch_label(),
            raw = raws.len(),
            kept = transactions.len(),
            clusters = clusters.len(),
            days = daily.len(),
            opening = %opening.amount(),
            opening_assumed = opening.is_assumed(),
            "built branch report"
        );

        BranchReport {
            config: config.clone(),
            opening,
            transactions,
            clusters,
            daily,
            weekly,
            monthly,
        }
    }
}
