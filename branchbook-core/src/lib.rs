//! branchbook-core: ledger types, period math, clustering and running balances

pub mod balance;
pub mod cluster;
pub mod config;
pub mod ledger;
pub mod period;
pub mod remark;

pub use balance::{OpeningBalance, PeriodRow, continuity_break, running_balance};
pub use cluster::{PeriodFlow, cluster_by_category, daily_flows, monthly_flows, weekly_flows};
pub use config::{DateRange, NumberLocale, ReportConfig};
pub use ledger::{Category, ClusterBucket, NormalizedTransaction};
pub use period::{Granularity, PeriodKey, WeekStart};
pub use remark::{Narration, ParsedRemark, parse_remark};
