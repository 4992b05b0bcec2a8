//! Report request configuration

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::WeekStart;

/// Inclusive date range of a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Digit grouping for rendered amounts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NumberLocale {
    /// 1,234,567.89
    #[default]
    Standard,
    /// 12,34,567.89
    Indian,
}

/// Everything the engine needs besides the transactions themselves
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    /// Branch balance at the start of the range; `None` is reported as assumed zero
    #[serde(default)]
    pub opening_balance: Option<Decimal>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Branch label used in titles and file names
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub locale: NumberLocale,
}

impl ReportConfig {
    pub fn branch_label(&self) -> &str {
        self.branch.as_deref().unwrap_or("branch")
    }
}
