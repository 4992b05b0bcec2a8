//! Calendar period keys: days, configurable weeks, and months.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// First day of a reporting week
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeekStart {
    #[default]
    #[serde(rename = "MON", alias = "mon", alias = "monday")]
    Monday,
    #[serde(rename = "SUN", alias = "sun", alias = "sunday")]
    Sunday,
}

impl WeekStart {
    /// First day of the week containing `date`
    pub fn week_of(&self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        date - Duration::days(offset as i64)
    }

    pub fn code(&self) -> &'static str {
        match self {
            WeekStart::Monday => "MON",
            WeekStart::Sunday => "SUN",
        }
    }
}

impl std::str::FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MON" | "MONDAY" => Ok(WeekStart::Monday),
            "SUN" | "SUNDAY" => Ok(WeekStart::Sunday),
            other => Err(format!("invalid week start '{other}' (expected MON or SUN)")),
        }
    }
}

/// Granularity of a balance summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn title(&self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }
}

/// Identifies one bucket of a balance summary.
///
/// Keys of the same granularity order chronologically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Day(NaiveDate),
    /// Week identified by its first day
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    pub fn month_of(date: NaiveDate) -> Self {
        PeriodKey::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            PeriodKey::Day(_) => Granularity::Daily,
            PeriodKey::Week(_) => Granularity::Weekly,
            PeriodKey::Month { .. } => Granularity::Monthly,
        }
    }

    /// Machine-friendly key: `2024-03-01`, `2024-03-04..2024-03-10`, `2024-03`
    pub fn iso(&self) -> String {
        match self {
            PeriodKey::Day(d) => d.format("%Y-%m-%d").to_string(),
            PeriodKey::Week(start) => format!(
                "{}..{}",
                start.format("%Y-%m-%d"),
                (*start + Duration::days(6)).format("%Y-%m-%d")
            ),
            PeriodKey::Month { year, month } => format!("{year:04}-{month:02}"),
        }
    }

    /// Display label: `01/03/2024`, `04/03/2024 → 10/03/2024`, `03/2024`
    pub fn display(&self) -> String {
        match self {
            PeriodKey::Day(d) => d.format("%d/%m/%Y").to_string(),
            PeriodKey::Week(start) => format!(
                "{} → {}",
                start.format("%d/%m/%Y"),
                (*start + Duration::days(6)).format("%d/%m/%Y")
            ),
            PeriodKey::Month { year, month } => format!("{month:02}/{year:04}"),
        }
    }

    /// Saturday or Sunday; only day keys can be weekend
    pub fn is_weekend(&self) -> bool {
        match self {
            PeriodKey::Day(d) => matches!(d.weekday(), Weekday::Sat | Weekday::Sun),
            _ => false,
        }
    }
}
