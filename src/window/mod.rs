//! Calendar windows used to select recent trades.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::TrackerError;

/// Time window selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WindowMode {
    #[default]
    Day,
    Week,
    CurrentMonth,
    /// First day of the previous month through today.
    ///
    /// The window deliberately runs into the current month; see DESIGN.md.
    LastMonth,
}

impl WindowMode {
    pub const ALL: [WindowMode; 4] = [
        WindowMode::Day,
        WindowMode::Week,
        WindowMode::CurrentMonth,
        WindowMode::LastMonth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WindowMode::Day => "day",
            WindowMode::Week => "week",
            WindowMode::CurrentMonth => "current-month",
            WindowMode::LastMonth => "last-month",
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowMode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(WindowMode::Day),
            "week" => Ok(WindowMode::Week),
            "current-month" | "tmonth" => Ok(WindowMode::CurrentMonth),
            "last-month" | "lmonth" => Ok(WindowMode::LastMonth),
            other => Err(TrackerError::InvalidConfiguration(format!(
                "unknown window mode '{}', expected one of: day, week, current-month, last-month",
                other
            ))),
        }
    }
}

impl TryFrom<String> for WindowMode {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowMode> for String {
    fn from(mode: WindowMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Set of calendar dates a trade must fall on to count as recent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    dates: BTreeSet<NaiveDate>,
}

impl DateWindow {
    pub fn resolve(mode: WindowMode, today: NaiveDate) -> Self {
        let start = match mode {
            WindowMode::Day => today,
            WindowMode::Week => today - Duration::days(6),
            WindowMode::CurrentMonth => first_of_month(today),
            WindowMode::LastMonth => first_of_previous_month(today),
        };

        Self {
            dates: start.iter_days().take_while(|d| *d <= today).collect(),
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn first_of_previous_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .pred_opt()
        .map(first_of_month)
        .unwrap_or(first)
}
