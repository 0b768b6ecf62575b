use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::{days_before, format_calendar_date, us_date_label};
use crate::domain::{BreakRecord, BreakStatus};
use crate::error::AppError;

/// Inclusive calendar window with `start <= end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "DateRangeInput")]
pub struct DateRange {
    #[serde(with = "crate::dates::ymd")]
    start: Date,
    #[serde(with = "crate::dates::ymd")]
    end: Date,
}

#[derive(Deserialize)]
struct DateRangeInput {
    #[serde(with = "crate::dates::ymd")]
    start: Date,
    #[serde(with = "crate::dates::ymd")]
    end: Date,
}

impl TryFrom<DateRangeInput> for DateRange {
    type Error = AppError;

    fn try_from(input: DateRangeInput) -> Result<Self, Self::Error> {
        DateRange::new(input.start, input.end)
    }
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::new("RANGE_INVALID", "End date must be after start date")
                .with_details(format!(
                    "start={}; end={}",
                    format_calendar_date(start),
                    format_calendar_date(end)
                )));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: Date) -> Self {
        Self { start: day, end: day }
    }

    /// `days` calendar days ending at `today`. Zero is treated as one day.
    pub fn last_days(today: Date, days: u32) -> Self {
        Self {
            start: days_before(today, days.max(1) - 1),
            end: today,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// `start <= date < end + 1 day`: the end day is included through an exclusive bound on
    /// the following day.
    pub fn contains(&self, date: Date) -> bool {
        if date < self.start {
            return false;
        }
        match self.end.next_day() {
            Some(exclusive_end) => date < exclusive_end,
            None => true,
        }
    }
}

/// A date window as requested: explicit bounds, or the "last N days" shorthand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RangeQuery {
    Explicit(DateRange),
    LastDays { label: String, days: u32 },
}

impl Default for RangeQuery {
    fn default() -> Self {
        RangeQuery::LastDays {
            label: "Last 7 Days".to_string(),
            days: 7,
        }
    }
}

impl RangeQuery {
    pub fn resolve(&self, today: Date) -> DateRange {
        match self {
            RangeQuery::Explicit(range) => *range,
            RangeQuery::LastDays { days, .. } => DateRange::last_days(today, *days),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RangeQuery::Explicit(range) => custom_range_label(range),
            RangeQuery::LastDays { label, .. } => label.clone(),
        }
    }
}

pub fn custom_range_label(range: &DateRange) -> String {
    format!(
        "Custom: {} - {}",
        us_date_label(range.start),
        us_date_label(range.end)
    )
}

/// Every record dated inside `range`, in input order.
pub fn select_by_date_range<'a>(records: &'a [BreakRecord], range: &DateRange) -> Vec<&'a BreakRecord> {
    records.iter().filter(|r| range.contains(r.date)).collect()
}

/// Toggle semantics of a category (pie slice) click: clicking the active category clears the
/// filter, clicking any other category makes it active.
pub fn apply_pie_click_filter(current: Option<&str>, clicked: &str) -> Option<String> {
    match current {
        Some(active) if active == clicked => None,
        _ => Some(clicked.to_string()),
    }
}

/// Active UI filters. All default to "show all".
///
/// The assignee panel and the break-details table each carry their own status dropdown; one
/// never narrows the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterState {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub assignee_status: Option<BreakStatus>,
    #[serde(default)]
    pub table_status: Option<BreakStatus>,
}

impl FilterState {
    pub fn with_pie_click(&self, clicked: &str) -> FilterState {
        FilterState {
            category: apply_pie_click_filter(self.category.as_deref(), clicked),
            ..self.clone()
        }
    }

    pub fn with_assignee_status(&self, status: Option<BreakStatus>) -> FilterState {
        FilterState {
            assignee_status: status,
            ..self.clone()
        }
    }

    pub fn with_table_status(&self, status: Option<BreakStatus>) -> FilterState {
        FilterState {
            table_status: status,
            ..self.clone()
        }
    }

    /// Whether a category slice renders at full opacity.
    pub fn is_highlighted(&self, category: &str) -> bool {
        self.category.as_deref().map_or(true, |active| active == category)
    }
}

pub fn filter_by_status<'a>(
    records: &[&'a BreakRecord],
    status: Option<BreakStatus>,
) -> Vec<&'a BreakRecord> {
    match status {
        None => records.to_vec(),
        Some(s) => records.iter().copied().filter(|r| r.status == s).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn last_days_counts_today() {
        let range = DateRange::last_days(date!(2024 - 01 - 10), 7);
        assert_eq!(range.start(), date!(2024 - 01 - 04));
        assert_eq!(range.end(), date!(2024 - 01 - 10));
        assert_eq!(DateRange::last_days(date!(2024 - 01 - 10), 0).start(), date!(2024 - 01 - 10));
    }

    #[test]
    fn contains_handles_last_representable_day() {
        let range = DateRange::single_day(Date::MAX);
        assert!(range.contains(Date::MAX));
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let err = serde_json::from_str::<DateRange>(r#"{"start":"2024-01-05","end":"2024-01-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("RANGE_INVALID"));
    }
}
