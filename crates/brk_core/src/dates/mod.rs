use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset, Weekday};

use crate::domain::ValidationWarning;
use crate::error::AppError;

const YMD: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const US_SLASHED: &[BorrowedFormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// Current calendar day in UTC. Dates never carry a time of day, so boundary comparisons are
/// immune to local timezone shifts.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(raw: &str) -> Result<Date, AppError> {
    let trimmed = raw.trim();
    Date::parse(trimmed, YMD).map_err(|e| {
        AppError::new("DATE_PARSE_FAILED", "Expected a YYYY-MM-DD calendar date")
            .with_details(format!("value={trimmed}; err={e}"))
    })
}

pub fn format_calendar_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `today - days`, saturating at the earliest representable date.
pub fn days_before(today: Date, days: u32) -> Date {
    today
        .checked_sub(Duration::days(i64::from(days)))
        .unwrap_or(Date::MIN)
}

pub fn weekday_label(date: Date) -> String {
    match date.weekday() {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
    .to_string()
}

fn month_short(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// "Jan 5"
pub fn short_date_label(date: Date) -> String {
    format!("{} {}", month_short(date.month()), date.day())
}

/// "1/5/2024", used in custom range labels.
pub fn us_date_label(date: Date) -> String {
    format!("{}/{}/{}", u8::from(date.month()), date.day(), date.year())
}

/// Normalize an ingested date cell to a calendar date.
///
/// `YYYY-MM-DD` is taken as-is. RFC3339 timestamps and US `M/D/YYYY` dates are accepted with an
/// explicit warning; anything else yields `None` plus a warning, never a guessed default.
pub fn normalize_calendar_date(
    field: &str,
    raw_input: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<Date> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = Date::parse(trimmed, YMD) {
        return Some(date);
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        let date = dt.to_offset(UtcOffset::UTC).date();
        warnings.push(
            ValidationWarning::new(
                "INGEST_DATE_FROM_TIMESTAMP",
                format!("Truncated timestamp to its UTC calendar day for {field}"),
            )
            .with_details(format!("raw={trimmed}; date={}", format_calendar_date(date))),
        );
        return Some(date);
    }

    if let Ok(date) = Date::parse(trimmed, US_SLASHED) {
        warnings.push(
            ValidationWarning::new(
                "INGEST_DATE_NORMALIZED",
                format!("Normalized M/D/YYYY date for {field}"),
            )
            .with_details(format!("raw={trimmed}; date={}", format_calendar_date(date))),
        );
        return Some(date);
    }

    warnings.push(
        ValidationWarning::new(
            "INGEST_DATE_UNPARSEABLE",
            format!("Unparseable date for {field}"),
        )
        .with_details(format!("raw={trimmed}")),
    );
    None
}

/// Serde adapter storing a `Date` as `YYYY-MM-DD`.
pub mod ymd {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_calendar_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn labels_match_dashboard_axis_formats() {
        let d = date!(2024 - 01 - 05);
        assert_eq!(weekday_label(d), "Fri");
        assert_eq!(short_date_label(d), "Jan 5");
        assert_eq!(us_date_label(d), "1/5/2024");
        assert_eq!(format_calendar_date(d), "2024-01-05");
    }

    #[test]
    fn strict_parse_rejects_timestamps() {
        assert_eq!(parse_calendar_date(" 2024-02-29 ").unwrap(), date!(2024 - 02 - 29));
        let err = parse_calendar_date("2024-02-30").unwrap_err();
        assert_eq!(err.code, "DATE_PARSE_FAILED");
        assert!(parse_calendar_date("2024-01-01T00:00:00Z").is_err());
    }

    #[test]
    fn normalize_warns_on_non_canonical_inputs() {
        let mut warnings = Vec::new();
        assert_eq!(
            normalize_calendar_date("date", "2024-01-01", &mut warnings),
            Some(date!(2024 - 01 - 01))
        );
        assert!(warnings.is_empty());

        assert_eq!(
            normalize_calendar_date("date", "2024-01-01T23:30:00-02:00", &mut warnings),
            Some(date!(2024 - 01 - 02))
        );
        assert_eq!(
            normalize_calendar_date("date", "1/9/2024", &mut warnings),
            Some(date!(2024 - 01 - 09))
        );
        assert_eq!(normalize_calendar_date("date", "yesterday", &mut warnings), None);

        let codes: Vec<&str> = warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "INGEST_DATE_FROM_TIMESTAMP",
                "INGEST_DATE_NORMALIZED",
                "INGEST_DATE_UNPARSEABLE"
            ]
        );
    }

    #[test]
    fn days_before_saturates() {
        assert_eq!(days_before(date!(2024 - 03 - 01), 1), date!(2024 - 02 - 29));
        assert_eq!(days_before(Date::MIN, 3), Date::MIN);
    }
}
