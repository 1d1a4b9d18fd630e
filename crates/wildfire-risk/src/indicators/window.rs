use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Inclusive date range sent to the remote indicator service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    fn days_before(today: NaiveDate, start_days: i64, end_days: i64) -> Self {
        Self {
            start: today - Duration::days(start_days),
            end: today - Duration::days(end_days),
        }
    }
}

/// Sampling windows used when asking for each indicator, anchored on the
/// evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindows {
    pub vegetation: DateRange,
    pub temperature_current: DateRange,
    pub temperature_baseline: DateRange,
    pub precipitation_current: DateRange,
    pub precipitation_baseline: DateRange,
    pub fire_history: DateRange,
}

impl LookbackWindows {
    pub fn anchored(today: NaiveDate, fire_lookback_years: u8) -> Self {
        let fire_days = i64::from(fire_lookback_years.max(1)) * 365;
        Self {
            vegetation: DateRange::days_before(today, 90, 0),
            temperature_current: DateRange::days_before(today, 30, 0),
            temperature_baseline: DateRange::days_before(today, 3 * 365, 365),
            precipitation_current: DateRange::days_before(today, 90, 0),
            precipitation_baseline: DateRange::days_before(today, 5 * 365, 365),
            fire_history: DateRange::days_before(today, fire_days, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_end_on_evaluation_date_or_a_year_earlier() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date");
        let windows = LookbackWindows::anchored(today, 5);

        assert_eq!(windows.vegetation.end, today);
        assert_eq!(
            windows.temperature_current.start,
            NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
        );
        assert_eq!(windows.temperature_baseline.end, today - Duration::days(365));
        assert_eq!(windows.precipitation_baseline.start, today - Duration::days(1825));
        assert_eq!(windows.fire_history.start, today - Duration::days(1825));
    }

    #[test]
    fn fire_lookback_never_collapses_to_zero() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date");
        let windows = LookbackWindows::anchored(today, 0);
        assert_eq!(windows.fire_history.start, today - Duration::days(365));
    }
}
