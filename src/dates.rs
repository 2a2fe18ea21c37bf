//! Calendar helpers shared by the series, the monthly view and the
//! correction engine.
//!
//! Everything here works on calendar days (`NaiveDate`); month stepping goes
//! through chrono's `checked_add_months`, which clamps to the last valid day
//! of the target month instead of adding a fixed number of days.

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{PoupancaError, Result};

/// Earliest date `range` looks at when no lower bound is given
pub fn earliest_supported() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a BCB `DD/MM/YYYY` day string
pub fn parse_date_br(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y")
        .map_err(|err| PoupancaError::Parse(format!("invalid date '{}': {}", value, err)))
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month following `date`
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    start_of_month(date).checked_add_months(Months::new(1))
}

/// `date` moved `months` calendar months ahead, clamped to the month's length
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// The first day of `month`/`year`, or None for an impossible month
pub fn month_start(month: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Midnight-UTC epoch milliseconds of a calendar day
pub fn to_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Calendar day (UTC) containing the given epoch milliseconds
pub fn from_millis(millis: i64) -> Result<NaiveDate> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or(PoupancaError::InvalidTimestamp(millis))
}

/// An absolute time expressed as epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochMillis(pub i64);

/// Anything that can be normalized to the start of its calendar day
pub trait CalendarInput {
    fn calendar_day(&self) -> Result<NaiveDate>;
}

impl CalendarInput for NaiveDate {
    fn calendar_day(&self) -> Result<NaiveDate> {
        Ok(*self)
    }
}

impl CalendarInput for NaiveDateTime {
    fn calendar_day(&self) -> Result<NaiveDate> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> CalendarInput for DateTime<Tz> {
    fn calendar_day(&self) -> Result<NaiveDate> {
        Ok(self.date_naive())
    }
}

impl CalendarInput for EpochMillis {
    fn calendar_day(&self) -> Result<NaiveDate> {
        from_millis(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_br() {
        assert_eq!(parse_date_br("17/09/2007").unwrap(), d(2007, 9, 17));
        assert_eq!(parse_date_br(" 01/02/2020 ").unwrap(), d(2020, 2, 1));
    }

    #[test]
    fn test_parse_date_br_rejects_malformed() {
        assert!(matches!(parse_date_br("2020-01-01"), Err(PoupancaError::Parse(_))));
        assert!(matches!(parse_date_br("31/02/2020"), Err(PoupancaError::Parse(_))));
        assert!(matches!(parse_date_br(""), Err(PoupancaError::Parse(_))));
    }

    #[test]
    fn test_first_of_next_month_crosses_year() {
        assert_eq!(first_of_next_month(d(2020, 12, 31)), Some(d(2021, 1, 1)));
        assert_eq!(first_of_next_month(d(2020, 2, 29)), Some(d(2020, 3, 1)));
    }

    #[test]
    fn test_add_months_clamps_to_month_length() {
        assert_eq!(add_months(d(2020, 1, 31), 1), Some(d(2020, 2, 29)));
        assert_eq!(add_months(d(2021, 1, 31), 1), Some(d(2021, 2, 28)));
        assert_eq!(add_months(d(2020, 1, 15), 13), Some(d(2021, 2, 15)));
    }

    #[test]
    fn test_month_start_rejects_impossible_month() {
        assert_eq!(month_start(2, 2020), Some(d(2020, 2, 1)));
        assert_eq!(month_start(13, 2020), None);
        assert_eq!(month_start(0, 2020), None);
    }

    #[test]
    fn test_millis_conversion() {
        assert_eq!(to_millis(d(1970, 1, 2)), 86_400_000);
        assert_eq!(from_millis(86_400_000 + 3_600_000).unwrap(), d(1970, 1, 2));
        assert_eq!(from_millis(to_millis(d(2020, 2, 29))).unwrap(), d(2020, 2, 29));
        assert!(matches!(
            from_millis(i64::MAX),
            Err(PoupancaError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_calendar_input_drops_time_of_day() {
        let dt = d(2020, 1, 31).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(dt.calendar_day().unwrap(), d(2020, 1, 31));
        assert_eq!(dt.and_utc().calendar_day().unwrap(), d(2020, 1, 31));
        let millis = EpochMillis(to_millis(d(2020, 1, 31)) + 1_000);
        assert_eq!(millis.calendar_day().unwrap(), d(2020, 1, 31));
    }
}
