//! Monthly Poupança values: the records dated on the 1st of each month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::accumulator::accumulate;
use crate::dates::{earliest_supported, month_start, start_of_month, today};
use crate::error::{PoupancaError, Result};
use crate::series::{SeriesEntry, SeriesStore};

/// Number of months in the trailing window
pub const TRAILING_MONTHS: usize = 12;

/// Read-only monthly queries over a `SeriesStore`
#[derive(Debug, Clone, Copy)]
pub struct MonthlyView<'a> {
    store: &'a SeriesStore,
}

impl<'a> MonthlyView<'a> {
    pub fn new(store: &'a SeriesStore) -> Self {
        Self { store }
    }

    pub fn monthly_snapshots(&self) -> Result<Vec<SeriesEntry>> {
        Ok(self
            .store
            .snapshot()?
            .iter()
            .filter(|entry| entry.is_monthly())
            .cloned()
            .collect())
    }

    /// Published rate for `month`/`year`, without interpolation
    pub fn month_of(&self, month: u32, year: i32) -> Result<Option<Decimal>> {
        let Some(start) = month_start(month, year) else {
            return Ok(None);
        };
        Ok(self
            .store
            .snapshot()?
            .iter()
            .find(|entry| entry.is_monthly() && entry.timestamp_start == start)
            .map(|entry| entry.rate_percent))
    }

    /// Monthly values between the months of `from` and `to`, both inclusive.
    ///
    /// `from` defaults to 2000-01-01 and `to` to the current month. With
    /// `compounded`, each `rate_percent` holds the running growth factor.
    pub fn range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        compounded: bool,
    ) -> Result<Vec<SeriesEntry>> {
        let from = start_of_month(from.unwrap_or_else(earliest_supported));
        let to = start_of_month(to.unwrap_or_else(today));
        debug!("Poupança monthly range {} ..= {}", from, to);

        let entries: Vec<SeriesEntry> = self
            .monthly_snapshots()?
            .into_iter()
            .filter(|entry| entry.timestamp_start >= from && entry.timestamp_start <= to)
            .collect();

        compound_if(entries, compounded)
    }

    /// The latest twelve monthly values, or all of them when fewer exist
    pub fn last12(&self, compounded: bool) -> Result<Vec<SeriesEntry>> {
        let mut entries = self.monthly_snapshots()?;
        let skip = entries.len().saturating_sub(TRAILING_MONTHS);
        let latest = entries.split_off(skip);
        compound_if(latest, compounded)
    }

    /// Mean monthly rate over the trailing window.
    ///
    /// Always divides by twelve, even when fewer months are loaded.
    pub fn yearly_average(&self) -> Result<Decimal> {
        let sum: Decimal = self
            .last12(false)?
            .iter()
            .map(|entry| entry.rate_percent)
            .sum();
        Ok(sum / Decimal::from(TRAILING_MONTHS))
    }

    /// Growth factor over the trailing window
    pub fn yearly_accumulated(&self) -> Result<Decimal> {
        self.last12(true)?
            .last()
            .map(|entry| entry.rate_percent)
            .ok_or(PoupancaError::EmptySeries)
    }
}

fn compound_if(entries: Vec<SeriesEntry>, compounded: bool) -> Result<Vec<SeriesEntry>> {
    if compounded {
        accumulate(&entries, |entry| &mut entry.rate_percent)
    } else {
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::RawRecord;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn raw(start: NaiveDate, end: NaiveDate, valor: &str) -> RawRecord {
        RawRecord {
            data: start.format("%d/%m/%Y").to_string(),
            datafim: end.format("%d/%m/%Y").to_string(),
            valor: valor.to_string(),
        }
    }

    /// Monthly records for `months` consecutive months starting at Jan/2020,
    /// each followed by a daily record on the 2nd.
    fn store_with_months(months: u32) -> SeriesStore {
        let mut records = Vec::new();
        for i in 0..months {
            let start = d(2020, 1, 1).checked_add_months(chrono::Months::new(i)).unwrap();
            let end = start.checked_add_months(chrono::Months::new(1)).unwrap();
            records.push(raw(start, end, &format!("0.{:02}", 10 + i)));
            records.push(raw(start.succ_opt().unwrap(), end.succ_opt().unwrap(), "9.99"));
        }
        let store = SeriesStore::new();
        store.load(&records).unwrap();
        store
    }

    #[test]
    fn test_monthly_snapshots_are_day_one_only() {
        let store = store_with_months(3);
        let view = MonthlyView::new(&store);
        let monthly = view.monthly_snapshots().unwrap();

        assert_eq!(monthly.len(), 3);
        assert!(monthly.iter().all(|e| e.day_of_month == 1));
        assert!(monthly.windows(2).all(|w| w[0].timestamp_start < w[1].timestamp_start));
        let all = store.all().unwrap();
        assert!(monthly.iter().all(|e| all.contains(e)));
    }

    #[test]
    fn test_month_of_exact_match_only() {
        let store = SeriesStore::new();
        store.load(&[raw(d(2020, 1, 1), d(2020, 2, 1), "0.3")]).unwrap();
        let view = MonthlyView::new(&store);

        assert_eq!(view.month_of(1, 2020).unwrap(), Some(dec!(0.3)));
        assert_eq!(view.month_of(2, 2020).unwrap(), None);
        assert_eq!(view.month_of(13, 2020).unwrap(), None);
    }

    #[test]
    fn test_range_is_inclusive_on_month_boundaries() {
        let store = store_with_months(6);
        let view = MonthlyView::new(&store);

        // mid-month bounds normalize to the 1st of their months
        let entries = view.range(Some(d(2020, 2, 15)), Some(d(2020, 4, 30)), false).unwrap();
        let starts: Vec<_> = entries.iter().map(|e| e.timestamp_start).collect();
        assert_eq!(starts, vec![d(2020, 2, 1), d(2020, 3, 1), d(2020, 4, 1)]);
        assert_eq!(entries[0].rate_percent, dec!(0.11));
    }

    #[test]
    fn test_range_defaults_cover_everything_loaded() {
        let store = store_with_months(4);
        let view = MonthlyView::new(&store);
        assert_eq!(view.range(None, None, false).unwrap().len(), 4);
    }

    #[test]
    fn test_range_compounded_matches_accumulate() {
        let store = store_with_months(6);
        let view = MonthlyView::new(&store);
        let from = Some(d(2020, 2, 1));
        let to = Some(d(2020, 5, 1));

        let plain = view.range(from, to, false).unwrap();
        let compounded = view.range(from, to, true).unwrap();

        assert_eq!(accumulate(&plain, |e| &mut e.rate_percent).unwrap(), compounded);
        assert_eq!(compounded[0].rate_percent, dec!(1.0011));
    }

    #[test]
    fn test_last12_takes_latest_months() {
        let store = store_with_months(15);
        let view = MonthlyView::new(&store);
        let last = view.last12(false).unwrap();

        assert_eq!(last.len(), 12);
        assert_eq!(last[0].timestamp_start, d(2020, 4, 1));
        assert_eq!(last[11].timestamp_start, d(2021, 3, 1));
    }

    #[test]
    fn test_last12_is_lenient_with_short_series() {
        let store = store_with_months(5);
        let view = MonthlyView::new(&store);
        assert_eq!(view.last12(false).unwrap().len(), 5);
        assert_eq!(view.last12(true).unwrap().len(), 5);
    }

    #[test]
    fn test_yearly_average_divides_by_twelve() {
        let store = store_with_months(3);
        let view = MonthlyView::new(&store);
        // (0.10 + 0.11 + 0.12) / 12, not / 3
        assert_eq!(view.yearly_average().unwrap(), dec!(0.33) / dec!(12));
    }

    #[test]
    fn test_yearly_accumulated() {
        let store = store_with_months(2);
        let view = MonthlyView::new(&store);
        assert_eq!(view.yearly_accumulated().unwrap(), dec!(1.001) * dec!(1.0011));
    }

    #[test]
    fn test_yearly_accumulated_on_empty_series() {
        let store = SeriesStore::new();
        store.load(&[]).unwrap();
        let view = MonthlyView::new(&store);
        assert_eq!(view.yearly_accumulated(), Err(PoupancaError::EmptySeries));
        assert_eq!(view.yearly_average(), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_compounding_huge_rates_reports_overflow() {
        let store = SeriesStore::new();
        store
            .load(&[
                raw(d(2020, 1, 1), d(2020, 2, 1), "10000000000000000000000000"),
                raw(d(2020, 2, 1), d(2020, 3, 1), "10000000000000000000000000"),
            ])
            .unwrap();
        let view = MonthlyView::new(&store);

        assert!(matches!(view.yearly_accumulated(), Err(PoupancaError::Overflow(_))));
        assert!(matches!(view.last12(true), Err(PoupancaError::Overflow(_))));
        assert!(matches!(
            view.range(Some(d(2020, 1, 1)), Some(d(2020, 2, 1)), true),
            Err(PoupancaError::Overflow(_))
        ));
        // plain queries still work
        assert_eq!(view.last12(false).unwrap().len(), 2);
        assert_eq!(view.month_of(2, 2020).unwrap(), Some(dec!(10000000000000000000000000)));
    }

    #[test]
    fn test_queries_before_load_fail() {
        let store = SeriesStore::new();
        let view = MonthlyView::new(&store);
        assert_eq!(view.month_of(1, 2020), Err(PoupancaError::NotLoaded));
        assert_eq!(view.last12(false), Err(PoupancaError::NotLoaded));
        assert_eq!(view.yearly_accumulated(), Err(PoupancaError::NotLoaded));
    }
}
