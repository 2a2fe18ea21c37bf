//! Poupança correction by anniversary date.
//!
//! Follows the methodology of the BCB "Calculadora do Cidadão": the amount
//! earns the monthly yield credited on every anniversary of the start day
//! that falls inside the period. Deposits made on the 29th, 30th or 31st
//! roll over to the 1st of the following month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::accumulator::compound_factor;
use crate::dates::{add_months, first_of_next_month, today, CalendarInput, EpochMillis};
use crate::error::{PoupancaError, Result};
use crate::series::SeriesStore;

/// Last day of the month that keeps its own anniversary
const LAST_ANNIVERSARY_DAY: u32 = 28;

/// Deposits on days 29-31 start earning on the 1st of the next month
pub fn anniversary_start(from: NaiveDate) -> NaiveDate {
    if from.day() > LAST_ANNIVERSARY_DAY {
        first_of_next_month(from).unwrap_or(from)
    } else {
        from
    }
}

/// Anniversary dates of `from` inside `[from, to)`, in ascending order.
///
/// The period is cut into one-month steps counted from the (rolled) start
/// date, the last step clamped to `to`. Only step ends that land on the
/// start's day of month count as anniversaries.
pub fn anniversaries(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let start = anniversary_start(from);
    let mut ends = Vec::new();
    let mut cursor = start;
    let mut step = 1;

    while cursor < to {
        let next = add_months(start, step).map_or(to, |date| date.min(to));
        ends.push(next);
        cursor = next;
        step += 1;
    }

    ends.retain(|end| end.day() == start.day());
    ends
}

/// Anniversary-date correction calculator over a `SeriesStore`
#[derive(Debug, Clone, Copy)]
pub struct CorrectionEngine<'a> {
    store: &'a SeriesStore,
}

impl<'a> CorrectionEngine<'a> {
    pub fn new(store: &'a SeriesStore) -> Self {
        Self { store }
    }

    /// `amount` corrected by Poupança from `from` until `to` (default today).
    ///
    /// Dates, date-times and epoch millis are accepted; only their calendar
    /// day counts. Returns the amount unchanged when the first anniversary
    /// has not been reached yet. Every anniversary needs a record ending on
    /// it, otherwise the call fails with `MissingRate`.
    pub fn correct<D: CalendarInput>(
        &self,
        amount: Decimal,
        from: D,
        to: Option<D>,
    ) -> Result<Decimal> {
        let series = self.store.snapshot()?;
        let from = from.calendar_day()?;
        let to = match to {
            Some(to) => to.calendar_day()?,
            None => today(),
        };

        let dates = anniversaries(from, to);
        if dates.is_empty() {
            debug!("No anniversary between {} and {}", from, to);
            return Ok(amount);
        }

        let rates = dates
            .iter()
            .map(|anniversary| {
                series
                    .iter()
                    .find(|entry| entry.timestamp_end == *anniversary)
                    .map(|entry| entry.rate_percent)
                    .ok_or(PoupancaError::MissingRate {
                        anniversary: *anniversary,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let index = compound_factor(rates)?;
        debug!(
            "Poupança index {} over {} anniversaries ({} to {})",
            index,
            dates.len(),
            from,
            to
        );
        amount.checked_mul(index).ok_or_else(|| {
            PoupancaError::Overflow(format!("correcting {} by index {}", amount, index))
        })
    }

    /// Same as `correct`, with the period given as epoch milliseconds
    pub fn correct_millis(&self, amount: Decimal, from: i64, to: Option<i64>) -> Result<Decimal> {
        self.correct(amount, EpochMillis(from), to.map(EpochMillis))
    }
}
