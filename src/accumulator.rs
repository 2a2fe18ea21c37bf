//! Compounding of percentage series.
//!
//! Each step multiplies the running total by `1 + value/100`, starting from an
//! implicit base of 1, so the accumulated value is a growth factor.

use rust_decimal::Decimal;

use crate::error::{PoupancaError, Result};

fn growth(rate_percent: Decimal) -> Result<Decimal> {
    (rate_percent / Decimal::ONE_HUNDRED)
        .checked_add(Decimal::ONE)
        .ok_or_else(|| PoupancaError::Overflow(format!("growth factor of {}%", rate_percent)))
}

fn compound_step(running: Decimal, rate_percent: Decimal) -> Result<Decimal> {
    running
        .checked_mul(growth(rate_percent)?)
        .ok_or_else(|| PoupancaError::Overflow(format!("compounding {}%", rate_percent)))
}

/// Copies of `entries` with the field selected by `field` replaced by the
/// running growth factor. Order and all other fields are preserved.
pub fn accumulate<T, F>(entries: &[T], field: F) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&mut T) -> &mut Decimal,
{
    let mut running = Decimal::ONE;
    entries
        .iter()
        .map(|entry| {
            let mut copy = entry.clone();
            let value = field(&mut copy);
            running = compound_step(running, *value)?;
            *value = running;
            Ok(copy)
        })
        .collect()
}

/// Final growth factor of a rate sequence (1 when empty)
pub fn compound_factor<I>(rates: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    rates
        .into_iter()
        .try_fold(Decimal::ONE, compound_step)
}
