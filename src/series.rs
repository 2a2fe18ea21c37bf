//! In-memory Poupança series (BCB SGS series 195)
//!
//! The feed carries one record per calendar day. Every record holds the
//! yield credited from its date up to the same day one month later; records
//! dated on the 1st are the monthly values BCB publishes.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::dates::{parse_date_br, to_millis};
use crate::error::{PoupancaError, Result};

/// One record as delivered by the BCB SGS JSON API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Start date, `DD/MM/YYYY`
    pub data: String,
    /// Anniversary end date, `DD/MM/YYYY`
    pub datafim: String,
    /// Yield for the period, as a decimal percentage string
    pub valor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesEntry {
    pub timestamp_start: NaiveDate,
    pub timestamp_end: NaiveDate,
    pub day_of_month: u32,
    pub rate_percent: Decimal,
}

impl SeriesEntry {
    pub fn timestamp_start_millis(&self) -> i64 {
        to_millis(self.timestamp_start)
    }

    pub fn timestamp_end_millis(&self) -> i64 {
        to_millis(self.timestamp_end)
    }

    /// Published monthly value (record dated on the 1st)
    pub fn is_monthly(&self) -> bool {
        self.day_of_month == 1
    }
}

fn parse_rate(value: &str) -> Result<Decimal> {
    let cleaned = value.trim().replace(',', ".");
    if cleaned.is_empty() {
        return Err(PoupancaError::Parse("empty rate value".to_string()));
    }
    Decimal::from_str(&cleaned)
        .map_err(|err| PoupancaError::Parse(format!("invalid rate '{}': {}", value, err)))
}

impl TryFrom<&RawRecord> for SeriesEntry {
    type Error = PoupancaError;

    fn try_from(raw: &RawRecord) -> Result<Self> {
        let timestamp_start = parse_date_br(&raw.data)?;
        let timestamp_end = parse_date_br(&raw.datafim)?;
        let rate_percent = parse_rate(&raw.valor)?;
        Ok(SeriesEntry {
            timestamp_start,
            timestamp_end,
            day_of_month: timestamp_start.day(),
            rate_percent,
        })
    }
}

/// Parse and order a batch of raw records without touching any store
pub fn parse_records(records: &[RawRecord]) -> Result<Vec<SeriesEntry>> {
    let mut entries = records
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            SeriesEntry::try_from(raw).map_err(|err| match err {
                PoupancaError::Parse(msg) => PoupancaError::Parse(format!("record {}: {}", idx, msg)),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by_key(|entry| entry.timestamp_start);

    if let Some(pair) = entries
        .windows(2)
        .find(|pair| pair[0].timestamp_start == pair[1].timestamp_start)
    {
        return Err(PoupancaError::Parse(format!(
            "duplicate record for {}",
            pair[1].timestamp_start
        )));
    }

    Ok(entries)
}

/// Holds the loaded series; every read hands out an owned copy.
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: RwLock<Option<Arc<Vec<SeriesEntry>>>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored series with `records`.
    ///
    /// The batch is parsed completely before the swap, so a malformed
    /// record leaves the previous series in place.
    pub fn load(&self, records: &[RawRecord]) -> Result<()> {
        let entries = parse_records(records)?;
        let count = entries.len();
        let mut guard = self.series.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(entries));
        info!("Loaded {} poupança records", count);
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<SeriesEntry>> {
        Ok(self.snapshot()?.as_ref().clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.series
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.snapshot()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Shared handle on the current series, for read-only use inside the crate
    pub(crate) fn snapshot(&self) -> Result<Arc<Vec<SeriesEntry>>> {
        let guard = self.series.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(series) => Ok(Arc::clone(series)),
            None => {
                debug!("Poupança series queried before load");
                Err(PoupancaError::NotLoaded)
            }
        }
    }
}
