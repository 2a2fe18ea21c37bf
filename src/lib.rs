//! Poupança - Brazilian savings account index
//!
//! This library loads the official Poupança series published by Banco
//! Central do Brasil (SGS 195) and answers queries over it: monthly values,
//! accumulated periods, trailing 12-month statistics and the anniversary-date
//! correction of an amount.

pub mod accumulator;
pub mod config;
pub mod correction;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod monthly;
pub mod series;
pub mod utils;

pub use correction::CorrectionEngine;
pub use error::{PoupancaError, Result};
pub use monthly::MonthlyView;
pub use series::{RawRecord, SeriesEntry, SeriesStore};
