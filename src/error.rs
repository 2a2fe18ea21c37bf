//! Error handling for the Poupança feed
//!
//! Query and load failures of the in-memory series are typed with
//! `PoupancaError`; the outer layers (HTTP loader, config, CLI) use anyhow
//! for context chaining on top of it.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error types for series queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoupancaError {
    #[error("poupança series not loaded yet")]
    NotLoaded,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("poupança series has no monthly entries")]
    EmptySeries,

    #[error("no poupança rate ends on anniversary {anniversary}")]
    MissingRate { anniversary: NaiveDate },

    #[error("timestamp out of range: {0} ms")]
    InvalidTimestamp(i64),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

/// Result type alias for series operations
pub type Result<T> = std::result::Result<T, PoupancaError>;
