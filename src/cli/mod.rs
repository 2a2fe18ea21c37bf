use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

pub mod formatters;

#[derive(Parser)]
#[command(name = "poupanca")]
#[command(version, about = "Brazilian Poupança index queries and correction calculator")]
#[command(
    long_about = "Query the official Poupança series published by Banco Central do Brasil (SGS 195): monthly rates, accumulated periods, trailing 12-month statistics and anniversary-date correction of an amount."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Read the series from a JSON file in BCB format instead of fetching it
    #[arg(long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// Config file (defaults to $XDG_CONFIG_HOME/poupanca/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Raw daily series
    Series {
        /// Only the monthly values (records dated on the 1st)
        #[arg(short, long)]
        monthly: bool,
    },

    /// Published rate for one month (MM/YYYY or YYYY-MM)
    Month {
        month: String,
    },

    /// Monthly rates over a period
    Range {
        /// First month (YYYY-MM-DD, DD/MM/YYYY or YYYY-MM); defaults to 2000-01
        #[arg(long)]
        from: Option<String>,

        /// Last month; defaults to the current month
        #[arg(long)]
        to: Option<String>,

        /// Show the accumulated growth instead of each month's rate
        #[arg(short, long)]
        accumulated: bool,
    },

    /// Rates of the last 12 published months
    Last12 {
        /// Show the accumulated growth instead of each month's rate
        #[arg(short, long)]
        accumulated: bool,
    },

    /// Trailing 12-month average and accumulated rate
    Stats,

    /// Correct an amount by Poupança using anniversary dates
    Correct {
        /// Amount invested (e.g. 1000 or 1.234,56)
        amount: String,

        /// Investment date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        from: String,

        /// End date; defaults to today
        #[arg(long)]
        to: Option<String>,
    },
}

/// Parse YYYY-MM-DD, DD/MM/YYYY or YYYY-MM (first day of the month)
pub fn parse_flexible_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Ok(date);
    }

    Err(anyhow!(
        "Invalid date '{}'. Use YYYY-MM-DD, DD/MM/YYYY or YYYY-MM",
        s
    ))
}

/// Parse MM/YYYY or YYYY-MM into (month, year)
pub fn parse_month(s: &str) -> Result<(u32, i32)> {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(&format!("01/{}", s), "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
        .map_err(|_| anyhow!("Invalid month '{}'. Use MM/YYYY or YYYY-MM", s))?;
    Ok((date.month(), date.year()))
}

/// Parse an amount written either as 1234.56 or in Brazilian notation 1.234,56
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let trimmed = s.trim().trim_start_matches("R$").trim();
    let cleaned = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&cleaned).map_err(|err| anyhow!("Invalid amount '{}': {}", s, err))
}
