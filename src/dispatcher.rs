//! Runs a parsed CLI command against a loaded series

use anyhow::{Context, Result};
use poupanca::correction::anniversaries;
use poupanca::dates::today;
use poupanca::{CorrectionEngine, MonthlyView, SeriesStore};
use tracing::info;

use crate::cli::formatters::{self, CorrectionReport};
use crate::cli::{parse_amount, parse_flexible_date, parse_month, Commands};

pub fn dispatch(command: &Commands, store: &SeriesStore, json: bool) -> Result<String> {
    let view = MonthlyView::new(store);

    match command {
        Commands::Series { monthly } => {
            let entries = if *monthly {
                view.monthly_snapshots()?
            } else {
                store.all()?
            };
            if json {
                Ok(formatters::format_entries_json(&entries, false))
            } else {
                let title = if *monthly {
                    "Poupança monthly series"
                } else {
                    "Poupança daily series"
                };
                Ok(formatters::format_entries_table(title, &entries, false))
            }
        }

        Commands::Month { month } => {
            let (month, year) = parse_month(month)?;
            let rate = view.month_of(month, year)?;
            Ok(formatters::format_month(month, year, rate, json))
        }

        Commands::Range {
            from,
            to,
            accumulated,
        } => {
            let from = from.as_deref().map(parse_flexible_date).transpose()?;
            let to = to.as_deref().map(parse_flexible_date).transpose()?;
            let entries = view.range(from, to, *accumulated)?;
            if json {
                Ok(formatters::format_entries_json(&entries, *accumulated))
            } else {
                Ok(formatters::format_entries_table(
                    "Poupança by month",
                    &entries,
                    *accumulated,
                ))
            }
        }

        Commands::Last12 { accumulated } => {
            let entries = view.last12(*accumulated)?;
            if json {
                Ok(formatters::format_entries_json(&entries, *accumulated))
            } else {
                Ok(formatters::format_entries_table(
                    "Poupança - last 12 months",
                    &entries,
                    *accumulated,
                ))
            }
        }

        Commands::Stats => {
            let months = view.last12(false)?.len();
            let average = view.yearly_average()?;
            let accumulated = view
                .yearly_accumulated()
                .context("Cannot compute the accumulated rate")?;
            Ok(formatters::format_stats(average, accumulated, months, json))
        }

        Commands::Correct { amount, from, to } => {
            let amount = parse_amount(amount)?;
            let from = parse_flexible_date(from)?;
            let to = match to {
                Some(date) => parse_flexible_date(date)?,
                None => today(),
            };
            info!("Correcting {} by Poupança from {} to {}", amount, from, to);

            let corrected = CorrectionEngine::new(store)
                .correct(amount, from, Some(to))
                .context("Poupança correction failed")?;
            let report = CorrectionReport {
                amount,
                from,
                to,
                anniversaries: anniversaries(from, to),
                corrected,
            };
            Ok(formatters::format_correction(&report, json))
        }
    }
}
