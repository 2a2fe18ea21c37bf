//! Output formatting module for CLI display
//!
//! Keeps presentation apart from the series queries: tables for the
//! terminal, JSON for scripting.

use chrono::NaiveDate;
use colored::Colorize;
use poupanca::utils::{format_currency, format_factor_as_percent, format_rate};
use poupanca::SeriesEntry;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Series entries for JSON output; `accumulated` switches the value key
pub fn format_entries_json(entries: &[SeriesEntry], accumulated: bool) -> String {
    #[derive(Serialize)]
    struct JsonEntry {
        date: NaiveDate,
        end_date: NaiveDate,
        timestamp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        rate: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        factor: Option<String>,
    }

    let rows: Vec<JsonEntry> = entries
        .iter()
        .map(|e| JsonEntry {
            date: e.timestamp_start,
            end_date: e.timestamp_end,
            timestamp: e.timestamp_start_millis(),
            rate: (!accumulated).then(|| e.rate_percent.to_string()),
            factor: accumulated.then(|| e.rate_percent.to_string()),
        })
        .collect();

    to_json(&rows)
}

/// Series entries as a terminal table
pub fn format_entries_table(title: &str, entries: &[SeriesEntry], accumulated: bool) -> String {
    if entries.is_empty() {
        return format!("{} {}: no entries found\n", "ℹ".blue().bold(), title);
    }

    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Anniversary")]
        end_date: String,
        #[tabled(rename = "Rate")]
        rate: String,
    }

    #[derive(Tabled)]
    struct AccumulatedRow {
        #[tabled(rename = "Month")]
        date: String,
        #[tabled(rename = "Factor")]
        factor: String,
        #[tabled(rename = "Accumulated")]
        accumulated: String,
    }

    let mut table = if accumulated {
        Table::new(entries.iter().map(|e| AccumulatedRow {
            date: e.timestamp_start.format("%m/%Y").to_string(),
            factor: format!("{:.8}", e.rate_percent),
            accumulated: format_factor_as_percent(e.rate_percent),
        }))
    } else {
        Table::new(entries.iter().map(|e| EntryRow {
            date: e.timestamp_start.format("%d/%m/%Y").to_string(),
            end_date: e.timestamp_end.format("%d/%m/%Y").to_string(),
            rate: format_rate(e.rate_percent),
        }))
    };
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    format!(
        "\n{} {} ({} entries)\n\n{}\n",
        "📈".cyan().bold(),
        title.bold(),
        entries.len(),
        table
    )
}

pub fn format_month(month: u32, year: i32, rate: Option<Decimal>, json: bool) -> String {
    if json {
        #[derive(Serialize)]
        struct JsonMonth {
            month: u32,
            year: i32,
            rate: Option<String>,
        }
        return to_json(&JsonMonth {
            month,
            year,
            rate: rate.map(|r| r.to_string()),
        });
    }

    match rate {
        Some(r) => format!("Poupança {:02}/{}: {}", month, year, format_rate(r).green().bold()),
        None => format!(
            "{} No published Poupança rate for {:02}/{}",
            "ℹ".blue().bold(),
            month,
            year
        ),
    }
}

pub fn format_stats(average: Decimal, accumulated: Decimal, months: usize, json: bool) -> String {
    if json {
        #[derive(Serialize)]
        struct JsonStats {
            months: usize,
            monthly_average: String,
            accumulated_factor: String,
        }
        return to_json(&JsonStats {
            months,
            monthly_average: average.to_string(),
            accumulated_factor: accumulated.to_string(),
        });
    }

    let mut output = format!("\n{} Poupança - last 12 months\n\n", "📊".cyan().bold());
    output.push_str(&format!("  Monthly average:  {}\n", format_rate(average)));
    output.push_str(&format!(
        "  Accumulated:      {}\n",
        format_factor_as_percent(accumulated).green().bold()
    ));
    if months < 12 {
        output.push_str(&format!(
            "  {} only {} months available\n",
            "⚠".yellow().bold(),
            months
        ));
    }
    output
}

pub struct CorrectionReport {
    pub amount: Decimal,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub anniversaries: Vec<NaiveDate>,
    pub corrected: Decimal,
}

pub fn format_correction(report: &CorrectionReport, json: bool) -> String {
    if json {
        #[derive(Serialize)]
        struct JsonCorrection<'a> {
            amount: String,
            from: NaiveDate,
            to: NaiveDate,
            anniversaries: &'a [NaiveDate],
            corrected: String,
        }
        return to_json(&JsonCorrection {
            amount: report.amount.to_string(),
            from: report.from,
            to: report.to,
            anniversaries: &report.anniversaries,
            corrected: report.corrected.to_string(),
        });
    }

    let mut output = format!("\n{} Poupança correction\n\n", "💰".cyan().bold());
    output.push_str(&format!("  Amount:         {}\n", format_currency(report.amount)));
    output.push_str(&format!(
        "  Period:         {} to {}\n",
        report.from.format("%d/%m/%Y"),
        report.to.format("%d/%m/%Y")
    ));
    output.push_str(&format!("  Anniversaries:  {}\n", report.anniversaries.len()));
    output.push_str(&format!(
        "  Corrected:      {}\n",
        format_currency(report.corrected).green().bold()
    ));
    output
}
