mod cli;
mod dispatcher;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use indicatif::{ProgressBar, ProgressStyle};
use poupanca::config::Config;
use poupanca::fetch::{BcbClient, FeedSource, LoadPhase};
use poupanca::SeriesStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable (tables/JSON)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let store = Arc::new(SeriesStore::new());
    let source = match &cli.input {
        Some(path) => FeedSource::File(path.clone()),
        None => {
            let config = Config::load(cli.config.as_deref())?;
            FeedSource::Bcb(BcbClient::new(&config)?)
        }
    };

    let mut phase = LoadPhase::new();
    phase.register("poupanca", source.clone(), Arc::clone(&store));

    let spinner = matches!(source, FeedSource::Bcb(_)).then(fetch_spinner);
    let loaded = phase.run().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let count = loaded?;
    debug!("Load phase finished with {} records", count);

    let output = dispatcher::dispatch(&cli.command, &store, cli.json)?;
    println!("{}", output);
    Ok(())
}

fn fetch_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Fetching Poupança series from BCB...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
