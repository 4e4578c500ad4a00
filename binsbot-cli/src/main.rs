//! Command-line front-end that prints the bin collection schedule for one property.

mod cli;
mod logging;
mod output;

use std::io::{self, Write};

use anyhow::{Context, Result};
use binsbot_core::service::first_on_or_after;
use binsbot_provider_bedford as bedford;
use chrono::Utc;
use clap::Parser;
use reqwest::Client;
use tracing::debug;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::setup_logging(args.log_level)?;

    // HTTP + service setup
    let client = Client::builder().build()?;
    let config = args.bedford_config();
    let timezone = config.timezone;
    let service = bedford::service(client, config);

    let lookup = match args.deadline() {
        Some(deadline) => service.collections_within(args.uprn, deadline).await,
        None => service.collections(args.uprn).await,
    };
    let collections =
        lookup.with_context(|| format!("Failed to load collections for UPRN {}", args.uprn))?;
    debug!(count = collections.len(), "collections loaded");

    let today = Utc::now().with_timezone(&timezone).date_naive();
    let mut stdout = io::stdout().lock();

    if args.next {
        match first_on_or_after(&collections, today) {
            Some(collection) => output::write_collection(&mut stdout, collection, today)?,
            None => writeln!(stdout, "No upcoming collections.")?,
        }
    } else {
        output::write_schedule(&mut stdout, &collections, today)?;
    }

    Ok(())
}
