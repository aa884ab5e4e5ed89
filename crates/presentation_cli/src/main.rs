//! Homelab CLI
//!
//! Calendar, task, briefing and almanac commands against a CalDAV server.
//! Results are printed as pretty JSON on stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, init_logging};

use crate::cli::{Cli, log_filter_from_verbosity};
use crate::commands::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("failed to load config")?;
    init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))?;

    let app = App::connect(config.caldav()?)?;
    let output = app.run(cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
