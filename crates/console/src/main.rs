mod app;
mod render;

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io,
};

use flightdesk_core::{
    config::{self, AppConfig},
    open_engine,
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::app::FlightDeskConsole;

fn main() -> Result<()> {
    init_logging()?;

    if let Err(err) = config::ensure_default_config() {
        tracing::warn!("could not write default config: {err:#}");
    }
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err:#}. Using defaults.");
            AppConfig::default()
        }
    };

    let (engine, report) = open_engine(&config);
    tracing::info!(
        "startup loaded {} records with {} issues",
        report.loaded,
        report.issues.len()
    );

    let stdin = io::stdin();
    let mut console = FlightDeskConsole::new(engine, stdin.lock(), io::stdout(), config.color);
    console.report_load(&report)?;
    console.run()?;

    tracing::info!(
        "exiting with {} reservations held",
        console.engine().reservations().len()
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("flightdesk.log");

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || -> Box<dyn io::Write> {
            match OpenOptions::new().create(true).append(true).open(&log_path) {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
