//! Application configuration.
//!
//! Values are layered: built-in defaults, then
//! `~/.config/flightdesk/config.toml`, then `FLIGHTDESK_*` environment
//! variables (for example `FLIGHTDESK_FLIGHTS_PATH`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Directory under the user's config root holding `config.toml`.
pub const CONFIG_DIR: &str = "flightdesk";
/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "FLIGHTDESK";

const DEFAULT_FLIGHTS_PATH: &str = "flights.txt";
const DEFAULT_RESERVATIONS_PATH: &str = "passengers.txt";

const DEFAULT_CONFIG: &str = r#"# flightdesk configuration

# Flight source: flightId,dd-MM-yyyy,departure,destination,seats,price
flights_path = "flights.txt"

# Reservation source; new bookings are appended here.
reservations_path = "passengers.txt"

# Colour console output.
color = true
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Flight source file.
    pub flights_path: PathBuf,
    /// Reservation source file and booking journal.
    pub reservations_path: PathBuf,
    /// Whether the console colours its output.
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            flights_path: PathBuf::from(DEFAULT_FLIGHTS_PATH),
            reservations_path: PathBuf::from(DEFAULT_RESERVATIONS_PATH),
            color: true,
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path` (optional on disk) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("flights_path", DEFAULT_FLIGHTS_PATH)?
            .set_default("reservations_path", DEFAULT_RESERVATIONS_PATH)?
            .set_default("color", true)?
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("invalid configuration")?;
        info!(
            "using flights {} and reservations {}",
            config.flights_path.display(),
            config.reservations_path.display()
        );
        Ok(config)
    }
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the default config file unless one already exists.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(&config_path())
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}
