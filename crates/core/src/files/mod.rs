//! Flat-file sources and the reservation journal.

/// Append-only persistence of new reservations.
pub mod journal;
/// Line-oriented flight and reservation readers.
pub mod loader;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{
    booking::BookingEngine,
    config::AppConfig,
    error::DataError,
    store::{FlightStore, ReservationStore},
};

pub use journal::{encode_reservation, FileJournal, MemoryJournal, ReservationJournal};
pub use loader::{load_flights, load_reservations, parse_flight_line, parse_reservation_line};

/// A problem found while loading, tied to the file and line it came from.
#[derive(Debug)]
pub struct LoadIssue {
    /// File being read.
    pub path: PathBuf,
    /// 1-based line number, or `None` when the whole file was affected.
    pub line_number: Option<usize>,
    /// What went wrong.
    pub error: DataError,
}

impl LoadIssue {
    fn file(path: &Path, error: DataError) -> Self {
        Self {
            path: path.to_path_buf(),
            line_number: None,
            error,
        }
    }

    fn line(path: &Path, line_number: usize, error: DataError) -> Self {
        Self {
            path: path.to_path_buf(),
            line_number: Some(line_number),
            error,
        }
    }
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(line) => write!(f, "{}:{line}: {}", self.path.display(), self.error),
            None => write!(f, "{}: {}", self.path.display(), self.error),
        }
    }
}

/// Outcome of reading one or more source files.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records that made it into a store.
    pub loaded: usize,
    /// Lines or files that were skipped.
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// Whether nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.issues.extend(other.issues);
    }

    fn push(&mut self, issue: LoadIssue) {
        warn!("{issue}");
        self.issues.push(issue);
    }
}

/// Load both source files named by `config` and build an engine that
/// journals new reservations to the reservation file.
///
/// Never fails: whatever could be read is loaded and everything else is
/// returned in the report.
pub fn open_engine(config: &AppConfig) -> (BookingEngine<FileJournal>, LoadReport) {
    let mut flights = FlightStore::new();
    let mut reservations = ReservationStore::new();

    let mut report = load_flights(&config.flights_path, &mut flights);
    report.merge(load_reservations(
        &config.reservations_path,
        &flights,
        &mut reservations,
    ));

    let journal = FileJournal::new(&config.reservations_path);
    (
        BookingEngine::new(flights, reservations, journal),
        report,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn opens_engine_from_configured_files() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig {
            flights_path: dir.path().join("flights.txt"),
            reservations_path: dir.path().join("passengers.txt"),
            color: false,
        };
        fs::write(
            &config.flights_path,
            "101,15-03-2020,Warsaw,London,2,250.50\n102,01-01-2019,Oslo,Rome,1,99.99\n",
        )?;
        fs::write(
            &config.reservations_path,
            "Anna,Nowak,anna@example.com,code-a,102\nJan,Kos,jan@example.com,code-b,555\n",
        )?;

        let (engine, report) = open_engine(&config);

        assert_eq!(report.loaded, 3);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].to_string(),
            format!(
                "{}:2: reservation code-b references unknown flight 555",
                config.reservations_path.display()
            )
        );
        assert_eq!(engine.available_seats(101), Some(2));
        assert_eq!(engine.available_seats(102), Some(0));
        assert_eq!(engine.journal().path(), config.reservations_path.as_path());
        Ok(())
    }
}
