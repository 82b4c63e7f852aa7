use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::debug;

use crate::models::Reservation;

/// Durable sink that records each new reservation.
pub trait ReservationJournal {
    /// Record `reservation`. Failures are reported to the caller, who decides
    /// whether to surface them.
    fn append(&self, reservation: &Reservation) -> Result<()>;
}

/// Format a reservation as a reservation-file line (without newline).
pub fn encode_reservation(reservation: &Reservation) -> String {
    let passenger = &reservation.passenger;
    format!(
        "{},{},{},{},{}",
        passenger.first_name,
        passenger.last_name,
        passenger.email,
        passenger.reservation_code,
        reservation.flight_id
    )
}

/// Appends reservations to the reservation file, one line each.
///
/// Lines are never rewritten or removed; cancelling a reservation leaves
/// its line in place.
#[derive(Debug, Clone)]
pub struct FileJournal {
    path: PathBuf,
}

impl FileJournal {
    /// Journal writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the reservation file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReservationJournal for FileJournal {
    fn append(&self, reservation: &Reservation) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{}", encode_reservation(reservation))
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        debug!(
            "appended reservation {} to {}",
            reservation.code(),
            self.path.display()
        );
        Ok(())
    }
}

/// Journal that keeps appended lines in memory.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    lines: Mutex<Vec<String>>,
}

impl MemoryJournal {
    /// Empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl ReservationJournal for MemoryJournal {
    fn append(&self, reservation: &Reservation) -> Result<()> {
        self.lines.lock().push(encode_reservation(reservation));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Passenger;
    use tempfile::tempdir;

    fn sample_reservation(code: &str) -> Reservation {
        Reservation {
            reservation_id: 1,
            passenger: Passenger {
                first_name: "Jan".to_string(),
                last_name: "Kowalski".to_string(),
                email: "jan@example.com".to_string(),
                reservation_code: code.to_string(),
            },
            flight_id: 101,
        }
    }

    #[test]
    fn appends_one_line_per_reservation() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data").join("passengers.txt");
        let journal = FileJournal::new(&path);

        journal.append(&sample_reservation("a1"))?;
        journal.append(&sample_reservation("b2"))?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(
            content,
            "Jan,Kowalski,jan@example.com,a1,101\nJan,Kowalski,jan@example.com,b2,101\n"
        );
        Ok(())
    }

    #[test]
    fn append_reports_unwritable_target() -> Result<()> {
        let dir = tempdir()?;
        // A directory cannot be opened for appending.
        let journal = FileJournal::new(dir.path());
        assert!(journal.append(&sample_reservation("a1")).is_err());
        Ok(())
    }

    #[test]
    fn memory_journal_records_lines() -> Result<()> {
        let journal = MemoryJournal::new();
        journal.append(&sample_reservation("x"))?;
        assert_eq!(journal.lines(), vec!["Jan,Kowalski,jan@example.com,x,101"]);
        Ok(())
    }
}
