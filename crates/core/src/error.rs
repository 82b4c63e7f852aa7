#![allow(missing_docs)]

//! Error kinds reported by the loaders and the booking engine.

use std::path::PathBuf;

use thiserror::Error;

/// Problems found while reading the flat data files.
///
/// None of these abort a load: the offending line is skipped and the
/// error is collected into a [`LoadReport`](crate::files::LoadReport).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot find file {0}")]
    FileNotFound(PathBuf),

    #[error("malformed line: {0}")]
    MalformedLine(String),

    #[error("flight {0} is already defined")]
    DuplicateFlight(u32),

    #[error("reservation {code} references unknown flight {flight_id}")]
    UnknownFlight { flight_id: u32, code: String },

    #[error("reservation {code} exceeds the seat capacity of flight {flight_id}")]
    FlightFull { flight_id: u32, code: String },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Booking and cancellation outcomes that are not successes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("flight {0} does not exist")]
    UnknownFlight(u32),

    #[error("flight {0} has no available seats")]
    NoSeatsAvailable(u32),

    #[error("no reservation {code} on flight {flight_id}")]
    ReservationNotFound { flight_id: u32, code: String },

    #[error("{field} may not contain commas or line breaks")]
    InvalidPassengerDetails { field: &'static str },
}

/// Result alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;
