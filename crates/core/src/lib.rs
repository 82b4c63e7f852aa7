#![warn(clippy::all, missing_docs)]

//! Core domain logic for the flightdesk booking console.
//!
//! This crate hosts the flight and reservation models, the in-memory
//! record stores, the booking engine, flat-file loading and the
//! reservation journal, and configuration handling used by the console
//! and any future frontends.

pub mod booking;
pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod store;

pub use booking::{BookingEngine, BookingReceipt, JournalOutcome, SharedBookingEngine};
pub use config::AppConfig;
pub use error::{BookingError, BookingResult, DataError};
pub use files::{open_engine, FileJournal, LoadIssue, LoadReport, MemoryJournal, ReservationJournal};
pub use models::{Flight, FlightKind, Passenger, PassengerDetails, Reservation};
pub use store::{FlightStore, RecordStore, ReservationStore, SeatLedger};
