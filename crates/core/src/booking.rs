//! Seat booking and cancellation.
//!
//! The reservation store is the single record of who holds a seat. Passenger
//! lists and remaining seats are computed from it on demand, so a booking or
//! cancellation is one insertion or removal and cannot leave the flight and
//! the reservation table disagreeing.

use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{BookingError, BookingResult},
    files::ReservationJournal,
    models::{Flight, Passenger, PassengerDetails, Reservation},
    store::{FlightStore, ReservationStore},
};

/// Whether a new reservation reached durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalOutcome {
    /// The reservation line was written.
    Appended,
    /// Writing failed. The booking still stands in memory.
    Failed {
        /// Error text from the journal.
        reason: String,
    },
}

/// Result of a successful booking.
#[derive(Debug, Clone)]
pub struct BookingReceipt {
    /// The reservation now held.
    pub reservation: Reservation,
    /// Amount the passenger pays: the flight's price.
    pub amount_due: Decimal,
    /// Seats still free on the flight after this booking.
    pub seats_left: u32,
    /// Outcome of journaling the reservation.
    pub journal: JournalOutcome,
}

/// Coordinates seat availability, reservations and the journal.
#[derive(Debug)]
pub struct BookingEngine<J> {
    flights: FlightStore,
    reservations: ReservationStore,
    journal: J,
}

impl<J: ReservationJournal> BookingEngine<J> {
    /// Assemble an engine from loaded stores.
    pub fn new(flights: FlightStore, reservations: ReservationStore, journal: J) -> Self {
        Self {
            flights,
            reservations,
            journal,
        }
    }

    /// Flight table.
    pub fn flights(&self) -> &FlightStore {
        &self.flights
    }

    /// Reservation table.
    pub fn reservations(&self) -> &ReservationStore {
        &self.reservations
    }

    /// Journal receiving new reservations.
    pub fn journal(&self) -> &J {
        &self.journal
    }

    /// First flight with `flight_id`.
    pub fn flight(&self, flight_id: u32) -> Option<&Flight> {
        self.flights.find(flight_id)
    }

    /// Free seats on `flight_id`, `None` if there is no such flight.
    pub fn available_seats(&self, flight_id: u32) -> Option<u32> {
        self.flights.available_seats(flight_id, &self.reservations)
    }

    /// Passengers currently holding a seat on `flight_id`.
    pub fn passengers(&self, flight_id: u32) -> Vec<&Passenger> {
        self.reservations.passengers_for(flight_id)
    }

    /// Open flights leaving `city`, case-insensitive.
    pub fn search_by_departure(&self, city: &str) -> Vec<&Flight> {
        self.flights.search_by_departure(city, &self.reservations)
    }

    /// Open flights landing in `city`, case-insensitive.
    pub fn search_by_destination(&self, city: &str) -> Vec<&Flight> {
        self.flights.search_by_destination(city, &self.reservations)
    }

    /// Open cargo flights leaving `city`.
    pub fn search_cargo_by_departure(&self, city: &str) -> Vec<&Flight> {
        self.flights
            .search_cargo_by_departure(city, &self.reservations)
    }

    /// All flights, cheapest first.
    pub fn sort_by_price(&self) -> Vec<&Flight> {
        self.flights.sort_by_price()
    }

    /// Book one seat on `flight_id` for the given passenger.
    ///
    /// The reservation is appended to the journal after it is recorded in
    /// memory. A journal failure is reported in the receipt and logged but the
    /// booking is kept. Details are trimmed, and a field holding a comma or a
    /// line break is rejected before anything is recorded.
    pub fn book(
        &mut self,
        flight_id: u32,
        details: PassengerDetails,
    ) -> BookingResult<BookingReceipt> {
        let details = details.normalized()?;
        let flight = self
            .flights
            .find(flight_id)
            .ok_or(BookingError::UnknownFlight(flight_id))?;
        let seats = FlightStore::seats_left(flight, &self.reservations);
        if seats == 0 {
            return Err(BookingError::NoSeatsAvailable(flight_id));
        }
        let amount_due = flight.price;

        let code = Uuid::new_v4().to_string();
        let reservation = Reservation {
            reservation_id: self.reservations.next_reservation_id(),
            passenger: Passenger::from_details(details, code),
            flight_id,
        };
        self.reservations.create(reservation.clone());
        info!(
            "booked flight {flight_id} for {} ({})",
            reservation.passenger.full_name(),
            reservation.code()
        );

        let journal = match self.journal.append(&reservation) {
            Ok(()) => JournalOutcome::Appended,
            Err(err) => {
                warn!("reservation {} not journaled: {err:#}", reservation.code());
                JournalOutcome::Failed {
                    reason: format!("{err:#}"),
                }
            }
        };

        Ok(BookingReceipt {
            reservation,
            amount_due,
            seats_left: seats - 1,
            journal,
        })
    }

    /// Cancel the reservation on `flight_id` whose passenger holds `code`.
    ///
    /// The journal is not touched: the cancelled line stays in the
    /// reservation file and comes back on the next load.
    pub fn cancel(&mut self, flight_id: u32, code: &str) -> BookingResult<Reservation> {
        let reservation = self
            .reservations
            .find_by_code(flight_id, code)
            .cloned()
            .ok_or_else(|| BookingError::ReservationNotFound {
                flight_id,
                code: code.to_string(),
            })?;
        self.reservations.delete(&reservation);
        info!("cancelled reservation {code} on flight {flight_id}");
        Ok(reservation)
    }
}

/// Cloneable, thread-safe handle around a [`BookingEngine`].
///
/// Every call takes the engine lock for its whole duration, so the seat check
/// and the reservation insert of a booking happen as one step.
pub struct SharedBookingEngine<J> {
    inner: Arc<Mutex<BookingEngine<J>>>,
}

impl<J> Clone for SharedBookingEngine<J> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<J: ReservationJournal> SharedBookingEngine<J> {
    /// Wrap an engine for shared use.
    pub fn new(engine: BookingEngine<J>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// See [`BookingEngine::book`].
    pub fn book(&self, flight_id: u32, details: PassengerDetails) -> BookingResult<BookingReceipt> {
        self.inner.lock().book(flight_id, details)
    }

    /// See [`BookingEngine::cancel`].
    pub fn cancel(&self, flight_id: u32, code: &str) -> BookingResult<Reservation> {
        self.inner.lock().cancel(flight_id, code)
    }

    /// See [`BookingEngine::available_seats`].
    pub fn available_seats(&self, flight_id: u32) -> Option<u32> {
        self.inner.lock().available_seats(flight_id)
    }

    /// Owned copy of the passengers on `flight_id`.
    pub fn passengers(&self, flight_id: u32) -> Vec<Passenger> {
        self.inner
            .lock()
            .passengers(flight_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut BookingEngine<J>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
