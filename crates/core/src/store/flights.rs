use std::ops::{Deref, DerefMut};

use crate::models::Flight;

use super::{RecordStore, SeatLedger};

/// Flight table with the route and price queries used by the operator.
#[derive(Debug, Clone, Default)]
pub struct FlightStore {
    records: RecordStore<Flight>,
}

impl FlightStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// First flight carrying `flight_id`.
    pub fn find(&self, flight_id: u32) -> Option<&Flight> {
        self.records
            .iter()
            .find(|flight| flight.flight_id == flight_id)
    }

    /// Seats left on `flight`, given the seats `ledger` says are held.
    pub fn seats_left(flight: &Flight, ledger: &impl SeatLedger) -> u32 {
        flight
            .seat_capacity
            .saturating_sub(ledger.held_seats(flight.flight_id))
    }

    /// Flights leaving `city` (case-insensitive) that still have a free seat.
    pub fn search_by_departure(&self, city: &str, ledger: &impl SeatLedger) -> Vec<&Flight> {
        self.search(ledger, |flight| {
            flight.departure_city.to_lowercase() == city.to_lowercase()
        })
    }

    /// Flights landing in `city` (case-insensitive) that still have a free seat.
    pub fn search_by_destination(&self, city: &str, ledger: &impl SeatLedger) -> Vec<&Flight> {
        self.search(ledger, |flight| {
            flight.destination_city.to_lowercase() == city.to_lowercase()
        })
    }

    /// Cargo flights leaving `city` that still have a free seat.
    pub fn search_cargo_by_departure(&self, city: &str, ledger: &impl SeatLedger) -> Vec<&Flight> {
        self.search(ledger, |flight| {
            flight.is_cargo() && flight.departure_city.to_lowercase() == city.to_lowercase()
        })
    }

    /// All flights, cheapest first. Flights with equal prices keep store order.
    pub fn sort_by_price(&self) -> Vec<&Flight> {
        let mut flights: Vec<&Flight> = self.records.iter().collect();
        flights.sort_by(|a, b| a.price.cmp(&b.price));
        flights
    }

    /// Seats left on the flight with `flight_id`, or `None` for an unknown id.
    pub fn available_seats(&self, flight_id: u32, ledger: &impl SeatLedger) -> Option<u32> {
        self.find(flight_id)
            .map(|flight| Self::seats_left(flight, ledger))
    }

    fn search<L, P>(&self, ledger: &L, predicate: P) -> Vec<&Flight>
    where
        L: SeatLedger,
        P: Fn(&Flight) -> bool,
    {
        self.records
            .iter()
            .filter(|flight| predicate(*flight) && Self::seats_left(*flight, ledger) > 0)
            .collect()
    }
}

impl Deref for FlightStore {
    type Target = RecordStore<Flight>;

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl DerefMut for FlightStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.records
    }
}
