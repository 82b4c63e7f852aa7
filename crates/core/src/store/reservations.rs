use std::ops::Deref;

use crate::models::{Passenger, Reservation};

use super::RecordStore;

/// Source of truth for how many seats are held on a flight.
pub trait SeatLedger {
    /// Seats currently held on `flight_id`.
    fn held_seats(&self, flight_id: u32) -> u32;
}

/// Reservation table. Passenger lists and seat counts are projected from it.
#[derive(Debug, Clone, Default)]
pub struct ReservationStore {
    records: RecordStore<Reservation>,
    highest_id: u64,
}

impl ReservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reservation and remember its id.
    pub fn create(&mut self, reservation: Reservation) {
        self.highest_id = self.highest_id.max(reservation.reservation_id);
        self.records.create(reservation);
    }

    /// Remove the first reservation equal to `reservation`. No-op when absent.
    pub fn delete(&mut self, reservation: &Reservation) {
        self.records.delete(reservation);
    }

    /// Passengers holding a seat on `flight_id`, in booking order.
    pub fn passengers_for(&self, flight_id: u32) -> Vec<&Passenger> {
        self.for_flight(flight_id)
            .map(|reservation| &reservation.passenger)
            .collect()
    }

    /// Reservations held on `flight_id`, in booking order.
    pub fn for_flight(&self, flight_id: u32) -> impl Iterator<Item = &Reservation> + '_ {
        self.records
            .iter()
            .filter(move |reservation| reservation.flight_id == flight_id)
    }

    /// The reservation on `flight_id` whose passenger carries `code`.
    ///
    /// A matching code on any other flight is not returned.
    pub fn find_by_code(&self, flight_id: u32, code: &str) -> Option<&Reservation> {
        self.for_flight(flight_id)
            .find(|reservation| reservation.code() == code)
    }

    /// Id to hand to the next reservation entering the store.
    ///
    /// Ids of removed reservations are never handed out again.
    pub fn next_reservation_id(&self) -> u64 {
        self.highest_id + 1
    }
}

impl SeatLedger for ReservationStore {
    fn held_seats(&self, flight_id: u32) -> u32 {
        self.for_flight(flight_id).count() as u32
    }
}

impl Deref for ReservationStore {
    type Target = RecordStore<Reservation>;

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}
