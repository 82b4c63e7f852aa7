//! Shared domain models.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};

/// Classification payload carried by a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlightKind {
    /// Ordinary passenger flight.
    #[default]
    Standard,
    /// Flight that also carries freight.
    Cargo {
        /// Freight capacity in tons.
        capacity_tons: f32,
        /// Kind of freight carried.
        cargo_type: String,
    },
    /// Flight sold with premium extras.
    Premium {
        /// Whether passengers get lounge access.
        lounge_access: bool,
        /// Extra on-board service offered.
        special_service: String,
    },
}

/// A scheduled route with a seat inventory and a price.
///
/// Seats remaining and the passenger list are not stored here; they are
/// derived from the reservations held against `flight_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Operator-facing identifier.
    pub flight_id: u32,
    /// Manufacture date of the aircraft flying the route.
    pub manufacture_date: NaiveDate,
    /// Aircraft brand, when known.
    pub brand: Option<String>,
    /// Aircraft model, when known.
    pub model: Option<String>,
    /// City the flight departs from.
    pub departure_city: String,
    /// City the flight lands in.
    pub destination_city: String,
    /// Seat count read from the flight source.
    pub seat_capacity: u32,
    /// Fare for a single seat.
    pub price: Decimal,
    /// Standard, cargo or premium classification.
    #[serde(default)]
    pub kind: FlightKind,
}

impl Flight {
    /// Build a standard flight without aircraft lineage details.
    pub fn new(
        flight_id: u32,
        manufacture_date: NaiveDate,
        departure_city: impl Into<String>,
        destination_city: impl Into<String>,
        seat_capacity: u32,
        price: Decimal,
    ) -> Self {
        Self {
            flight_id,
            manufacture_date,
            brand: None,
            model: None,
            departure_city: departure_city.into(),
            destination_city: destination_city.into(),
            seat_capacity,
            price,
            kind: FlightKind::Standard,
        }
    }

    /// Attach aircraft brand and model.
    pub fn with_aircraft(mut self, brand: impl Into<String>, model: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self.model = Some(model.into());
        self
    }

    /// Replace the classification payload.
    pub fn with_kind(mut self, kind: FlightKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this flight is classified as cargo.
    pub fn is_cargo(&self) -> bool {
        matches!(self.kind, FlightKind::Cargo { .. })
    }

    /// Label used as the leading field when the flight is displayed.
    pub fn label(&self) -> &'static str {
        match self.kind {
            FlightKind::Standard => "Flight ID",
            FlightKind::Cargo { .. } => "Cargo Flight ID",
            FlightKind::Premium { .. } => "Premium Flight ID",
        }
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, Departure: {}, Destination: {}, Manufacture Date: {}, Price: {}",
            self.label(),
            self.flight_id,
            self.departure_city,
            self.destination_city,
            self.manufacture_date.format("%d-%m-%Y"),
            self.price
        )?;
        match &self.kind {
            FlightKind::Standard => Ok(()),
            FlightKind::Cargo {
                capacity_tons,
                cargo_type,
            } => write!(
                f,
                ", Cargo Capacity: {capacity_tons} tons, Cargo Type: {cargo_type}"
            ),
            FlightKind::Premium {
                lounge_access,
                special_service,
            } => write!(
                f,
                ", Lounge Access: {}, Special Service: {special_service}",
                if *lounge_access { "yes" } else { "no" }
            ),
        }
    }
}

/// Contact details supplied by the operator when booking a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
}

impl PassengerDetails {
    /// Convenience constructor.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Trimmed copy, fit to be written as one reservation-file line.
    ///
    /// Fails when a field contains a comma or a control character such as a
    /// line break.
    pub fn normalized(self) -> BookingResult<Self> {
        Ok(Self {
            first_name: clean_field(self.first_name, "first name")?,
            last_name: clean_field(self.last_name, "last name")?,
            email: clean_field(self.email, "email")?,
        })
    }
}

fn clean_field(value: String, field: &'static str) -> BookingResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().any(|c| c == ',' || c.is_control()) {
        return Err(BookingError::InvalidPassengerDetails { field });
    }
    Ok(trimmed.to_string())
}

/// Seat holder, owned by exactly one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Globally unique code used to cancel the reservation.
    pub reservation_code: String,
}

impl Passenger {
    /// Attach a reservation code to operator-supplied details.
    pub fn from_details(details: PassengerDetails, reservation_code: impl Into<String>) -> Self {
        Self {
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            reservation_code: reservation_code.into(),
        }
    }

    /// "First Last" for messages.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "First name: {}, Last name: {}, Email: {}, Reservation code: {}",
            self.first_name, self.last_name, self.email, self.reservation_code
        )
    }
}

/// Binding of one passenger to one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Sequential id assigned when the reservation enters the store.
    pub reservation_id: u64,
    /// Seat holder owned by this reservation.
    pub passenger: Passenger,
    /// Key of the reserved flight; the flight itself lives in the flight store.
    pub flight_id: u32,
}

impl Reservation {
    /// Reservation code of the held passenger.
    pub fn code(&self) -> &str {
        &self.passenger.reservation_code
    }
}
