use crossterm::style::{style, Stylize};
use flightdesk_core::{BookingReceipt, Flight, Passenger};

/// Emphasis applied to a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Success,
    Warning,
    Error,
}

/// Applies colour to console text when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let content = style(text);
        match tone {
            Tone::Heading => content.bold().cyan().to_string(),
            Tone::Success => content.green().to_string(),
            Tone::Warning => content.yellow().to_string(),
            Tone::Error => content.red().to_string(),
        }
    }
}

pub fn flight_line(flight: &Flight, seats_left: u32) -> String {
    format!("{flight}, Available Seats: {seats_left}")
}

pub fn passenger_line(passenger: &Passenger) -> String {
    passenger.to_string()
}

pub fn receipt_line(receipt: &BookingReceipt) -> String {
    let passenger = &receipt.reservation.passenger;
    format!(
        "Booking successful. Passenger: {}, Email: {}, Flight ID: {}, Available Seats: {}, Amount due: {}, Reservation code: {}",
        passenger.full_name(),
        passenger.email,
        receipt.reservation.flight_id,
        receipt.seats_left,
        receipt.amount_due,
        passenger.reservation_code
    )
}
