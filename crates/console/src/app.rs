use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use flightdesk_core::{
    BookingEngine, Flight, FlightStore, JournalOutcome, LoadReport, PassengerDetails,
    ReservationJournal,
};
use tracing::{debug, info};

use crate::render::{self, Painter, Tone};

const FLIGHT_PROMPT: &str =
    "\nEnter a flight ID to book or cancel a seat (or: from <city>, to <city>, sort, exit): ";
const ACTION_PROMPT: &str = "Book (B), cancel (C) a seat, or exit (E)? ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Line-oriented operator loop over any input and output stream.
pub struct FlightDeskConsole<R, W, J> {
    engine: BookingEngine<J>,
    input: R,
    output: W,
    painter: Painter,
}

impl<R: BufRead, W: Write, J: ReservationJournal> FlightDeskConsole<R, W, J> {
    pub fn new(engine: BookingEngine<J>, input: R, output: W, color: bool) -> Self {
        Self {
            engine,
            input,
            output,
            painter: Painter::new(color),
        }
    }

    pub fn engine(&self) -> &BookingEngine<J> {
        &self.engine
    }

    /// Print startup load problems once.
    pub fn report_load(&mut self, report: &LoadReport) -> Result<()> {
        for issue in &report.issues {
            self.say(&issue.to_string(), Tone::Warning)?;
        }
        Ok(())
    }

    /// Run until the operator exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.say("\nAvailable flights:", Tone::Heading)?;
            let lines = self.flight_lines(self.engine.flights().read().iter().collect());
            self.print_lines(&lines)?;

            let Some(answer) = self.prompt(FLIGHT_PROMPT)? else {
                break;
            };
            if self.dispatch(&answer)? == Flow::Exit {
                break;
            }
        }
        info!("console loop finished");
        Ok(())
    }

    fn dispatch(&mut self, answer: &str) -> Result<Flow> {
        let answer = answer.trim();
        let (command, argument) = match answer.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (answer, ""),
        };

        match command.to_lowercase().as_str() {
            "exit" | "quit" => {
                self.say("Closing application. Thank you!", Tone::Heading)?;
                Ok(Flow::Exit)
            }
            "from" if !argument.is_empty() => {
                let lines = self.flight_lines(self.engine.search_by_departure(argument));
                self.show_results(&format!("Open flights from {argument}:"), &lines)?;
                Ok(Flow::Continue)
            }
            "to" if !argument.is_empty() => {
                let lines = self.flight_lines(self.engine.search_by_destination(argument));
                self.show_results(&format!("Open flights to {argument}:"), &lines)?;
                Ok(Flow::Continue)
            }
            "sort" => {
                let lines = self.flight_lines(self.engine.sort_by_price());
                self.show_results("Flights by price:", &lines)?;
                Ok(Flow::Continue)
            }
            _ => match answer.parse::<u32>() {
                Ok(flight_id) => self.select_flight(flight_id),
                Err(_) => {
                    debug!("rejected flight selection {answer:?}");
                    self.say("Invalid flight ID.", Tone::Error)?;
                    Ok(Flow::Continue)
                }
            },
        }
    }

    fn select_flight(&mut self, flight_id: u32) -> Result<Flow> {
        let Some(seats_left) = self.engine.available_seats(flight_id) else {
            self.say("Invalid flight ID.", Tone::Error)?;
            return Ok(Flow::Continue);
        };

        self.say(&format!("Passengers on flight {flight_id}:"), Tone::Heading)?;
        let passengers: Vec<String> = self
            .engine
            .passengers(flight_id)
            .into_iter()
            .map(render::passenger_line)
            .collect();
        let held = passengers.len();
        self.print_lines(&passengers)?;

        let Some(action) = self.prompt(ACTION_PROMPT)? else {
            return Ok(Flow::Exit);
        };
        match action.trim().to_uppercase().as_str() {
            "B" if seats_left > 0 => self.book(flight_id)?,
            "C" if held > 0 => self.cancel(flight_id)?,
            "E" => {
                self.say("Closing application. Thank you!", Tone::Heading)?;
                return Ok(Flow::Exit);
            }
            _ => self.say(
                "Invalid action, or no seats/reservations available.",
                Tone::Error,
            )?,
        }
        Ok(Flow::Continue)
    }

    fn book(&mut self, flight_id: u32) -> Result<()> {
        let Some(first_name) = self.prompt("First name: ")? else {
            return Ok(());
        };
        let Some(last_name) = self.prompt("Last name: ")? else {
            return Ok(());
        };
        let Some(email) = self.prompt("Email address: ")? else {
            return Ok(());
        };

        let details = PassengerDetails::new(first_name, last_name, email);
        match self.engine.book(flight_id, details) {
            Ok(receipt) => {
                self.say(&format!("\n{}", render::receipt_line(&receipt)), Tone::Success)?;
                if let JournalOutcome::Failed { reason } = &receipt.journal {
                    self.say(
                        &format!("Could not save the reservation to file: {reason}"),
                        Tone::Warning,
                    )?;
                }
            }
            Err(err) => self.say(&err.to_string(), Tone::Error)?,
        }
        Ok(())
    }

    fn cancel(&mut self, flight_id: u32) -> Result<()> {
        let Some(code) = self.prompt("Reservation code to cancel: ")? else {
            return Ok(());
        };
        match self.engine.cancel(flight_id, code.trim()) {
            Ok(_) => self.say("Reservation cancelled.", Tone::Success)?,
            Err(err) => {
                debug!("cancellation rejected: {err}");
                self.say(
                    "Invalid reservation code, or no reservation for that code.",
                    Tone::Error,
                )?
            }
        }
        Ok(())
    }

    fn flight_lines(&self, flights: Vec<&Flight>) -> Vec<String> {
        flights
            .into_iter()
            .map(|flight| {
                let seats = FlightStore::seats_left(flight, self.engine.reservations());
                render::flight_line(flight, seats)
            })
            .collect()
    }

    fn show_results(&mut self, heading: &str, lines: &[String]) -> Result<()> {
        self.say(heading, Tone::Heading)?;
        if lines.is_empty() {
            self.say("No matching flights.", Tone::Warning)?;
        }
        self.print_lines(lines)
    }

    fn print_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.output, "{line}").context("failed to write to console")?;
        }
        Ok(())
    }

    fn say(&mut self, text: &str, tone: Tone) -> Result<()> {
        let painted = self.painter.paint(text, tone);
        writeln!(self.output, "{painted}").context("failed to write to console")
    }

    /// Show `text` and read one line. `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}").context("failed to write to console")?;
        self.output.flush().context("failed to flush console")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read console input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use flightdesk_core::{MemoryJournal, ReservationStore};
    use rust_decimal::Decimal;

    use super::*;

    fn engine() -> BookingEngine<MemoryJournal> {
        let mut flights = FlightStore::new();
        flights.create(Flight::new(
            101,
            NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(),
            "Warsaw",
            "London",
            2,
            Decimal::new(25050, 2),
        ));
        flights.create(Flight::new(
            102,
            NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
            "Berlin",
            "Paris",
            1,
            Decimal::new(9999, 2),
        ));
        BookingEngine::new(flights, ReservationStore::new(), MemoryJournal::new())
    }

    fn run_script(
        engine: BookingEngine<MemoryJournal>,
        script: &str,
    ) -> Result<(BookingEngine<MemoryJournal>, String)> {
        let mut output = Vec::new();
        let engine = {
            let mut console =
                FlightDeskConsole::new(engine, Cursor::new(script.to_string()), &mut output, false);
            console.run()?;
            console.engine
        };
        Ok((engine, String::from_utf8(output)?))
    }

    #[test]
    fn lists_flights_and_exits_at_end_of_input() -> Result<()> {
        let (_, output) = run_script(engine(), "")?;
        assert!(output.contains("Available flights:"));
        assert!(output.contains(
            "Flight ID: 101, Departure: Warsaw, Destination: London, Manufacture Date: 15-03-2020, Price: 250.50, Available Seats: 2"
        ));
        Ok(())
    }

    #[test]
    fn books_a_seat_through_prompts() -> Result<()> {
        let (engine, output) = run_script(
            engine(),
            "101\nb\nAnna\nNowak\nanna@example.com\n101\ne\n",
        )?;

        assert_eq!(engine.available_seats(101), Some(1));
        assert_eq!(engine.journal().lines().len(), 1);
        assert!(output.contains("Booking successful. Passenger: Anna Nowak"));
        assert!(output.contains("Amount due: 250.50"));
        assert!(output.contains("Closing application. Thank you!"));
        Ok(())
    }

    #[test]
    fn cancels_by_reservation_code() -> Result<()> {
        let mut engine = engine();
        let receipt = engine.book(102, PassengerDetails::new("Jan", "Kos", "jan@example.com"))?;
        let code = receipt.reservation.code().to_string();

        let script = format!("102\nC\nwrong-code\n102\nC\n{code}\nexit\n");
        let (engine, output) = run_script(engine, &script)?;

        assert!(output.contains("Invalid reservation code"));
        assert!(output.contains("Reservation cancelled."));
        assert_eq!(engine.available_seats(102), Some(1));
        assert!(engine.passengers(102).is_empty());
        Ok(())
    }

    #[test]
    fn rejects_bad_input_and_keeps_going() -> Result<()> {
        let (engine, output) = run_script(engine(), "abc\n999\n101\nX\n101\nC\nexit\n")?;
        assert_eq!(output.matches("Invalid flight ID.").count(), 2);
        // Unknown letter, then cancel with no passengers.
        assert_eq!(
            output
                .matches("Invalid action, or no seats/reservations available.")
                .count(),
            2
        );
        assert!(engine.reservations().is_empty());
        Ok(())
    }

    #[test]
    fn commas_in_details_are_refused() -> Result<()> {
        let (engine, output) =
            run_script(engine(), "101\nB\nAnna,Maria\nNowak\na@example.com\nexit\n")?;
        assert!(output.contains("first name may not contain commas or line breaks"));
        assert!(engine.reservations().is_empty());
        assert!(engine.journal().lines().is_empty());
        Ok(())
    }

    #[test]
    fn full_flight_refuses_booking() -> Result<()> {
        let mut engine = engine();
        engine.book(102, PassengerDetails::new("Jan", "Kos", "jan@example.com"))?;
        let (engine, output) = run_script(engine, "102\nB\nexit\n")?;
        assert!(output.contains("Invalid action, or no seats/reservations available."));
        assert_eq!(engine.journal().lines().len(), 1);
        Ok(())
    }

    #[test]
    fn search_and_sort_commands() -> Result<()> {
        let (_, output) = run_script(engine(), "from WARSAW\nto nowhere\nsort\nexit\n")?;
        assert!(output.contains("Open flights from WARSAW:\nFlight ID: 101"));
        assert!(output.contains("Open flights to nowhere:\nNo matching flights."));
        assert!(output.contains("Flights by price:\nFlight ID: 102"));
        Ok(())
    }
}
