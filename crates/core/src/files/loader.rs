use std::{
    fs,
    io::ErrorKind,
    path::Path,
    str::FromStr,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    error::DataError,
    models::{Flight, Passenger, Reservation},
    store::{FlightStore, ReservationStore, SeatLedger},
};

use super::{LoadIssue, LoadReport};

const FLIGHT_FIELDS: usize = 6;
const RESERVATION_FIELDS: usize = 5;
const DATE_FORMAT: &str = "%d-%m-%Y";

/// Read flights from `path` into `flights`.
///
/// Each line is `flightId,dd-MM-yyyy,departure,destination,seats,price`.
/// Lines that do not parse, or that repeat an id already in `flights`, are
/// reported and skipped individually.
pub fn load_flights(path: &Path, flights: &mut FlightStore) -> LoadReport {
    let mut report = LoadReport::default();
    let content = match read_source(path) {
        Ok(Some(content)) => content,
        Ok(None) => {
            report.push(LoadIssue::file(
                path,
                DataError::FileNotFound(path.to_path_buf()),
            ));
            return report;
        }
        Err(err) => {
            report.push(LoadIssue::file(path, err));
            return report;
        }
    };

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_flight_line(line) {
            Ok(flight) if flights.find(flight.flight_id).is_some() => {
                report.push(LoadIssue::line(
                    path,
                    index + 1,
                    DataError::DuplicateFlight(flight.flight_id),
                ));
            }
            Ok(flight) => {
                flights.create(flight);
                report.loaded += 1;
            }
            Err(err) => report.push(LoadIssue::line(path, index + 1, err)),
        }
    }

    info!("loaded {} flights from {}", report.loaded, path.display());
    report
}

/// Read reservations from `path`, resolving each against `flights`.
///
/// Each line is `firstName,lastName,email,reservationCode,flightId`. A missing
/// file is treated as an empty one.
pub fn load_reservations(
    path: &Path,
    flights: &FlightStore,
    reservations: &mut ReservationStore,
) -> LoadReport {
    let mut report = LoadReport::default();
    let content = match read_source(path) {
        Ok(Some(content)) => content,
        Ok(None) => {
            info!("no reservation file at {}", path.display());
            return report;
        }
        Err(err) => {
            report.push(LoadIssue::file(path, err));
            return report;
        }
    };

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (passenger, flight_id) = match parse_reservation_line(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                report.push(LoadIssue::line(path, index + 1, err));
                continue;
            }
        };

        let Some(flight) = flights.find(flight_id) else {
            report.push(LoadIssue::line(
                path,
                index + 1,
                DataError::UnknownFlight {
                    flight_id,
                    code: passenger.reservation_code,
                },
            ));
            continue;
        };

        if reservations.held_seats(flight_id) >= flight.seat_capacity {
            report.push(LoadIssue::line(
                path,
                index + 1,
                DataError::FlightFull {
                    flight_id,
                    code: passenger.reservation_code,
                },
            ));
            continue;
        }

        let reservation_id = reservations.next_reservation_id();
        reservations.create(Reservation {
            reservation_id,
            passenger,
            flight_id,
        });
        report.loaded += 1;
    }

    info!("loaded {} reservations from {}", report.loaded, path.display());
    report
}

/// Parse one flight-file line.
pub fn parse_flight_line(line: &str) -> Result<Flight, DataError> {
    let fields = split_fields(line, FLIGHT_FIELDS)?;
    let flight_id = parse_field::<u32>(fields[0], "flight id")?;
    let manufacture_date = NaiveDate::parse_from_str(fields[1], DATE_FORMAT).map_err(|err| {
        DataError::MalformedLine(format!("invalid manufacture date '{}': {err}", fields[1]))
    })?;
    let seat_capacity = parse_field::<u32>(fields[4], "seat count")?;
    let price = Decimal::from_str(fields[5])
        .map_err(|err| DataError::MalformedLine(format!("invalid price '{}': {err}", fields[5])))?;
    if price.is_sign_negative() {
        return Err(DataError::MalformedLine(format!(
            "negative price '{}'",
            fields[5]
        )));
    }

    Ok(Flight::new(
        flight_id,
        manufacture_date,
        fields[2],
        fields[3],
        seat_capacity,
        price,
    ))
}

/// Parse one reservation-file line into its passenger and flight id.
pub fn parse_reservation_line(line: &str) -> Result<(Passenger, u32), DataError> {
    let fields = split_fields(line, RESERVATION_FIELDS)?;
    let flight_id = parse_field::<u32>(fields[4], "flight id")?;
    let passenger = Passenger {
        first_name: fields[0].to_string(),
        last_name: fields[1].to_string(),
        email: fields[2].to_string(),
        reservation_code: fields[3].to_string(),
    };
    Ok((passenger, flight_id))
}

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, DataError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(DataError::MalformedLine(format!(
            "expected {expected} fields, found {}",
            fields.len()
        )));
    }
    Ok(fields)
}

fn parse_field<T: FromStr>(raw: &str, name: &str) -> Result<T, DataError> {
    raw.parse::<T>()
        .map_err(|_| DataError::MalformedLine(format!("invalid {name} '{raw}'")))
}

fn read_source(path: &Path) -> Result<Option<String>, DataError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => {
            warn!("failed to read {}: {err}", path.display());
            Err(DataError::Io(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn parses_flight_line() -> Result<()> {
        let flight = parse_flight_line("101,15-03-2020,Warsaw,London,2,250.50")?;
        assert_eq!(flight.flight_id, 101);
        assert_eq!(
            flight.manufacture_date,
            NaiveDate::from_ymd_opt(2020, 3, 15).unwrap()
        );
        assert_eq!(flight.departure_city, "Warsaw");
        assert_eq!(flight.destination_city, "London");
        assert_eq!(flight.seat_capacity, 2);
        assert_eq!(flight.price, Decimal::new(25050, 2));
        Ok(())
    }

    #[test]
    fn rejects_bad_flight_fields() {
        for line in [
            "101,15-03-2020,Warsaw,London,2",
            "abc,15-03-2020,Warsaw,London,2,250.50",
            "101,2020-03-15,Warsaw,London,2,250.50",
            "101,15-03-2020,Warsaw,London,-2,250.50",
            "101,15-03-2020,Warsaw,London,2,250,50",
            "101,15-03-2020,Warsaw,London,2,-1.00",
        ] {
            assert!(
                matches!(parse_flight_line(line), Err(DataError::MalformedLine(_))),
                "accepted {line}"
            );
        }
    }

    #[test]
    fn skips_short_flight_line_and_keeps_the_rest() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("flights.txt");
        fs::write(
            &path,
            "101,15-03-2020,Warsaw,London,2,250.50\n102,16-03-2020,Berlin,Paris,3\n",
        )?;

        let mut flights = FlightStore::new();
        let report = load_flights(&path, &mut flights);

        assert_eq!(report.loaded, 1);
        assert_eq!(flights.len(), 1);
        assert_eq!(flights.read()[0].flight_id, 101);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line_number, Some(2));
        assert!(matches!(report.issues[0].error, DataError::MalformedLine(_)));
        Ok(())
    }

    #[test]
    fn repeated_flight_id_keeps_the_first_definition() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("flights.txt");
        fs::write(
            &path,
            "101,15-03-2020,Warsaw,London,2,250.50\n\
             102,16-03-2020,Berlin,Paris,3,99.00\n\
             101,01-01-2019,Oslo,Rome,9,10.00\n",
        )?;

        let mut flights = FlightStore::new();
        let report = load_flights(&path, &mut flights);

        assert_eq!(report.loaded, 2);
        assert_eq!(flights.len(), 2);
        assert_eq!(flights.find(101).map(|f| f.seat_capacity), Some(2));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line_number, Some(3));
        assert!(matches!(report.issues[0].error, DataError::DuplicateFlight(101)));
        Ok(())
    }

    #[test]
    fn missing_flight_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("absent.txt");
        let mut flights = FlightStore::new();
        let report = load_flights(&path, &mut flights);
        assert!(flights.is_empty());
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(report.issues[0].error, DataError::FileNotFound(_)));
        Ok(())
    }

    #[test]
    fn resolves_reservations_against_flights() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("passengers.txt");
        fs::write(
            &path,
            "Anna,Nowak,anna@example.com,code-a,101\n\
             Piotr,Lis,piotr@example.com,code-b,999\n\
             broken,line\n\
             Ewa,Maj,ewa@example.com,code-c,101\n\
             Olga,Kot,olga@example.com,code-d,101\n",
        )?;

        let mut flights = FlightStore::new();
        flights.create(parse_flight_line("101,15-03-2020,Warsaw,London,2,250.50")?);
        let mut reservations = ReservationStore::new();
        let report = load_reservations(&path, &flights, &mut reservations);

        assert_eq!(report.loaded, 2);
        assert_eq!(reservations.held_seats(101), 2);
        let ids: Vec<_> = reservations.iter().map(|r| r.reservation_id).collect();
        assert_eq!(ids, vec![1, 2]);

        let kinds: Vec<_> = report
            .issues
            .iter()
            .map(|issue| (issue.line_number, &issue.error))
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(
            kinds[0],
            (Some(2), DataError::UnknownFlight { flight_id: 999, .. })
        ));
        assert!(matches!(kinds[1], (Some(3), DataError::MalformedLine(_))));
        assert!(matches!(
            kinds[2],
            (Some(5), DataError::FlightFull { flight_id: 101, .. })
        ));
        Ok(())
    }

    #[test]
    fn missing_reservation_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let flights = FlightStore::new();
        let mut reservations = ReservationStore::new();
        let report = load_reservations(
            &dir.path().join("passengers.txt"),
            &flights,
            &mut reservations,
        );
        assert!(report.is_clean());
        assert!(reservations.is_empty());
        Ok(())
    }
}
