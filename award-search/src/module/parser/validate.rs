///! Syntactic validation of scraped segment fields
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

fn airline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9]{2}$").expect("static regex"))
}

fn airport_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{3}$").expect("static regex"))
}

/// IATA 2-character airline designator (letters or digits, e.g. "SQ", "9W").
pub fn valid_airline_code(code: &str) -> bool {
    airline_re().is_match(code)
}

/// IATA 3-letter airport code.
pub fn valid_airport_code(code: &str) -> bool {
    airport_re().is_match(code)
}

/// Parse a "YYYY-MM-DD" departure date; rejects impossible calendar dates.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse a time of day, "HH:MM" or "HH:MM:SS".
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}
