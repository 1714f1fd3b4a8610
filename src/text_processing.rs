//! # Text Processing Module
//!
//! This module turns the raw free-text body of an inbound message into either
//! a [`MeasurementRecord`] or a [`Command`].
//!
//! ## Message format
//!
//! - The literal text `get` (trimmed, case-sensitive) is the fetch-history
//!   command.
//! - Otherwise the message holds 1 to 4 non-empty lines: weight, then
//!   optionally body fat, body water, and muscle mass. The first line must be
//!   numeric; the optional lines fall back to absent individually when they
//!   fail to parse.
//! - The record date comes from the event timestamp, not the text.

use crate::measurement::MeasurementRecord;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fmt;
use tracing::warn;

/// Exact-match keyword that triggers the fetch-history command
pub const FETCH_HISTORY_KEYWORD: &str = "get";

/// Maximum number of non-empty lines a measurement message may hold
const MAX_LINES: usize = 4;

/// Commands recognized in message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reply with all previously stored measurements
    FetchHistory,
}

/// Successful parse outcome: a command or a measurement record
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessage {
    Command(Command),
    Record(MeasurementRecord),
}

/// Why a message could not be parsed into a record.
///
/// All of these are acknowledged to the webhook caller; none are stored.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No non-empty lines after trimming
    EmptyMessage,
    /// More than four non-empty lines
    TooManyLines(usize),
    /// The mandatory first line did not parse as a number
    UnparseableWeight(String),
    /// The event timestamp is outside the representable range
    InvalidTimestamp(i64),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyMessage => write!(f, "message has no non-empty lines"),
            ParseError::TooManyLines(n) => {
                write!(f, "message has {} non-empty lines, at most {} allowed", n, MAX_LINES)
            }
            ParseError::UnparseableWeight(line) => {
                write!(f, "weight line {:?} is not a number", line)
            }
            ParseError::InvalidTimestamp(ts) => {
                write!(f, "event timestamp {} is out of range", ts)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse raw message text received at `timestamp_ms` (epoch milliseconds)
/// into a command or a measurement record dated in the home timezone.
pub fn parse_message(
    text: &str,
    timestamp_ms: i64,
    home_tz: FixedOffset,
) -> Result<ParsedMessage, ParseError> {
    if text.trim() == FETCH_HISTORY_KEYWORD {
        return Ok(ParsedMessage::Command(Command::FetchHistory));
    }

    let lines = split_non_empty_lines(text);
    if lines.is_empty() {
        return Err(ParseError::EmptyMessage);
    }
    if lines.len() > MAX_LINES {
        return Err(ParseError::TooManyLines(lines.len()));
    }

    let weight: f64 = lines[0]
        .parse()
        .map_err(|_| ParseError::UnparseableWeight(lines[0].to_string()))?;

    let date = date_from_timestamp(timestamp_ms, home_tz)
        .ok_or(ParseError::InvalidTimestamp(timestamp_ms))?;

    Ok(ParsedMessage::Record(MeasurementRecord {
        date,
        weight,
        body_fat: optional_field(&lines, 1, "body_fat"),
        body_water: optional_field(&lines, 2, "body_water"),
        body_muscle: optional_field(&lines, 3, "body_muscle"),
    }))
}

/// Split on newlines, trim each line, and drop the empty ones
fn split_non_empty_lines(text: &str) -> Vec<&str> {
    text.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse the optional line at `index`, treating a failed parse as absent so
/// one bad line never discards the rest of the record
fn optional_field(lines: &[&str], index: usize, field: &str) -> Option<f64> {
    let line = lines.get(index)?;
    match line.parse::<f64>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                field = %field,
                value = %line,
                error = %err,
                "Optional field failed to parse, treating as absent"
            );
            None
        }
    }
}

/// Epoch milliseconds, truncated to seconds, to a calendar date in the home
/// timezone
fn date_from_timestamp(timestamp_ms: i64, home_tz: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp_ms / 1000, 0)
        .map(|utc| utc.with_timezone(&home_tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    const TS: i64 = 1_700_000_000_000;

    #[test]
    fn test_single_line_weight_only() {
        let parsed = parse_message("65.2", TS, jst()).unwrap();
        match parsed {
            ParsedMessage::Record(r) => {
                assert_eq!(r.weight, 65.2);
                assert_eq!(r.body_fat, None);
                assert_eq!(r.body_water, None);
                assert_eq!(r.body_muscle, None);
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_date_derived_in_home_timezone() {
        // 1700000000s is 2023-11-14 22:13:20 UTC, which is already the 15th
        // in UTC+9
        let parsed = parse_message("65.2", TS, jst()).unwrap();
        let ParsedMessage::Record(r) = parsed else {
            panic!("expected record");
        };
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2023, 11, 15).unwrap());
    }

    #[test]
    fn test_command_exact_match_with_whitespace() {
        for text in ["get", "  get  ", "\nget\n"] {
            assert_eq!(
                parse_message(text, TS, jst()),
                Ok(ParsedMessage::Command(Command::FetchHistory)),
                "input {:?}",
                text
            );
        }
    }

    #[test]
    fn test_command_is_case_sensitive() {
        // "Get" is not the command, and not a number either
        assert_eq!(
            parse_message("Get", TS, jst()),
            Err(ParseError::UnparseableWeight("Get".to_string()))
        );
    }

    #[test]
    fn test_four_numeric_lines_populate_positionally() {
        let parsed = parse_message("65.2\n20.1\n55.0\n42.3", TS, jst()).unwrap();
        let ParsedMessage::Record(r) = parsed else {
            panic!("expected record");
        };
        assert_eq!(r.weight, 65.2);
        assert_eq!(r.body_fat, Some(20.1));
        assert_eq!(r.body_water, Some(55.0));
        assert_eq!(r.body_muscle, Some(42.3));
    }

    #[test]
    fn test_optional_field_failure_is_isolated() {
        let parsed = parse_message("65.2\nabc\n55.0", TS, jst()).unwrap();
        let ParsedMessage::Record(r) = parsed else {
            panic!("expected record");
        };
        assert_eq!(r.weight, 65.2);
        assert_eq!(r.body_fat, None);
        assert_eq!(r.body_water, Some(55.0));
        assert_eq!(r.body_muscle, None);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(parse_message("", TS, jst()), Err(ParseError::EmptyMessage));
        assert_eq!(
            parse_message("  \n \n ", TS, jst()),
            Err(ParseError::EmptyMessage)
        );
    }

    #[test]
    fn test_too_many_lines() {
        assert_eq!(
            parse_message("1\n2\n3\n4\n5", TS, jst()),
            Err(ParseError::TooManyLines(5))
        );
    }

    #[test]
    fn test_blank_lines_are_dropped_before_counting() {
        // Five raw lines, but only four non-empty ones
        let parsed = parse_message("65.2\n\n20.1\n55.0\n42.3", TS, jst()).unwrap();
        assert!(matches!(parsed, ParsedMessage::Record(_)));
    }

    #[test]
    fn test_unparseable_weight() {
        assert_eq!(
            parse_message("heavy\n20.1", TS, jst()),
            Err(ParseError::UnparseableWeight("heavy".to_string()))
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_message("65.2\r\n20.1\r\n", TS, jst()).unwrap();
        let ParsedMessage::Record(r) = parsed else {
            panic!("expected record");
        };
        assert_eq!(r.weight, 65.2);
        assert_eq!(r.body_fat, Some(20.1));
    }
}
