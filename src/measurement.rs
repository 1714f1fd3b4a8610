//! # Measurement Records and Row Shaping
//!
//! This module defines the measurement record produced by the line parser and
//! its two serialized forms: the five-cell sheet row used for appends, and the
//! human-readable history lines pushed back on the fetch-history command.

use chrono::NaiveDate;
use serde_json::Value;

/// Placeholder shown in history replies for a missing or blank cell
const MISSING_CELL: &str = "-";

/// A single body measurement, parsed from one inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Calendar date derived from the event timestamp
    pub date: NaiveDate,
    /// Body weight, always present
    pub weight: f64,
    /// Body fat percentage, if the second line parsed
    pub body_fat: Option<f64>,
    /// Body water percentage, if the third line parsed
    pub body_water: Option<f64>,
    /// Muscle mass, if the fourth line parsed
    pub body_muscle: Option<f64>,
}

impl MeasurementRecord {
    /// Serialize into the fixed five-cell row: date, weight, body fat, body
    /// water, body muscle. Absent optional values become empty strings, never
    /// nulls, so column alignment is preserved.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::String(self.date.format("%Y-%m-%d").to_string()),
            number_cell(self.weight),
            optional_cell(self.body_fat),
            optional_cell(self.body_water),
            optional_cell(self.body_muscle),
        ]
    }

    /// Reconstruct a record from a stored row, following the same column
    /// order. Returns `None` for rows missing the date or weight columns.
    pub fn from_row(cells: &[Value]) -> Option<Self> {
        let date_str = cells.first().and_then(Value::as_str)?;
        let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()?;
        let weight = cells.get(1).and_then(cell_as_f64)?;

        Some(Self {
            date,
            weight,
            body_fat: cells.get(2).and_then(cell_as_f64),
            body_water: cells.get(3).and_then(cell_as_f64),
            body_muscle: cells.get(4).and_then(cell_as_f64),
        })
    }
}

fn number_cell(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

fn optional_cell(value: Option<f64>) -> Value {
    match value {
        Some(v) => number_cell(v),
        None => Value::String(String::new()),
    }
}

/// Numeric view of a stored cell. The append path stores numbers, but
/// USER_ENTERED reads can come back as strings.
fn cell_as_f64(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a cell holds a value worth displaying
fn is_populated(cell: &Value) -> bool {
    match cell {
        Value::String(s) => !s.trim().is_empty(),
        Value::Null => false,
        _ => true,
    }
}

/// Display form of the cell at `index`, or the placeholder when the cell is
/// missing or blank
fn cell_display(cells: &[Value], index: usize) -> String {
    match cells.get(index) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => MISSING_CELL.to_string(),
    }
}

/// Format stored rows into one reply line each.
///
/// Rows with fewer than two populated cells are incomplete or garbage and are
/// skipped rather than rendered as a line of placeholders.
pub fn format_history(rows: &[Vec<Value>]) -> Vec<String> {
    rows.iter()
        .filter(|row| row.iter().filter(|c| is_populated(c)).count() >= 2)
        .map(|row| {
            format!(
                "{}: weight={}, body_fat={}, body_water={}, muscle={}",
                cell_display(row, 0),
                cell_display(row, 1),
                cell_display(row, 2),
                cell_display(row, 3),
                cell_display(row, 4),
            )
        })
        .collect()
}
