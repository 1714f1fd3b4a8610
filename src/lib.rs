//! # Weightlog Webhook
//!
//! A webhook-triggered service that parses body-weight messages from a LINE
//! bot into measurement records and appends them to a Google Sheets
//! spreadsheet. The `get` command replies with the stored history as a push
//! message.

pub mod config;
pub mod errors;
pub mod measurement;
pub mod messaging;
pub mod sheets;
pub mod text_processing;
pub mod webhook;

// Re-export types for easier access
pub use measurement::MeasurementRecord;
pub use text_processing::{Command, ParseError, ParsedMessage};
