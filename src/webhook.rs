//! # Webhook Entry Point
//!
//! Deserializes the inbound event envelope, routes the first event to the
//! line parser, and executes the resulting action against the gateways.
//!
//! The status policy keeps the upstream platform from retrying: everything is
//! acknowledged with 200 except a malformed envelope (400) and a sheet read
//! failure on the fetch-history path (500). A failed append in particular is
//! still answered 200, because a non-200 would make the platform redeliver
//! the event and duplicate the write on the next attempt.

use crate::measurement::{format_history, MeasurementRecord};
use crate::messaging::LineClient;
use crate::sheets::SheetsClient;
use crate::text_processing::{parse_message, Command, ParseError, ParsedMessage};
use chrono::FixedOffset;
use serde::Deserialize;
use tracing::{error, info, warn};

/// Inbound webhook JSON body: a destination and an ordered sequence of events
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One platform event. Only `message` events carrying a `text` message are
/// processed.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub message: Option<EventMessage>,
    /// Epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: String,
}

/// What the webhook should do for an envelope, decided before any I/O
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Wrong event type or shape: acknowledge and do nothing
    Ignore,
    /// Message understood but not storable: acknowledge, log, do not store
    Acknowledge(ParseError),
    /// Read all stored rows and push the formatted history back
    FetchHistory,
    /// Append the parsed record to the sheet
    Append(MeasurementRecord),
}

/// Route an envelope to its action. Only the first event is considered.
pub fn route(envelope: &WebhookEnvelope, home_tz: FixedOffset) -> Action {
    let Some(event) = envelope.events.first() else {
        return Action::Ignore;
    };

    if event.event_type != "message" {
        return Action::Ignore;
    }
    let Some(message) = &event.message else {
        return Action::Ignore;
    };
    if message.message_type != "text" {
        return Action::Ignore;
    }

    match parse_message(&message.text, event.timestamp, home_tz) {
        Ok(ParsedMessage::Command(Command::FetchHistory)) => Action::FetchHistory,
        Ok(ParsedMessage::Record(record)) => Action::Append(record),
        Err(err) => Action::Acknowledge(err),
    }
}

/// Handle one raw webhook body and return the HTTP status to answer with
pub async fn handle(
    body: &str,
    home_tz: FixedOffset,
    sheets: &SheetsClient,
    messaging: &LineClient,
) -> u16 {
    let envelope: WebhookEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "Malformed webhook envelope");
            return 400;
        }
    };

    match route(&envelope, home_tz) {
        Action::Ignore => 200,
        Action::Acknowledge(reason) => {
            warn!(reason = %reason, "Message acknowledged but not stored");
            200
        }
        Action::Append(record) => {
            match sheets.append_row(record.to_row()).await {
                Ok(()) => {
                    info!(
                        date = %record.date,
                        weight = record.weight,
                        body_fat = ?record.body_fat,
                        body_water = ?record.body_water,
                        body_muscle = ?record.body_muscle,
                        "Measurement appended"
                    );
                }
                Err(err) => {
                    error!(error = %err, "Sheet append failed");
                }
            }
            200
        }
        Action::FetchHistory => {
            let rows = match sheets.read_all().await {
                Ok(rows) => rows,
                Err(err) => {
                    error!(error = %err, "Sheet read failed");
                    return 500;
                }
            };

            let lines = format_history(&rows);
            info!(rows = rows.len(), lines = lines.len(), "History formatted");

            if let Err(err) = messaging.push_text(&lines.join("\n")).await {
                error!(error = %err, "Push reply failed");
            }
            200
        }
    }
}
