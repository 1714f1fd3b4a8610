//! # LINE Messaging Gateway
//!
//! Server-initiated push of a text message to the single configured
//! recipient, authenticated with the channel access token. Delivery failures
//! are returned as [`AppError::Messaging`]; callers on the webhook path log
//! them without letting them affect the response status.

use crate::config::LineConfig;
use crate::errors::{AppError, AppResult};
use serde_json::json;
use tracing::debug;

const LINE_PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// Client pushing text messages to one preconfigured recipient
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    config: LineConfig,
}

impl LineClient {
    pub fn new(http: reqwest::Client, config: LineConfig) -> Self {
        Self { http, config }
    }

    /// Push a single text message to the configured recipient
    pub async fn push_text(&self, message: &str) -> AppResult<()> {
        let payload = json!({
            "to": self.config.user_id,
            "messages": [{ "type": "text", "text": message }],
        });

        let response = self
            .http
            .post(LINE_PUSH_URL)
            .bearer_auth(&self.config.bearer_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Messaging(format!("push request: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Messaging(format!(
                "push API returned status {}",
                response.status()
            )));
        }

        debug!(chars = message.chars().count(), "Push message delivered");
        Ok(())
    }
}
