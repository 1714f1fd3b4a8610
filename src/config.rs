//! # Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all service settings into a single, structured configuration object. It is
//! built once at cold start from environment variables, validated, and passed
//! into the gateways — business logic never reads the environment ambiently.

use crate::errors::{AppError, AppResult};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;

/// Default sheet range: five columns for date, weight, body fat, body water,
/// body muscle.
pub const DEFAULT_SHEET_RANGE: &str = "Sheet1!A:E";

/// Google Sheets gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Path to the service-account credentials JSON file
    pub credentials_path: String,
    /// Target spreadsheet identifier
    pub spreadsheet_id: String,
    /// Sheet range used for both appends and reads
    pub range: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: String::new(),
            spreadsheet_id: String::new(),
            range: DEFAULT_SHEET_RANGE.to_string(),
        }
    }
}

impl SheetsConfig {
    /// Validate sheets configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.credentials_path.trim().is_empty() {
            return Err(AppError::Config(
                "Credentials file path cannot be empty".to_string(),
            ));
        }

        if self.spreadsheet_id.trim().is_empty() {
            return Err(AppError::Config(
                "Spreadsheet id cannot be empty".to_string(),
            ));
        }

        if self.range.trim().is_empty() {
            return Err(AppError::Config("Sheet range cannot be empty".to_string()));
        }

        // A range without a sheet name would target whichever sheet happens
        // to be first; require the explicit "<sheet>!<columns>" form.
        if !self.range.contains('!') {
            return Err(AppError::Config(format!(
                "Sheet range '{}' is invalid. Expected format: 'SheetName!A:E'",
                self.range
            )));
        }

        Ok(())
    }
}

/// LINE messaging gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// The single fixed recipient of push replies
    pub user_id: String,
    /// Channel access token presented as a bearer token
    pub bearer_token: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            bearer_token: String::new(),
        }
    }
}

impl LineConfig {
    /// Validate messaging configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::Config(
                "Recipient user id cannot be empty".to_string(),
            ));
        }

        if self.bearer_token.trim().is_empty() {
            return Err(AppError::Config("Bearer token cannot be empty".to_string()));
        }

        if self.bearer_token.len() < 20 {
            return Err(AppError::Config(
                "Bearer token appears to be too short. Please verify it's a valid channel access token".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sheets gateway configuration
    pub sheets: SheetsConfig,
    /// Messaging gateway configuration
    pub line: LineConfig,
    /// Fixed UTC offset, in hours, used to derive record dates from event
    /// timestamps
    pub home_tz_offset_hours: i32,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.sheets.credentials_path = env::var("GOOGLE_CREDENTIALS_FILE").map_err(|_| {
            AppError::Config("GOOGLE_CREDENTIALS_FILE environment variable is required".to_string())
        })?;
        config.sheets.spreadsheet_id = env::var("SPREADSHEET_ID").map_err(|_| {
            AppError::Config("SPREADSHEET_ID environment variable is required".to_string())
        })?;
        config.sheets.range =
            env::var("SHEET_RANGE").unwrap_or_else(|_| DEFAULT_SHEET_RANGE.to_string());

        config.line.user_id = env::var("LINE_USER_ID").map_err(|_| {
            AppError::Config("LINE_USER_ID environment variable is required".to_string())
        })?;
        config.line.bearer_token = env::var("LINE_BEARER_TOKEN").map_err(|_| {
            AppError::Config("LINE_BEARER_TOKEN environment variable is required".to_string())
        })?;

        config.home_tz_offset_hours = env::var("HOME_TZ_OFFSET_HOURS")
            .unwrap_or_else(|_| "9".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("HOME_TZ_OFFSET_HOURS must be a valid number of hours".to_string())
            })?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.sheets.validate()?;
        self.line.validate()?;
        self.home_offset()?;
        Ok(())
    }

    /// The configured home timezone as a chrono offset
    pub fn home_offset(&self) -> AppResult<FixedOffset> {
        FixedOffset::east_opt(self.home_tz_offset_hours * 3600).ok_or_else(|| {
            AppError::Config(format!(
                "HOME_TZ_OFFSET_HOURS {} is out of range (-12 to 14)",
                self.home_tz_offset_hours
            ))
        })
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: spreadsheet_id={}, range={}, recipient=[REDACTED], bearer_token=[REDACTED], home_tz_offset_hours={}",
            self.sheets.spreadsheet_id, self.sheets.range, self.home_tz_offset_hours
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheets: SheetsConfig::default(),
            line: LineConfig::default(),
            home_tz_offset_hours: 9,
        }
    }
}
