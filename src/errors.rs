//! # Application Error Types
//!
//! This module defines common error types used throughout the weightlog
//! webhook service. It provides structured error handling for the gateway
//! and configuration components.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Message parsing errors
    Parse(String),
    /// Sheet gateway errors (append/read)
    Sheets(String),
    /// Messaging gateway errors (push delivery)
    Messaging(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Parse(msg) => write!(f, "[PARSE] {}", msg),
            AppError::Sheets(msg) => write!(f, "[SHEETS] {}", msg),
            AppError::Messaging(msg) => write!(f, "[MESSAGING] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
